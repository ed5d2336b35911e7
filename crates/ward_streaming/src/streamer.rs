//! All regions of a scene, driven once per frame

use glam::Vec3;
use ward_core::{ImportError, ImportTicket, ImportedModel, SceneEngine};

use crate::error::{Result, StreamingError};
use crate::region::{RegionConfig, RegionEvent, RegionState, StreamedRegion};

/// Runs the proximity check for every region
#[derive(Debug, Default)]
pub struct RegionStreamer {
    regions: Vec<StreamedRegion>,
}

impl RegionStreamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration
    pub fn from_configs(configs: &[RegionConfig]) -> Result<Self> {
        let mut streamer = Self::new();
        for config in configs {
            streamer.add(config.clone())?;
        }
        Ok(streamer)
    }

    /// Register a region
    pub fn add(&mut self, config: RegionConfig) -> Result<()> {
        if self.regions.iter().any(|r| r.name() == config.name) {
            return Err(StreamingError::DuplicateRegion(config.name));
        }
        self.regions.push(StreamedRegion::new(config)?);
        Ok(())
    }

    pub fn region(&self, name: &str) -> Option<&StreamedRegion> {
        self.regions.iter().find(|r| r.name() == name)
    }

    pub fn regions(&self) -> &[StreamedRegion] {
        &self.regions
    }

    /// Distance check for every region
    pub fn update<E: SceneEngine + ?Sized>(&mut self, camera: Vec3, engine: &mut E) {
        for region in &mut self.regions {
            region.update(camera, engine);
        }
    }

    /// Route an import completion to the region waiting for it.
    /// Completions nobody waits for are disposed. Returns true if claimed.
    pub fn on_import<E: SceneEngine + ?Sized>(
        &mut self,
        ticket: ImportTicket,
        result: &std::result::Result<ImportedModel, ImportError>,
        engine: &mut E,
    ) -> bool {
        if let Some(region) = self.regions.iter_mut().find(|r| r.awaits(ticket)) {
            return region.on_import(ticket, result, engine);
        }
        if let Ok(model) = result {
            log::debug!("Disposing late import {:?} ({} meshes)", ticket, model.meshes.len());
            for mesh in &model.meshes {
                engine.dispose(*mesh);
            }
        }
        false
    }

    /// Unload every region
    pub fn unload_all<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) {
        for region in &mut self.regions {
            region.unload(engine);
        }
    }

    /// Whether any region is loading
    pub fn is_loading(&self) -> bool {
        self.regions.iter().any(|r| r.state() == RegionState::Loading)
    }

    /// Drain events from every region
    pub fn drain_events(&mut self) -> Vec<RegionEvent> {
        self.regions.iter_mut().flat_map(|r| r.drain_events()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Placement;
    use crate::testing::MockEngine;

    fn configs() -> Vec<RegionConfig> {
        vec![
            RegionConfig::new("underground", Vec3::new(0.0, -10.0, 0.0), 20.0, 30.0)
                .with_placement(Placement::new("models/underground_props.glb")),
            RegionConfig::new("attic", Vec3::new(0.0, 40.0, 0.0), 10.0, 15.0)
                .with_placement(Placement::new("models/attic.glb")),
        ]
    }

    #[test]
    fn test_duplicate_region() {
        let mut streamer = RegionStreamer::from_configs(&configs()).unwrap();
        let result = streamer.add(RegionConfig::new("attic", Vec3::ZERO, 1.0, 2.0));
        assert_eq!(result, Err(StreamingError::DuplicateRegion("attic".into())));
    }

    #[test]
    fn test_regions_are_independent() {
        let mut engine = MockEngine::default();
        let mut streamer = RegionStreamer::from_configs(&configs()).unwrap();

        streamer.update(Vec3::ZERO, &mut engine);
        assert_eq!(streamer.region("underground").unwrap().state(), RegionState::Loading);
        assert_eq!(streamer.region("attic").unwrap().state(), RegionState::Unloaded);
        assert!(streamer.is_loading());
    }

    #[test]
    fn test_late_import_disposed() {
        let mut engine = MockEngine::default();
        let mut streamer = RegionStreamer::from_configs(&configs()).unwrap();
        streamer.update(Vec3::ZERO, &mut engine);

        // Restart before the import completes
        streamer.unload_all(&mut engine);
        for (ticket, meshes) in engine.take_imports() {
            let model = ImportedModel {
                meshes,
                animation_groups: Vec::new(),
            };
            assert!(!streamer.on_import(ticket, &Ok(model), &mut engine));
        }
        assert_eq!(engine.disposed().len(), 2);
        assert_eq!(streamer.region("underground").unwrap().state(), RegionState::Unloaded);
    }

    #[test]
    fn test_drain_events() {
        let mut engine = MockEngine::default();
        let mut streamer = RegionStreamer::from_configs(&configs()).unwrap();
        streamer.update(Vec3::ZERO, &mut engine);
        let events = streamer.drain_events();
        assert_eq!(events, vec![RegionEvent::LoadStarted("underground".into())]);
        assert!(streamer.drain_events().is_empty());
    }
}
