//! A single streamed region and its load state machine

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ward_core::{ImportError, ImportTicket, ImportedModel, MeshHandle, SceneEngine};

use crate::error::{Result, StreamingError};

/// One model to import when the region loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Model path handed to the engine
    pub model: String,
    /// Name of the mesh the imported meshes are parented under
    #[serde(default)]
    pub anchor: Option<String>,
    /// Local offset under the anchor
    #[serde(default)]
    pub offset: Vec3,
}

impl Placement {
    /// Unanchored placement
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            anchor: None,
            offset: Vec3::ZERO,
        }
    }

    /// Parent the imported meshes under `anchor` at `offset`
    pub fn anchored(mut self, anchor: impl Into<String>, offset: Vec3) -> Self {
        self.anchor = Some(anchor.into());
        self.offset = offset;
        self
    }
}

/// Static description of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub center: Vec3,
    pub load_radius: f32,
    pub unload_radius: f32,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl RegionConfig {
    pub fn new(name: impl Into<String>, center: Vec3, load_radius: f32, unload_radius: f32) -> Self {
        Self {
            name: name.into(),
            center,
            load_radius,
            unload_radius,
            placements: Vec::new(),
        }
    }

    /// Add a placement
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    /// Check the radii form a hysteresis band
    pub fn validate(&self) -> Result<()> {
        for radius in [self.load_radius, self.unload_radius] {
            if radius.is_nan() || radius <= 0.0 {
                return Err(StreamingError::NegativeRadius {
                    name: self.name.clone(),
                    radius,
                });
            }
        }
        if self.load_radius >= self.unload_radius {
            return Err(StreamingError::InvalidRadii {
                name: self.name.clone(),
                load: self.load_radius,
                unload: self.unload_radius,
            });
        }
        Ok(())
    }
}

/// Region load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    #[default]
    Unloaded,
    /// Imports in flight
    Loading,
    Loaded,
    /// Every import failed or was skipped
    Failed,
}

/// Emitted on state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionEvent {
    LoadStarted(String),
    Loaded { region: String, meshes: usize },
    Failed(String),
    Unloaded { region: String, meshes: usize },
}

/// A region with its owned meshes
#[derive(Debug)]
pub struct StreamedRegion {
    config: RegionConfig,
    state: RegionState,
    /// In-flight ticket -> placement index
    tickets: HashMap<ImportTicket, usize>,
    owned: Vec<MeshHandle>,
    events: Vec<RegionEvent>,
}

impl StreamedRegion {
    /// Create an unloaded region, rejecting a degenerate hysteresis band
    pub fn new(config: RegionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RegionState::Unloaded,
            tickets: HashMap::new(),
            owned: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    /// Meshes currently owned
    pub fn owned(&self) -> &[MeshHandle] {
        &self.owned
    }

    /// Whether an import with this ticket is awaited
    pub fn awaits(&self, ticket: ImportTicket) -> bool {
        self.tickets.contains_key(&ticket)
    }

    /// Per-frame distance check
    pub fn update<E: SceneEngine + ?Sized>(&mut self, camera: Vec3, engine: &mut E) {
        let distance = camera.distance(self.config.center);
        match self.state {
            RegionState::Unloaded if distance <= self.config.load_radius => self.begin_load(engine),
            RegionState::Loading | RegionState::Loaded if distance > self.config.unload_radius => {
                self.unload(engine)
            }
            RegionState::Failed if distance > self.config.unload_radius => {
                log::debug!("Region {} eligible for another load", self.config.name);
                self.state = RegionState::Unloaded;
            }
            _ => {}
        }
    }

    fn begin_load<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) {
        log::info!("Loading region {}", self.config.name);
        self.events.push(RegionEvent::LoadStarted(self.config.name.clone()));
        if self.config.placements.is_empty() {
            self.settle();
            return;
        }
        self.state = RegionState::Loading;
        for (index, placement) in self.config.placements.iter().enumerate() {
            let ticket = engine.import_model(&placement.model);
            self.tickets.insert(ticket, index);
        }
    }

    /// Handle an import completion. Returns false if the ticket is not ours.
    pub fn on_import<E: SceneEngine + ?Sized>(
        &mut self,
        ticket: ImportTicket,
        result: &std::result::Result<ImportedModel, ImportError>,
        engine: &mut E,
    ) -> bool {
        let Some(index) = self.tickets.remove(&ticket) else {
            return false;
        };
        let placement = &self.config.placements[index];

        match result {
            Ok(model) => match place(placement, model, engine) {
                Some(()) => self.owned.extend(model.meshes.iter().copied()),
                None => {
                    log::warn!(
                        "Region {}: anchor {:?} missing, skipping {}",
                        self.config.name,
                        placement.anchor,
                        placement.model
                    );
                    for mesh in &model.meshes {
                        engine.dispose(*mesh);
                    }
                }
            },
            Err(err) => log::warn!("Region {}: {}", self.config.name, err),
        }

        if self.tickets.is_empty() {
            self.settle();
        }
        true
    }

    fn settle(&mut self) {
        if self.owned.is_empty() {
            log::warn!("Region {} loaded nothing", self.config.name);
            self.state = RegionState::Failed;
            self.events.push(RegionEvent::Failed(self.config.name.clone()));
        } else {
            log::info!("Region {} loaded ({} meshes)", self.config.name, self.owned.len());
            self.state = RegionState::Loaded;
            self.events.push(RegionEvent::Loaded {
                region: self.config.name.clone(),
                meshes: self.owned.len(),
            });
        }
    }

    /// Dispose everything owned and forget in-flight tickets
    pub fn unload<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) {
        let meshes = self.owned.len();
        for mesh in self.owned.drain(..) {
            engine.dispose(mesh);
        }
        self.tickets.clear();
        if self.state != RegionState::Unloaded {
            log::info!("Unloaded region {} ({} meshes)", self.config.name, meshes);
            self.events.push(RegionEvent::Unloaded {
                region: self.config.name.clone(),
                meshes,
            });
        }
        self.state = RegionState::Unloaded;
    }

    /// Drain state-change events
    pub fn drain_events(&mut self) -> impl Iterator<Item = RegionEvent> + '_ {
        self.events.drain(..)
    }
}

/// Parent the model under its anchor. `None` when the anchor is missing.
fn place<E: SceneEngine + ?Sized>(placement: &Placement, model: &ImportedModel, engine: &mut E) -> Option<()> {
    let Some(anchor) = &placement.anchor else {
        return Some(());
    };
    let parent = engine.find_mesh(anchor)?;
    for mesh in &model.meshes {
        engine.attach(*mesh, parent, placement.offset);
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEngine;

    fn region() -> StreamedRegion {
        StreamedRegion::new(
            RegionConfig::new("underground", Vec3::new(0.0, -10.0, 0.0), 20.0, 30.0)
                .with_placement(Placement::new("models/props.glb").anchored("Hospital", Vec3::ZERO))
                .with_placement(Placement::new("models/crates.glb")),
        )
        .unwrap()
    }

    fn complete(region: &mut StreamedRegion, engine: &mut MockEngine) {
        for (ticket, meshes) in engine.take_imports() {
            let model = ImportedModel {
                meshes,
                animation_groups: Vec::new(),
            };
            assert!(region.on_import(ticket, &Ok(model), engine));
        }
    }

    #[test]
    fn test_radii_validation() {
        let inverted = RegionConfig::new("r", Vec3::ZERO, 30.0, 30.0);
        assert!(matches!(
            StreamedRegion::new(inverted),
            Err(StreamingError::InvalidRadii { .. })
        ));
        let negative = RegionConfig::new("r", Vec3::ZERO, -1.0, 30.0);
        assert!(matches!(
            StreamedRegion::new(negative),
            Err(StreamingError::NegativeRadius { .. })
        ));
    }

    #[test]
    fn test_hysteresis() {
        let mut engine = MockEngine::with_mesh("Hospital");
        let mut region = region();
        let center = region.config().center;

        // Between the radii with nothing loaded: stays empty
        region.update(center + Vec3::new(25.0, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Unloaded);
        assert!(region.owned().is_empty());

        region.update(center + Vec3::new(20.0, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Loading);

        // Re-entry while loading starts nothing new
        region.update(center, &mut engine);
        assert_eq!(engine.imports_started(), 2);

        complete(&mut region, &mut engine);
        assert_eq!(region.state(), RegionState::Loaded);
        assert_eq!(region.owned().len(), 4);
        assert_eq!(engine.attached().len(), 2);

        // Back between the radii: content stays
        region.update(center + Vec3::new(25.0, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Loaded);

        region.update(center + Vec3::new(30.5, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Unloaded);
        assert!(region.owned().is_empty());
        assert_eq!(engine.disposed().len(), 4);

        let events: Vec<_> = region.drain_events().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], RegionEvent::Unloaded { meshes: 4, .. }));
    }

    #[test]
    fn test_leaving_mid_load_drops_partial_content() {
        let mut engine = MockEngine::with_mesh("Hospital");
        let mut region = region();
        let center = region.config().center;
        region.update(center, &mut engine);

        // Only the first placement arrives before the player walks off
        let mut imports = engine.take_imports().into_iter();
        let (first, meshes) = imports.next().unwrap();
        let model = ImportedModel {
            meshes,
            animation_groups: Vec::new(),
        };
        region.on_import(first, &Ok(model), &mut engine);
        assert_eq!(region.state(), RegionState::Loading);
        assert_eq!(region.owned().len(), 2);

        region.update(center + Vec3::new(500.0, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Unloaded);
        assert!(region.owned().is_empty());
        assert_eq!(engine.disposed().len(), 2);

        // The straggler is no longer ours
        let (second, _) = imports.next().unwrap();
        assert!(!region.awaits(second));
    }

    #[test]
    fn test_missing_anchor_skips_placement() {
        let mut engine = MockEngine::default();
        let mut region = region();
        region.update(region.config().center, &mut engine);
        complete(&mut region, &mut engine);

        // The anchored placement was disposed, the free one kept
        assert_eq!(region.state(), RegionState::Loaded);
        assert_eq!(region.owned().len(), 2);
        assert_eq!(engine.disposed().len(), 2);
    }

    #[test]
    fn test_failed_region_retries_after_leaving() {
        let mut engine = MockEngine::default();
        let mut region = region();
        let center = region.config().center;
        region.update(center, &mut engine);

        for (ticket, _) in engine.take_imports() {
            region.on_import(ticket, &Err(ImportError::NotFound("x".into())), &mut engine);
        }
        assert_eq!(region.state(), RegionState::Failed);

        // No reload while still close
        region.update(center, &mut engine);
        assert_eq!(region.state(), RegionState::Failed);

        region.update(center + Vec3::new(40.0, 0.0, 0.0), &mut engine);
        assert_eq!(region.state(), RegionState::Unloaded);
        region.update(center, &mut engine);
        assert_eq!(region.state(), RegionState::Loading);
    }

    #[test]
    fn test_foreign_ticket_not_claimed() {
        let mut engine = MockEngine::default();
        let mut region = region();
        let claimed = region.on_import(ImportTicket::new(999), &Ok(ImportedModel::default()), &mut engine);
        assert!(!claimed);
    }
}
