//! In-memory engine
//!
//! A scene graph of named nodes with no rendering. Imports resolve against
//! a catalogue of model descriptions and complete by posting on the event
//! queue, so the game sees them on its next frame. Animations complete the
//! same way. Used by the `ward_headless` binary and the test suites.

use glam::Vec3;
use std::collections::{BTreeMap, HashMap};
use ward_core::{
    event_channel, AnimationClip, AnimationHandle, CollisionWorld, EngineEvent, EventReceiver,
    EventSender, ImportError, ImportTicket, ImportedModel, MeshHandle, SceneEngine, SceneSetup,
    Subscription, SubscriptionId,
};

use crate::config::GameConfig;

/// One mesh of a catalogued model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    pub name: String,
    pub position: Vec3,
    /// Parent by name, within the model or already in the scene
    pub parent: Option<String>,
}

impl ModelMesh {
    pub fn root(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            parent: None,
        }
    }

    pub fn child(name: impl Into<String>, position: Vec3, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position,
            parent: Some(parent.into()),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<MeshHandle>,
    position: Vec3,
    enabled: bool,
    rotation: f32,
}

type ImportResult = Result<ImportedModel, ImportError>;

/// Engine without a renderer
#[derive(Debug)]
pub struct HeadlessEngine {
    events: EventSender,
    next_id: u64,
    nodes: BTreeMap<MeshHandle, Node>,
    catalogue: HashMap<String, Vec<ModelMesh>>,
    hold_imports: bool,
    held: Vec<(ImportTicket, ImportResult)>,
    imports: Vec<String>,
    animations: usize,
    aimed: Option<MeshHandle>,
    subscriptions: Vec<SubscriptionId>,
    spot: (bool, f32),
    camera: (Vec3, f32, f32),
    setup: Option<SceneSetup>,
    disposed: Vec<MeshHandle>,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new().0
    }
}

impl HeadlessEngine {
    /// Empty engine and the queue it posts on
    pub fn new() -> (Self, EventReceiver) {
        let (events, receiver) = event_channel();
        let engine = Self {
            events,
            next_id: 0,
            nodes: BTreeMap::new(),
            catalogue: HashMap::new(),
            hold_imports: false,
            held: Vec::new(),
            imports: Vec::new(),
            animations: 0,
            aimed: None,
            subscriptions: Vec::new(),
            spot: (false, 0.0),
            camera: (Vec3::ZERO, 0.0, 0.0),
            setup: None,
            disposed: Vec::new(),
        };
        (engine, receiver)
    }

    /// Engine whose catalogue holds the configured environment and regions
    pub fn hospital(config: &GameConfig) -> (Self, EventReceiver) {
        let (mut engine, receiver) = Self::new();
        let env = &config.environment;

        let mut meshes = vec![ModelMesh::root(env.anchor.clone(), Vec3::ZERO)];
        for (index, item) in env.items.iter().enumerate() {
            let position = Vec3::new(3.0 * index as f32, 1.0, -8.0);
            meshes.push(ModelMesh::child(item.mesh.clone(), position, env.anchor.clone()));
        }
        for spec in &env.lockables {
            let position = spec.position.unwrap_or(Vec3::ZERO);
            for leaf in &spec.leaves {
                meshes.push(ModelMesh::child(leaf.clone(), position, env.anchor.clone()));
            }
        }
        engine.add_model(env.model.clone(), meshes);

        for region in &env.regions {
            for (index, placement) in region.placements.iter().enumerate() {
                let name = format!("{}_{}", region.name, index);
                engine.add_model(
                    placement.model.clone(),
                    vec![
                        ModelMesh::root(format!("{}_a", name), region.center),
                        ModelMesh::root(format!("{}_b", name), region.center),
                    ],
                );
            }
        }
        (engine, receiver)
    }

    /// Catalogue a model
    pub fn add_model(&mut self, path: impl Into<String>, meshes: Vec<ModelMesh>) {
        self.catalogue.insert(path.into(), meshes);
    }

    /// Drop a mesh from the catalogue and the scene
    pub fn remove_mesh(&mut self, name: &str) {
        for meshes in self.catalogue.values_mut() {
            meshes.retain(|m| m.name != name);
        }
        self.nodes.retain(|_, node| node.name != name);
    }

    /// Add a node directly
    pub fn spawn(&mut self, name: &str, position: Vec3, parent: Option<MeshHandle>) -> MeshHandle {
        self.next_id += 1;
        let handle = MeshHandle::new(self.next_id);
        self.nodes.insert(
            handle,
            Node {
                name: name.to_string(),
                parent,
                position,
                enabled: true,
                rotation: 0.0,
            },
        );
        handle
    }

    /// Keep import completions back until [`Self::release_imports`]
    pub fn set_hold_imports(&mut self, hold: bool) {
        self.hold_imports = hold;
    }

    /// Take held completions without posting them
    pub fn take_import_results(&mut self) -> Vec<(ImportTicket, ImportResult)> {
        std::mem::take(&mut self.held)
    }

    /// Post held completions
    pub fn release_imports(&mut self) {
        for (ticket, result) in std::mem::take(&mut self.held) {
            self.post(EngineEvent::ModelImported { ticket, result });
        }
    }

    /// Make the next picks hit the named mesh
    pub fn aim_at(&mut self, name: &str) -> Option<MeshHandle> {
        self.aimed = self.find_mesh(name);
        self.aimed
    }

    pub fn clear_aim(&mut self) {
        self.aimed = None;
    }

    pub fn configured(&self) -> bool {
        self.setup.is_some()
    }

    pub fn is_enabled(&self, mesh: MeshHandle) -> bool {
        self.nodes.get(&mesh).map(|n| n.enabled).unwrap_or(false)
    }

    pub fn rotation(&self, mesh: MeshHandle) -> Option<f32> {
        self.nodes.get(&mesh).map(|n| n.rotation)
    }

    pub fn spot_light(&self) -> (bool, f32) {
        self.spot
    }

    pub fn camera(&self) -> (Vec3, f32, f32) {
        self.camera
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Paths imported so far
    pub fn imports_started(&self) -> &[String] {
        &self.imports
    }

    pub fn animations_played(&self) -> usize {
        self.animations
    }

    pub fn disposed(&self) -> &[MeshHandle] {
        &self.disposed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn post(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Event queue closed");
        }
    }

    fn instantiate(&mut self, meshes: &[ModelMesh]) -> ImportedModel {
        let mut created: HashMap<&str, MeshHandle> = HashMap::new();
        let mut roots = Vec::new();
        for mesh in meshes {
            let parent = mesh
                .parent
                .as_deref()
                .and_then(|name| created.get(name).copied().or_else(|| self.find_mesh(name)));
            let handle = self.spawn(&mesh.name, mesh.position, parent);
            created.insert(&mesh.name, handle);
            if mesh.parent.is_none() {
                roots.push(handle);
            }
        }
        ImportedModel {
            meshes: roots,
            animation_groups: Vec::new(),
        }
    }
}

impl CollisionWorld for HeadlessEngine {}

impl SceneEngine for HeadlessEngine {
    fn configure_scene(&mut self, setup: &SceneSetup) {
        self.camera = (setup.camera_position, setup.camera_pitch, setup.camera_yaw);
        self.setup = Some(setup.clone());
    }

    fn import_model(&mut self, path: &str) -> ImportTicket {
        self.next_id += 1;
        let ticket = ImportTicket::new(self.next_id);
        self.imports.push(path.to_string());

        let result = match self.catalogue.get(path).cloned() {
            Some(meshes) => {
                let total = meshes.len() as u64;
                self.post(EngineEvent::ImportProgress {
                    ticket,
                    loaded: total / 2,
                    total,
                });
                self.post(EngineEvent::ImportProgress {
                    ticket,
                    loaded: total,
                    total,
                });
                Ok(self.instantiate(&meshes))
            }
            None => Err(ImportError::NotFound(path.to_string())),
        };

        if self.hold_imports {
            self.held.push((ticket, result));
        } else {
            self.post(EngineEvent::ModelImported { ticket, result });
        }
        ticket
    }

    fn find_mesh(&self, name: &str) -> Option<MeshHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| *handle)
    }

    fn parent_of(&self, mesh: MeshHandle) -> Option<MeshHandle> {
        self.nodes.get(&mesh)?.parent
    }

    fn world_position(&self, mesh: MeshHandle) -> Option<Vec3> {
        self.nodes.get(&mesh).map(|n| n.position)
    }

    fn pick_at(&self, _screen_x: f32, _screen_y: f32) -> Option<MeshHandle> {
        self.aimed.filter(|mesh| self.is_enabled(*mesh))
    }

    fn play_animation(&mut self, target: MeshHandle, clip: &AnimationClip) -> AnimationHandle {
        self.next_id += 1;
        let handle = AnimationHandle::new(self.next_id);
        if let Some(node) = self.nodes.get_mut(&target) {
            node.rotation = clip.final_angle();
        }
        self.animations += 1;
        self.post(EngineEvent::AnimationFinished(handle));
        handle
    }

    // Clips complete as soon as they start
    fn stop_animation(&mut self, _handle: AnimationHandle) {}

    fn set_rotation(&mut self, mesh: MeshHandle, _axis: Vec3, angle: f32) {
        if let Some(node) = self.nodes.get_mut(&mesh) {
            node.rotation = angle;
        }
    }

    fn set_enabled(&mut self, mesh: MeshHandle, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(&mesh) {
            node.enabled = enabled;
        }
    }

    fn attach(&mut self, child: MeshHandle, parent: MeshHandle, offset: Vec3) {
        let base = self.world_position(parent).unwrap_or(Vec3::ZERO);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.position = base + offset;
        }
    }

    fn dispose(&mut self, mesh: MeshHandle) {
        if self.nodes.remove(&mesh).is_some() {
            self.disposed.push(mesh);
        }
    }

    fn set_spot_light(&mut self, enabled: bool, intensity: f32) {
        self.spot = (enabled, intensity);
    }

    fn set_camera(&mut self, position: Vec3, pitch: f32, yaw: f32) {
        self.camera = (position, pitch, yaw);
    }

    fn subscribe(&mut self, kind: Subscription) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        log::debug!("Subscribed {:?} as {:?}", kind, id);
        self.subscriptions.push(id);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|s| *s != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_posts_progress_then_completion() {
        let (mut engine, events) = HeadlessEngine::new();
        engine.add_model(
            "room.glb",
            vec![
                ModelMesh::root("Room", Vec3::ZERO),
                ModelMesh::child("lamp", Vec3::ONE, "Room"),
            ],
        );
        let ticket = engine.import_model("room.glb");

        let events: Vec<_> = events.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[2],
            EngineEvent::ModelImported { ticket: t, result: Ok(ref model) } if t == ticket && model.meshes.len() == 1
        ));

        let lamp = engine.find_mesh("lamp").unwrap();
        assert_eq!(engine.parent_of(lamp), engine.find_mesh("Room"));
    }

    #[test]
    fn test_unknown_model_fails() {
        let (mut engine, events) = HeadlessEngine::new();
        engine.import_model("missing.glb");
        let event = events.try_recv().unwrap();
        assert!(matches!(
            event,
            EngineEvent::ModelImported { result: Err(ImportError::NotFound(_)), .. }
        ));
    }

    #[test]
    fn test_hidden_meshes_are_not_pickable() {
        let mut engine = HeadlessEngine::default();
        let mesh = engine.spawn("key", Vec3::ZERO, None);
        engine.aim_at("key");
        assert_eq!(engine.pick_at(0.0, 0.0), Some(mesh));
        engine.set_enabled(mesh, false);
        assert_eq!(engine.pick_at(0.0, 0.0), None);
    }
}
