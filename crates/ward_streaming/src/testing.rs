//! Recording engine for unit tests

use glam::Vec3;
use std::collections::HashMap;
use ward_core::{
    AnimationClip, AnimationHandle, CollisionWorld, ImportTicket, MeshHandle, SceneEngine,
    SceneSetup, Subscription, SubscriptionId,
};

/// Each import yields two fresh meshes
#[derive(Debug, Default)]
pub struct MockEngine {
    next_id: u64,
    named: HashMap<String, MeshHandle>,
    pending: Vec<ImportTicket>,
    started: usize,
    attached: Vec<(MeshHandle, MeshHandle)>,
    disposed: Vec<MeshHandle>,
}

impl MockEngine {
    pub fn with_mesh(name: &str) -> Self {
        let mut engine = Self::default();
        let mesh = engine.fresh();
        engine.named.insert(name.to_string(), mesh);
        engine
    }

    fn fresh(&mut self) -> MeshHandle {
        self.next_id += 1;
        MeshHandle::new(self.next_id)
    }

    /// Complete every pending import
    pub fn take_imports(&mut self) -> Vec<(ImportTicket, Vec<MeshHandle>)> {
        let tickets: Vec<_> = self.pending.drain(..).collect();
        tickets
            .into_iter()
            .map(|ticket| (ticket, vec![self.fresh(), self.fresh()]))
            .collect()
    }

    pub fn imports_started(&self) -> usize {
        self.started
    }

    pub fn attached(&self) -> &[(MeshHandle, MeshHandle)] {
        &self.attached
    }

    pub fn disposed(&self) -> &[MeshHandle] {
        &self.disposed
    }
}

impl CollisionWorld for MockEngine {}

impl SceneEngine for MockEngine {
    fn configure_scene(&mut self, _setup: &SceneSetup) {}

    fn import_model(&mut self, _path: &str) -> ImportTicket {
        self.next_id += 1;
        let ticket = ImportTicket::new(self.next_id);
        self.pending.push(ticket);
        self.started += 1;
        ticket
    }

    fn find_mesh(&self, name: &str) -> Option<MeshHandle> {
        self.named.get(name).copied()
    }

    fn parent_of(&self, _mesh: MeshHandle) -> Option<MeshHandle> {
        None
    }

    fn world_position(&self, _mesh: MeshHandle) -> Option<Vec3> {
        None
    }

    fn pick_at(&self, _x: f32, _y: f32) -> Option<MeshHandle> {
        None
    }

    fn play_animation(&mut self, _target: MeshHandle, _clip: &AnimationClip) -> AnimationHandle {
        AnimationHandle::new(0)
    }

    fn stop_animation(&mut self, _handle: AnimationHandle) {}

    fn set_rotation(&mut self, _mesh: MeshHandle, _axis: Vec3, _angle: f32) {}

    fn set_enabled(&mut self, _mesh: MeshHandle, _enabled: bool) {}

    fn attach(&mut self, child: MeshHandle, parent: MeshHandle, _offset: Vec3) {
        self.attached.push((child, parent));
    }

    fn dispose(&mut self, mesh: MeshHandle) {
        self.disposed.push(mesh);
    }

    fn set_spot_light(&mut self, _enabled: bool, _intensity: f32) {}

    fn set_camera(&mut self, _position: Vec3, _pitch: f32, _yaw: f32) {}

    fn subscribe(&mut self, _kind: Subscription) -> SubscriptionId {
        SubscriptionId(0)
    }

    fn unsubscribe(&mut self, _id: SubscriptionId) {}
}
