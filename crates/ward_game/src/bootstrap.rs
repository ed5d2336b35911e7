//! Scene bootstrap
//!
//! Runs in two halves around the asynchronous environment import:
//! [`begin`] sets up camera and lights and starts the import;
//! [`populate`] runs when it completes and registers every item and
//! lockable it can find. Anything missing is logged and skipped.

use glam::Vec3;
use ward_core::{ImportError, ImportTicket, ImportedModel, MeshHandle, SceneEngine};
use ward_inventory::{ItemPickup, PickupTable};
use ward_puzzle::{Cupboard, ExitDoor, Lockable, LockableRegistry, SwingDoor};

use crate::config::{EnvironmentConfig, GameConfig, LockableKind, LockableSpec};

/// What [`populate`] built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub items: usize,
    pub lockables: usize,
    /// Names of skipped items and lockables
    pub skipped: Vec<String>,
}

/// Configure camera and lights, then start importing the environment
pub fn begin<E: SceneEngine + ?Sized>(engine: &mut E, config: &GameConfig) -> ImportTicket {
    engine.configure_scene(&config.scene_setup());
    log::info!("Importing environment {}", config.environment.model);
    engine.import_model(&config.environment.model)
}

fn skip_everything(env: &EnvironmentConfig) -> BootstrapReport {
    BootstrapReport {
        skipped: env
            .items
            .iter()
            .map(|i| i.mesh.clone())
            .chain(env.lockables.iter().map(|l| l.id.to_string()))
            .collect(),
        ..Default::default()
    }
}

/// Register items and lockables from the imported environment
pub fn populate<E: SceneEngine + ?Sized>(
    engine: &mut E,
    env: &EnvironmentConfig,
    result: &Result<ImportedModel, ImportError>,
    pickups: &mut PickupTable,
    registry: &mut LockableRegistry,
) -> BootstrapReport {
    if let Err(err) = result {
        log::warn!("Environment unavailable: {}", err);
        return skip_everything(env);
    }
    let Some(anchor) = engine.find_mesh(&env.anchor) else {
        log::warn!(
            "Anchor mesh {} missing, skipping {} items and {} lockables",
            env.anchor,
            env.items.len(),
            env.lockables.len()
        );
        return skip_everything(env);
    };

    let mut report = BootstrapReport::default();

    for item in &env.items {
        let Some(mesh) = engine.find_mesh(&item.mesh) else {
            log::warn!("Item mesh {} missing, {} unavailable", item.mesh, item.kind);
            report.skipped.push(item.mesh.clone());
            continue;
        };
        if item.hidden {
            engine.set_enabled(mesh, false);
            pickups.insert(ItemPickup::hidden(item.kind, mesh));
        } else {
            pickups.insert(ItemPickup::new(item.kind, mesh));
        }
        report.items += 1;
    }

    for spec in &env.lockables {
        let leaves: Option<Vec<MeshHandle>> = spec.leaves.iter().map(|name| engine.find_mesh(name)).collect();
        let Some(leaves) = leaves else {
            log::warn!("Lockable {}: leaf mesh missing, skipping", spec.id);
            report.skipped.push(spec.id.to_string());
            continue;
        };

        let position = spec
            .position
            .or_else(|| leaves.first().and_then(|leaf| engine.world_position(*leaf)))
            .or_else(|| engine.world_position(anchor))
            .unwrap_or(Vec3::ZERO);

        let built = build_lockable(spec, &leaves, position).map(|lockable| registry.insert(lockable));
        match built {
            Some(Ok(())) => report.lockables += 1,
            Some(Err(err)) => {
                log::warn!("{}", err);
                report.skipped.push(spec.id.to_string());
            }
            None => {
                log::warn!("Lockable {}: wrong number of leaves", spec.id);
                report.skipped.push(spec.id.to_string());
            }
        }
    }

    log::info!(
        "Scene populated: {} items, {} lockables, {} skipped",
        report.items,
        report.lockables,
        report.skipped.len()
    );
    report
}

/// Build the concrete lockable for a spec
pub fn build_lockable(spec: &LockableSpec, leaves: &[MeshHandle], position: Vec3) -> Option<Box<dyn Lockable>> {
    let id = spec.id.clone();
    let gate = spec.gate.clone();
    let lockable: Box<dyn Lockable> = match (spec.kind, leaves) {
        (LockableKind::Cupboard, [left, right]) => Box::new(Cupboard::new(id, gate, position, *left, *right)),
        (LockableKind::SwingDoor, [leaf]) => {
            let door = SwingDoor::new(id, gate, position, *leaf);
            match spec.swing {
                Some(angle) => Box::new(door.with_swing(angle)),
                None => Box::new(door),
            }
        }
        (LockableKind::ExitDoor, [leaf]) => Box::new(ExitDoor::new(id, gate, position, *leaf)),
        _ => return None,
    };
    Some(lockable)
}
