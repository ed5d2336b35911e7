//! The frame dispatcher
//!
//! [`Game`] owns every gameplay system and the engine. The host calls
//! [`Game::frame`] once per display frame and forwards raw input to the
//! `key_*`/`pointer_*` entry points. After [`Game::teardown`] every entry
//! point is a no-op.

use ward_core::{
    EngineEvent, EventReceiver, ImportError, ImportTicket, ImportedModel, KeyCode, KeyboardState,
    SceneEngine, Subscription, SubscriptionId,
};
use ward_gamestate::{CountdownEvent, GamePhase, Scheduler, Session, TaskId};
use ward_inventory::{Inventory, PickupOutcome, PickupTable};
use ward_player::PlayerController;
use ward_puzzle::{
    Gate, LockableRegistry, PromptSession, Puzzle, PuzzleBook, Reward, SubmitOutcome, ToggleOutcome,
};
use ward_streaming::RegionStreamer;

use crate::bootstrap::{self, BootstrapReport};
use crate::config::{GameConfig, Result};
use crate::interaction::{self, DoorUse, PickTarget};
use crate::notice::Notice;

/// One-shot actions run by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Dismiss the prompt after a correct answer
    ClosePrompt,
    /// Win after the exit door has swung open
    DeclareEscape,
}

const SUBSCRIPTIONS: [Subscription; 5] = [
    Subscription::KeyDown,
    Subscription::KeyUp,
    Subscription::PointerDown,
    Subscription::PointerMove,
    Subscription::Frame,
];

/// A running Hollow Ward game
pub struct Game<E: SceneEngine> {
    engine: E,
    events: EventReceiver,
    config: GameConfig,

    keys: KeyboardState,
    player: PlayerController,
    inventory: Inventory,
    pickups: PickupTable,
    lockables: LockableRegistry,
    puzzles: PuzzleBook,
    prompt: Option<PromptSession>,
    prompt_close: Option<TaskId>,
    streamer: RegionStreamer,
    session: Session,
    scheduler: Scheduler<DeferredAction>,

    /// Environment import in flight
    environment: Option<ImportTicket>,
    report: Option<BootstrapReport>,
    subscriptions: Vec<SubscriptionId>,
    notices: Vec<Notice>,
    disposed: bool,
}

fn build_puzzles(config: &GameConfig) -> Result<PuzzleBook> {
    let mut book = PuzzleBook::new();
    for spec in &config.environment.puzzles {
        let mut puzzle = Puzzle::new(spec.id.clone(), spec.text.clone(), spec.answer.clone())
            .with_reward(spec.reward);
        if let Some(image) = &spec.image {
            puzzle = puzzle.with_image(image.clone());
        }
        if let Some(target) = &spec.unlocks {
            puzzle = puzzle.unlocks(target.clone());
        }
        book.insert(puzzle)?;
    }
    Ok(book)
}

impl<E: SceneEngine> Game<E> {
    /// Create a game in the menu. `events` is the receiving half of the
    /// queue the engine posts completions on.
    pub fn new(engine: E, events: EventReceiver, config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut player = PlayerController::new(config.player.clone());
        if let Some(ladder) = &config.ladder {
            player = player.with_ladder(ladder.clone());
        }

        Ok(Self {
            puzzles: build_puzzles(&config)?,
            streamer: RegionStreamer::from_configs(&config.environment.regions)?,
            session: Session::new(config.session.time_limit),
            engine,
            events,
            keys: KeyboardState::new(),
            player,
            inventory: Inventory::new(),
            pickups: PickupTable::new(),
            lockables: LockableRegistry::new(),
            prompt: None,
            prompt_close: None,
            scheduler: Scheduler::new(),
            environment: None,
            report: None,
            subscriptions: Vec::new(),
            notices: Vec::new(),
            disposed: false,
            config,
        })
    }

    /// Register host listeners
    pub fn attach(&mut self) {
        if self.disposed || !self.subscriptions.is_empty() {
            return;
        }
        for kind in SUBSCRIPTIONS {
            let id = self.engine.subscribe(kind);
            self.subscriptions.push(id);
        }
    }

    /// Remove listeners, cancel deferred work and release streamed content.
    /// Nothing runs afterwards.
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        for id in self.subscriptions.drain(..) {
            self.engine.unsubscribe(id);
        }
        self.scheduler.clear();
        self.streamer.unload_all(&mut self.engine);
        self.prompt = None;
        self.prompt_close = None;
        self.keys.clear();
        self.disposed = true;
        log::info!("Game torn down");
    }

    /// Leave the menu: import the environment, or go straight to playing
    /// when the scene is already built
    pub fn start(&mut self) {
        if self.disposed || !self.session.begin_loading() {
            return;
        }
        if self.report.is_some() {
            self.session.finish_loading();
        } else if self.environment.is_none() {
            self.environment = Some(bootstrap::begin(&mut self.engine, &self.config));
        }
    }

    /// Back to the menu with everything as it was at startup
    pub fn restart(&mut self) {
        if self.disposed {
            return;
        }
        log::info!("Restarting");
        self.scheduler.clear();
        self.prompt = None;
        self.prompt_close = None;
        self.keys.clear();
        self.notices.clear();

        self.inventory.reset();
        self.engine.set_spot_light(false, 0.0);
        self.puzzles.reset();
        self.lockables.reset(&mut self.engine);
        for (mesh, visible) in self.pickups.reset() {
            self.engine.set_enabled(mesh, visible);
        }
        self.player.reset();
        self.streamer.unload_all(&mut self.engine);
        self.session.restart();
    }

    /// Run one frame
    pub fn frame(&mut self, dt: f32) {
        if self.disposed {
            return;
        }

        // 1. Engine completions
        let events: Vec<EngineEvent> = self.events.try_iter().collect();
        for event in events {
            self.handle_engine_event(event);
        }

        // 2. Deferred actions
        for action in self.scheduler.advance(dt) {
            self.run_deferred(action);
        }

        // 3. Countdown
        if let Some(CountdownEvent::Expired) = self.session.tick(dt) {
            self.close_prompt();
            self.notices.push(Notice::TimeOver);
        }

        // 4. Player and ladder
        if self.session.phase().accepts_gameplay_input() {
            if let Some(transition) = self.player.update(&self.engine, &self.keys, dt) {
                log::debug!("Ladder: {:?}", transition);
            }
        }

        // 5. Streaming
        let camera = self.player.state().position;
        self.streamer.update(camera, &mut self.engine);
        for event in self.streamer.drain_events() {
            log::debug!("{:?}", event);
        }

        // 6. Camera
        let state = self.player.state();
        self.engine.set_camera(state.position, state.pitch, state.yaw);
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ImportProgress { ticket, loaded, total } => {
                if self.environment == Some(ticket) {
                    self.session.set_loading_progress(loaded, total);
                }
            }
            EngineEvent::ModelImported { ticket, result } => {
                if self.environment == Some(ticket) {
                    self.environment = None;
                    self.on_environment(&result);
                } else {
                    self.streamer.on_import(ticket, &result, &mut self.engine);
                }
            }
            EngineEvent::AnimationFinished(handle) => {
                if let Some(event) = self.lockables.on_animation_finished(handle) {
                    log::debug!("{:?}", event);
                }
            }
        }
    }

    fn on_environment(&mut self, result: &std::result::Result<ImportedModel, ImportError>) {
        let report = bootstrap::populate(
            &mut self.engine,
            &self.config.environment,
            result,
            &mut self.pickups,
            &mut self.lockables,
        );
        self.report = Some(report);
        self.session.finish_loading();
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ClosePrompt => {
                self.prompt_close = None;
                self.prompt = None;
            }
            DeferredAction::DeclareEscape => {
                if self.session.escape() {
                    self.close_prompt();
                    self.notices.push(Notice::Escaped);
                }
            }
        }
    }

    /// Key pressed
    pub fn key_down(&mut self, key: KeyCode) {
        if self.disposed || !self.keys.press(key) {
            return;
        }
        if !self.session.phase().accepts_gameplay_input() {
            return;
        }

        if self.prompt.is_some() {
            if self.config.bindings.close_prompt.contains(&key) {
                self.close_prompt();
            }
            return;
        }
        if self.config.bindings.use_door.contains(&key) {
            self.use_door();
        } else if self.config.bindings.light.contains(&key) {
            self.toggle_light();
        }
    }

    /// Key released
    pub fn key_up(&mut self, key: KeyCode) {
        if self.disposed {
            return;
        }
        self.keys.release(key);
    }

    /// Pointer moved by a screen delta
    pub fn pointer_move(&mut self, delta_x: f32, delta_y: f32) {
        if self.disposed || !self.session.phase().accepts_gameplay_input() {
            return;
        }
        self.player.look(delta_x, delta_y);
    }

    /// Pointer clicked at screen coordinates
    pub fn pointer_click(&mut self, x: f32, y: f32) {
        if self.disposed || self.prompt.is_some() || !self.session.phase().accepts_gameplay_input() {
            return;
        }
        let Some(hit) = self.engine.pick_at(x, y) else {
            return;
        };
        match interaction::resolve_pick(&self.engine, hit, &self.pickups, &self.lockables) {
            Some(PickTarget::Item(mesh)) => self.pick_item(mesh),
            Some(PickTarget::Lockable(id)) => self.pick_lockable(id),
            None => log::debug!("Pick on {:?} hit nothing interactive", hit),
        }
    }

    fn pick_item(&mut self, mesh: ward_core::MeshHandle) {
        match self.pickups.collect(mesh) {
            PickupOutcome::Collected(kind) => {
                self.engine.set_enabled(mesh, false);
                if self.inventory.grant(kind) {
                    self.notices.push(Notice::ItemAcquired(kind));
                }
            }
            PickupOutcome::AlreadyCollected(kind) => log::debug!("{} already collected", kind),
            PickupOutcome::NotVisible(kind) => log::debug!("{} is not visible yet", kind),
            PickupOutcome::NotAnItem => {}
        }
    }

    fn pick_lockable(&mut self, id: ward_core::LockableId) {
        let Some(lockable) = self.lockables.get(&id) else {
            return;
        };
        if lockable.is_locked() {
            match lockable.gate().clone() {
                Gate::Puzzle(puzzle) => {
                    self.prompt = PromptSession::open(&self.puzzles, &puzzle);
                    if self.prompt.is_none() {
                        log::warn!("{} is gated by unknown puzzle {}", id, puzzle);
                    }
                }
                Gate::Item(kind) => self.notices.push(Notice::Locked(kind)),
            }
            return;
        }
        match self.lockables.toggle(&id, &mut self.engine) {
            Ok(outcome) => self.after_toggle(outcome),
            Err(err) => log::warn!("{}", err),
        }
    }

    fn use_door(&mut self) {
        let position = self.player.state().position;
        let result = interaction::use_nearest_door(
            &mut self.engine,
            &mut self.lockables,
            &mut self.inventory,
            position,
            self.config.interaction.door_range,
        );
        match result {
            Ok(DoorUse::OutOfRange) => self.notices.push(Notice::OutOfRange),
            Ok(DoorUse::MissingItem(kind)) => self.notices.push(Notice::MissingItem(kind)),
            Ok(DoorUse::Unlocked { door, item, outcome }) => {
                log::info!("{} opened with the {}", door, item);
                self.notices.push(Notice::ItemUsed(item));
                self.after_toggle(outcome);
            }
            Ok(DoorUse::Toggled { outcome, .. }) => self.after_toggle(outcome),
            Err(err) => log::warn!("{}", err),
        }
    }

    fn after_toggle(&mut self, outcome: ToggleOutcome) {
        if let ToggleOutcome::Started { escape: true, .. } = outcome {
            log::info!("Exit door opening");
            self.scheduler
                .schedule(self.config.interaction.escape_delay, DeferredAction::DeclareEscape);
        }
    }

    fn toggle_light(&mut self) {
        let intensity = self.config.environment.lighting.spot_intensity;
        if interaction::toggle_flashlight(&mut self.engine, &mut self.inventory, intensity).is_none() {
            self.notices.push(Notice::MissingItem(ward_core::ItemKind::Flashlight));
        }
    }

    /// Replace the prompt's text field
    pub fn set_prompt_input(&mut self, text: &str) {
        if self.disposed {
            return;
        }
        if let Some(prompt) = &mut self.prompt {
            prompt.set_input(text);
        }
    }

    /// Submit the prompt's text field
    pub fn submit_answer(&mut self) -> Option<SubmitOutcome> {
        if self.disposed {
            return None;
        }
        let prompt = self.prompt.as_mut()?;
        let outcome = match prompt.submit(&mut self.puzzles) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("{}", err);
                return None;
            }
        };

        match &outcome {
            SubmitOutcome::Solved { reward, unlock } => {
                self.notices.push(Notice::PuzzleSolved);
                self.apply_reward(*reward);
                if let Some(target) = unlock {
                    if let Err(err) = self.lockables.unlock(target) {
                        log::warn!("Solved puzzle unlocks nothing: {}", err);
                    }
                }
                let task = self
                    .scheduler
                    .schedule(self.config.interaction.prompt_close_delay, DeferredAction::ClosePrompt);
                self.prompt_close = Some(task);
            }
            SubmitOutcome::Mismatch => self.notices.push(Notice::WrongAnswer),
            SubmitOutcome::AlreadySolved => log::debug!("Puzzle already solved"),
        }
        Some(outcome)
    }

    fn apply_reward(&mut self, reward: Reward) {
        match reward {
            Reward::Grant(kind) => {
                if self.inventory.grant(kind) {
                    self.notices.push(Notice::ItemAcquired(kind));
                }
            }
            Reward::Reveal(kind) => {
                let meshes = self.pickups.reveal(kind);
                if meshes.is_empty() {
                    log::warn!("Nothing to reveal for {}", kind);
                    return;
                }
                for mesh in meshes {
                    self.engine.set_enabled(mesh, true);
                }
                self.notices.push(Notice::ItemRevealed(kind));
            }
            Reward::Nothing => {}
        }
    }

    /// Dismiss the prompt
    pub fn close_prompt(&mut self) {
        if let Some(task) = self.prompt_close.take() {
            self.scheduler.cancel(task);
        }
        self.prompt = None;
    }

    /// Messages since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Teleport the player (scripted sequences and tests)
    pub fn place_player(&mut self, position: glam::Vec3) {
        self.player.set_position(position);
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn pickups(&self) -> &PickupTable {
        &self.pickups
    }

    pub fn lockables(&self) -> &LockableRegistry {
        &self.lockables
    }

    pub fn puzzles(&self) -> &PuzzleBook {
        &self.puzzles
    }

    pub fn prompt(&self) -> Option<&PromptSession> {
        self.prompt.as_ref()
    }

    pub fn streamer(&self) -> &RegionStreamer {
        &self.streamer
    }

    /// Bootstrap outcome, once the environment has loaded
    pub fn report(&self) -> Option<&BootstrapReport> {
        self.report.as_ref()
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
