//! Hollow Ward headless run
//!
//! Plays a scripted session against the in-memory engine and logs what
//! happened. Useful as a smoke test of the whole dispatcher.
//!
//! Run with: cargo run -p ward_game --bin ward_headless

use glam::Vec3;
use ward_core::KeyCode;
use ward_game::{Game, GameConfig, HeadlessEngine};

const FRAME: f32 = 1.0 / 60.0;

fn run(game: &mut Game<HeadlessEngine>, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as u32;
    for _ in 0..frames {
        game.frame(FRAME);
    }
    for notice in game.drain_notices() {
        log::info!("> {}", notice);
    }
}

fn click(game: &mut Game<HeadlessEngine>, mesh: &str) {
    if game.engine_mut().aim_at(mesh).is_none() {
        log::warn!("Nothing called {} in the scene", mesh);
        return;
    }
    game.pointer_click(0.0, 0.0);
    game.engine_mut().clear_aim();
}

fn press(game: &mut Game<HeadlessEngine>, key: KeyCode) {
    game.key_down(key);
    game.frame(FRAME);
    game.key_up(key);
}

fn answer(game: &mut Game<HeadlessEngine>, text: &str) {
    game.set_prompt_input(text);
    if let Some(outcome) = game.submit_answer() {
        log::info!("Answered {:?}: {:?}", text, outcome);
    }
}

fn use_door_near(game: &mut Game<HeadlessEngine>, door: &str) {
    let position = game
        .config()
        .environment
        .lockables
        .iter()
        .find(|l| l.id.as_str() == door)
        .and_then(|l| l.position);
    let Some(position) = position else {
        log::warn!("No position for {}", door);
        return;
    };
    game.place_player(position + Vec3::new(2.0, 2.0, 0.0));
    press(game, KeyCode::letter('e'));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let (engine, events) = HeadlessEngine::hospital(&config);
    let mut game = match Game::new(engine, events, config) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    // Keep the environment in flight for a moment, as a real import would be
    game.attach();
    game.engine_mut().set_hold_imports(true);
    game.start();
    run(&mut game, 0.5);
    log::info!(
        "Phase while importing: {:?} ({:.0}%)",
        game.phase(),
        game.session().loading_progress()
    );
    game.engine_mut().set_hold_imports(false);
    game.engine_mut().release_imports();
    run(&mut game, 0.5);
    log::info!("Phase after loading: {:?}, {} scene nodes", game.phase(), game.engine().node_count());

    click(&mut game, "flashlight");
    press(&mut game, KeyCode::letter('f'));

    click(&mut game, "cupboard_left");
    answer(&mut game, "401");
    answer(&mut game, "410");
    run(&mut game, 3.5);

    click(&mut game, "problem_door");
    answer(&mut game, "1953");
    run(&mut game, 3.5);
    click(&mut game, "key");

    click(&mut game, "vault_door");
    answer(&mut game, "0614");
    run(&mut game, 3.5);
    click(&mut game, "id_card");

    use_door_near(&mut game, "security_door");
    use_door_near(&mut game, "storage_door");
    use_door_near(&mut game, "exit_door");
    run(&mut game, 15.0);

    let held: Vec<String> = game.inventory().held().map(|k| k.to_string()).collect();
    log::info!(
        "Finished in {:?} with [{}], {} of {} puzzles solved, {} left on the clock",
        game.phase(),
        held.join(", "),
        game.puzzles().solved_count(),
        game.puzzles().len(),
        game.session().countdown().display()
    );

    game.teardown();
    log::info!("{} scene nodes left after teardown", game.engine().node_count());
}
