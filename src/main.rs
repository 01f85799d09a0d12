//! Pitch Rush headless runner
//!
//! Plays a session without a window: both cars are driven by a seeded random
//! key script, models "load" after a configurable delay, and the final state
//! of every body is printed.

use clap::{Parser, ValueEnum};
use glam::Vec3;

use pitch_rush::assets::{Model, ModelKey};
use pitch_rush::consts::SIM_DT;
use pitch_rush::input::{KeyCode, ScriptedKeys};
use pitch_rush::physics::{ArcadeWorld, PhysicsBackend, RapierWorld};
use pitch_rush::renderer::RecordingRenderer;
use pitch_rush::settings::SettingsError;
use pitch_rush::{Scene, SessionSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Arcade,
    Rapier,
}

#[derive(Parser, Debug)]
#[command(name = "pitch-rush")]
#[command(about = "Headless car soccer session with scripted drivers")]
struct Args {
    /// Session settings (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Simulation ticks to run (60 per second)
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Seed for the random key script
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = Backend::Arcade)]
    backend: Backend,
    /// Ticks before models finish loading
    #[arg(long, default_value_t = 0)]
    asset_delay: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Pitch Rush (headless) starting: backend={:?} ticks={} seed={}",
        args.backend,
        args.ticks,
        args.seed
    );
    match args.backend {
        Backend::Arcade => run(&args, &settings, ArcadeWorld::new(settings.gravity())),
        Backend::Rapier => run(&args, &settings, RapierWorld::new(settings.gravity())),
    }
}

fn load_settings(args: &Args) -> Result<SessionSettings, SettingsError> {
    match &args.config {
        Some(path) => SessionSettings::load(path),
        None => Ok(SessionSettings::default()),
    }
}

/// Stand-in mesh for a model key, sized from the settings that asked for it
fn placeholder_for(settings: &SessionSettings, key: &ModelKey) -> Model {
    settings
        .players
        .iter()
        .find(|p| p.model == key.0)
        .map(|p| Model::placeholder_box(Vec3::from_array(p.model_size)))
        .unwrap_or_else(|| Model::placeholder_box(Vec3::splat(settings.ball.radius * 2.0)))
}

fn run<P: PhysicsBackend>(args: &Args, settings: &SessionSettings, world: P) {
    let mut renderer = RecordingRenderer::new();
    let mut scene = Scene::new(settings, world, &mut renderer);

    let mut pool: Vec<KeyCode> = settings
        .players
        .iter()
        .flat_map(|p| p.controls.all_keys())
        .collect();
    pool.sort();
    pool.dedup();
    let mut keys = ScriptedKeys::random(args.seed, &pool, args.ticks as usize);

    while scene.ticks() < args.ticks {
        if scene.ticks() >= args.asset_delay && !scene.is_ready() {
            for key in scene.pending_models() {
                let model = placeholder_for(settings, &key);
                scene.asset_loaded(&key, &model, &mut renderer);
            }
        }
        scene.frame(&keys, SIM_DT, &mut renderer);
        keys.advance();
    }

    println!(
        "{} ticks ({:.1}s simulated), {} frames drawn",
        scene.ticks(),
        scene.ticks() as f32 * SIM_DT,
        renderer.frames
    );
    for controller in scene.driver().controllers() {
        let state = controller.state();
        match controller.body() {
            Some(_) => println!(
                "  {:<16} pos=({:8.2}, {:7.2}, {:8.2}) yaw={:+.3}",
                controller.label(),
                state.position.x,
                state.position.y,
                state.position.z,
                state.yaw
            ),
            None => println!("  {:<16} (model never loaded)", controller.label()),
        }
    }
    match scene.ball().and_then(|b| scene.world().translation(b)) {
        Some(p) => println!("  {:<16} pos=({:8.2}, {:7.2}, {:8.2})", "ball", p.x, p.y, p.z),
        None => println!("  {:<16} (model never loaded)", "ball"),
    }
}
