//! Bullet Hell headless runner
//!
//! Plays one round with a scripted pointer and prints the final snapshot as
//! JSON. Rendering and device polling belong to the host; this binary is the
//! session control surface for soak runs and replays.
//!
//! Environment:
//! - `GAME_RAND_SEED`: RNG seed (default 0)
//! - `BULLET_HELL_TUNING`: tuning JSON file
//! - `BULLET_HELL_PATTERNS`: pattern set JSON file
//! - `BULLET_HELL_MAX_TICKS`: give up after this many ticks
//! - `RUST_LOG`: log filter (env_logger)

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::f32::consts::TAU;

    use bullet_hell::consts::TICK_RATE;
    use bullet_hell::sim::{BarrageSet, GameMode, PointerTracker, TickInput, World, tick};
    use bullet_hell::{ConfigError, Result, Tuning};
    use glam::Vec2;

    /// Five minutes of play
    const DEFAULT_MAX_TICKS: u64 = TICK_RATE * 60 * 5;

    fn env_u64(key: &str) -> Option<u64> {
        std::env::var(key).ok()?.trim().parse().ok()
    }

    fn load_config() -> Result<(Tuning, BarrageSet)> {
        let tuning = match std::env::var("BULLET_HELL_TUNING") {
            Ok(path) => Tuning::load(path)?,
            Err(_) => Tuning::default(),
        };
        let patterns = match std::env::var("BULLET_HELL_PATTERNS") {
            Ok(path) => BarrageSet::load(path)?,
            Err(_) => BarrageSet::default(),
        };
        Ok((tuning, patterns))
    }

    /// Sweep side to side under the enemy
    fn autopilot(frame: u64) -> Vec2 {
        let phase = TAU * (frame % 360) as f32 / 360.0;
        Vec2::new(320.0 + 140.0 * phase.sin(), 400.0)
    }

    /// Hold the pointer down, lifting for a frame whenever the grab was lost
    fn next_input(world: &World, tracker: &mut PointerTracker, frame: u64) -> TickInput {
        if tracker.is_down() && !world.pointer_grabbed && world.mode == GameMode::Playing {
            return tracker.sample_mouse(None);
        }
        tracker.sample_mouse(Some(autopilot(frame)))
    }

    pub fn run() -> Result<()> {
        let seed = env_u64("GAME_RAND_SEED").unwrap_or(0);
        let max_ticks = env_u64("BULLET_HELL_MAX_TICKS").unwrap_or(DEFAULT_MAX_TICKS);
        let (tuning, patterns) = load_config()?;
        log::info!(
            "Bullet Hell starting (seed {}, {} patterns, max {} ticks)",
            seed,
            patterns.patterns.len(),
            max_ticks
        );

        let mut world = World::new(seed, tuning);
        let mut tracker = PointerTracker::new();
        for frame in 0..max_ticks {
            let input = next_input(&world, &mut tracker, frame);
            tick(&mut world, &input, &patterns)?;
            for event in &world.events {
                log::debug!("tick {}: {:?}", world.tick, event);
            }
            if world.mode == GameMode::GameOver {
                break;
            }
        }

        if world.mode != GameMode::GameOver {
            log::warn!("Stopped after {} ticks without finishing the round", max_ticks);
        }

        let json = serde_json::to_string_pretty(&world.snapshot()).map_err(ConfigError::from)?;
        println!("{json}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();

    match native::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Run aborted: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host embeds the library directly on the web
}
