//! Timber Run entry point
//!
//! The native build runs an unattended demo game against a headless scene,
//! saving progress as JSON files in the given directory:
//!
//! ```text
//! timber-run [DATA_DIR]
//! ```
//!
//! Set `RUST_LOG=debug` to watch every pickup and delivery.

#[cfg(not(target_arch = "wasm32"))]
use timber_run::{
    Settings,
    platform::{FileStorage, HeadlessScene},
    sim::{GamePhase, Session},
};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_DATA_DIR: &str = "timber-run-save";

/// Fixed simulation step (seconds)
#[cfg(not(target_arch = "wasm32"))]
const DT: f32 = 1.0 / 60.0;

/// Give up after this many frames (about an hour of game time)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Timber Run (native demo) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> timber_run::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let storage = FileStorage::open(&data_dir)?;
    let settings = Settings::load(&storage)?;
    log::info!("Saving to {data_dir}");

    let mut session = Session::new(storage, HeadlessScene::new(), settings)?;
    session.start_game()?;

    for frame in 0..MAX_FRAMES {
        match session.phase() {
            GamePhase::LevelComplete => {
                log::info!(
                    "Level {} cleared after {:.1}s",
                    session.state().current_level,
                    frame as f32 * DT
                );
                session.advance()?;
            }
            GamePhase::AllComplete => {
                let stats = session.stats();
                log::info!(
                    "All levels complete: {} log(s) delivered over {} game(s)",
                    stats.total_logs_delivered,
                    stats.games_played
                );
                return Ok(());
            }
            _ => {}
        }

        if let Some(command) = session.autopilot_command() {
            session.dispatch(command)?;
        }
        session.tick(DT * 1000.0);
        session.scene_mut().step(DT);
    }

    log::warn!(
        "Stopped after {MAX_FRAMES} frames on level {}",
        session.state().current_level
    );
    session.exit_to_menu()?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build embeds the library; nothing runs from here
}
