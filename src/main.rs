//! Wormhole Shooter headless runner
//!
//! Plays one level with a simple autopilot and prints the final snapshot as
//! JSON. Usage: `wormhole-shooter [level] [seed]`. Set `SHOOTER_TUNING` to a
//! JSON file to override balance values.

use std::sync::mpsc;
use std::time::Duration;

use wormhole_shooter::sim::Snapshot;
use wormhole_shooter::{HostCommand, Session, ShooterSimulation, SimOptions, Tuning};

/// Host frame length (roughly a 60 fps display)
const FRAME: Duration = Duration::from_millis(16);
/// Give up after this much simulated time
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5EED);

    let options = SimOptions {
        seed,
        tuning: load_tuning(),
        ..Default::default()
    };

    let sim = match ShooterSimulation::with_options(
        level,
        options,
        |won| log::info!("Host notified: {}", if won { "victory" } else { "defeat" }),
        || log::info!("Host notified: exit"),
    ) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    log::info!("Wormhole Shooter (headless) level {level}, seed {seed}");
    let mut session = Session::new(sim);
    let (tx, rx) = mpsc::channel();

    for frame in 0..MAX_FRAMES {
        let Some(snapshot) = session.snapshot() else {
            break;
        };
        if snapshot.phase.is_terminal() {
            break;
        }
        if let Some(y) = autopilot_target(&snapshot) {
            let _ = tx.send(HostCommand::MovePlayer(y));
        }
        session.drain(&rx);
        session.advance(FRAME);

        if frame % 300 == 0 {
            log::info!(
                "t={:.1}s score {}/{} health {} enemies {}",
                session.elapsed().as_secs_f32(),
                snapshot.score,
                snapshot.target_score,
                snapshot.health,
                snapshot.enemies.len()
            );
        }
    }

    if let Some(snapshot) = session.snapshot() {
        log::info!(
            "Finished in {:?}: score {}/{} health {}",
            snapshot.phase,
            snapshot.score,
            snapshot.target_score,
            snapshot.health
        );
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to serialize report: {err}"),
        }
    }

    let _ = tx.send(HostCommand::Complete);
    let _ = tx.send(HostCommand::Exit);
    session.drain(&rx);
}

/// Read overrides from `SHOOTER_TUNING`, falling back to defaults
fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("SHOOTER_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring {path}: {err}");
                Tuning::default()
            }
        },
        Err(err) => {
            log::warn!("Cannot read {path}: {err}");
            Tuning::default()
        }
    }
}

/// Line up with the enemy closest to the player's column
fn autopilot_target(snapshot: &Snapshot) -> Option<f32> {
    snapshot
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|enemy| enemy.pos.y)
}
