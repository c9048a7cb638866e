//! Cratefall entry point.
//!
//! Runs a headless session against a scripted input track: a fixed-step
//! loop identical to what a windowed frontend would drive, logging the HUD
//! state as it goes. Useful for balance tuning and soak-testing the sim
//! without a renderer attached.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cratefall::consts::SIM_DT;
use cratefall::sim::{GameState, TickInput, tick};
use cratefall::tuning::Tuning;
use cratefall::ui::HudSnapshot;

/// Scripted input: strafe a square around the floor center, jump every two
/// seconds, sprint on the long edges.
fn scripted_input(frame: u32) -> TickInput {
    let phase = (frame / 120) % 4;
    TickInput {
        forward: phase == 0,
        right: phase == 1,
        back: phase == 2,
        left: phase == 3,
        jump: frame % 240 == 0 && frame > 0,
        sprint: phase % 2 == 0,
        ..TickInput::default()
    }
}

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let tuning = Tuning::load(Path::new("tuning.json"));
    let mut state = GameState::with_setup(seed, Default::default(), tuning);
    log::info!("Cratefall headless session, seed {seed}");

    // One minute of play at the fixed sim rate
    let frames = 60 * 120;
    let mut frame = 0u32;
    while frame < frames {
        let input = scripted_input(frame);
        tick(&mut state, &input, SIM_DT);

        if frame % 600 == 0 {
            let hud = HudSnapshot::capture(&state);
            log::info!(
                "t={:5.1}s score={} health={}/{} stamina={:.2} difficulty={:.2} falling={}",
                frame as f32 * SIM_DT,
                hud.score,
                hud.health,
                hud.max_health,
                hud.stamina,
                state.difficulty,
                state.falling.len(),
            );
        }
        if state.player_dead {
            log::info!(
                "Player died at t={:.1}s with score {}",
                frame as f32 * SIM_DT,
                state.score
            );
            break;
        }
        frame += 1;
    }

    let hud = HudSnapshot::capture(&state);
    log::info!(
        "Session over: score={} health={}/{} survived={:.1}s",
        hud.score,
        hud.health,
        hud.max_health,
        frame as f32 * SIM_DT,
    );
}
