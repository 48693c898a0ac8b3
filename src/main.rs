//! Mikan Delivery entry point
//!
//! Runs a headless session with a scripted player and logs the result.
//! Usage: `mikan-delivery [seed] [params.json]`

use mikan_delivery::Params;
use mikan_delivery::consts::*;
use mikan_delivery::sim::{EndReason, GameEvent, GamePhase, GameState, TickInput, tick};

/// Give up after this many ticks (10 minutes at 30 Hz)
const MAX_TICKS: u64 = 30 * 60 * 10;

fn load_params(path: Option<String>) -> Params {
    let Some(path) = path else {
        return Params::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => Params::from_json_or_default(&json),
        Err(err) => {
            log::warn!("Could not read {path}: {err}, using default parameters");
            Params::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(20240601);
    let params = load_params(args.next());

    log::info!("Mikan Delivery (headless) starting, seed {seed}");

    let mut state = GameState::new(seed, &params);
    let mut sweep = 0.0f32;

    while state.phase != GamePhase::GameOver && state.time_ticks < MAX_TICKS {
        // Sweep the pointer back and forth, dropping whenever allowed
        sweep += SIM_DT * 0.7;
        let x = PLAY_WIDTH * 0.5 + (PLAY_WIDTH * 0.4) * sweep.sin();
        let input = TickInput {
            pointer_x: Some(x),
            drop: true,
            ..Default::default()
        };
        tick(&mut state, &input, &params, SIM_DT);

        for event in state.drain_events() {
            if let GameEvent::Merged { rank, pos } = event {
                log::debug!(
                    "Merged into {} at ({:.0}, {:.0})",
                    params.fruit(rank).name,
                    pos.x,
                    pos.y
                );
            }
        }
    }

    if state.phase != GamePhase::GameOver {
        state.end_game(EndReason::ShippedOut, &params);
    }

    let score = &state.score;
    println!("Result: {}", state.end_reason.map(|r| r.as_str()).unwrap_or("-"));
    println!("  Ticks:           {}", state.time_ticks);
    println!("  Mikan delivered: {}", score.delivered_count());
    println!("  Rotten mikan:    {}", score.rotten_count());
    println!("  Total freshness: {:.0}", score.fresh_sum());
    println!("  Effective fresh: {:.0}", score.effective_fresh(&params));
    if score.rotten_count() > 0 {
        println!("  Rot damage:      -{:.1}%", score.rot_damage_percent(&params));
    }
    println!("  Final score:     {}", score.score(&params));
    println!("  {}", score.verdict(&params).message());
}
