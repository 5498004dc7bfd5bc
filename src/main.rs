//! Gesture Breaker headless driver
//!
//! Plays a scripted hand through the simulation and logs what happens.
//! Usage: `gesture-breaker [difficulty] [seed] [frames]`

#[cfg(not(target_arch = "wasm32"))]
use gesture_breaker::Difficulty;
#[cfg(not(target_arch = "wasm32"))]
use gesture_breaker::sim::{GameLogic, GameStatus, HandState, InputSample};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u32 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => Difficulty::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{}', using {}", name, Difficulty::default().as_str());
            Difficulty::default()
        }),
        None => Difficulty::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xB10C);
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    log::info!("Gesture Breaker (headless) starting: {} seed {}", difficulty.as_str(), seed);

    let mut game = GameLogic::new(difficulty, seed);
    let mut status = GameStatus::Playing;
    for frame in 0..frames {
        let input = scripted_hand(&game, frame);
        let next = game.update(&input);

        for event in game.events() {
            log::debug!("frame {}: {:?}", frame, event);
        }
        if next != status {
            log::info!("frame {}: {:?} (score {})", frame, next, game.score);
            status = next;
        }
        if status == GameStatus::GameOver {
            break;
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Finished on {} with score {} ({} balls, {} blocks left)",
        snapshot.level_name,
        snapshot.score,
        snapshot.balls.len(),
        snapshot.blocks.iter().filter(|b| !b.is_destroyed()).count()
    );
    match serde_json::to_string(&snapshot) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
}

/// A hand that follows the lowest falling ball and makes a fist whenever
/// there is something to launch or a power-shot worth firing
#[cfg(not(target_arch = "wasm32"))]
fn scripted_hand(game: &GameLogic, frame: u32) -> InputSample {
    let config = game.config();
    let paddle = &game.paddle;
    let travel = (config.screen_width - paddle.width).max(1.0);

    let follow_x = game
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|b| b.pos.x)
        .unwrap_or(config.screen_width / 2.0);
    let pointer_x = (follow_x - paddle.width / 2.0) / travel;

    // Alternate open/fist so each fist is a fresh gesture
    let pulse = frame % 40 < 20;
    let wants_fist = game.balls.is_empty() || frame % 400 == 0;
    let hand_state = if wants_fist && pulse {
        HandState::Fist
    } else {
        HandState::Open
    };

    InputSample::new(pointer_x, 0.3, hand_state, true)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is embedded by a host application on the web
}
