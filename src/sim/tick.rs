//! Per-frame simulation step
//!
//! Fixed order within a frame: paddle, launch gesture, aim refresh, balls,
//! out-of-bounds pruning, power-up triggers, win/lose check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{Block, PowerUp};
use super::state::{GameEvent, GameLogic, GameStatus};
use crate::consts::*;
use crate::settings::Config;
use crate::try_normalize;

/// Discrete hand pose reported by the gesture tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    #[default]
    None,
    Fist,
    Open,
    Peace,
    Partial,
}

/// Hand state whose rising edge drives aim, launch and power-shot
pub const LAUNCH_GESTURE: HandState = HandState::Fist;

/// One frame of tracker input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Normalized horizontal pointer position [0, 1]
    pub pointer_x: f32,
    /// Normalized vertical pointer position [0, 1]
    pub pointer_y: f32,
    pub hand_state: HandState,
    /// False when no hand was found this frame
    pub detected: bool,
}

impl Default for InputSample {
    fn default() -> Self {
        Self {
            pointer_x: 0.5,
            pointer_y: 0.5,
            hand_state: HandState::None,
            detected: false,
        }
    }
}

impl InputSample {
    pub fn new(pointer_x: f32, pointer_y: f32, hand_state: HandState, detected: bool) -> Self {
        Self {
            pointer_x,
            pointer_y,
            hand_state,
            detected,
        }
    }

    /// Undetected or non-finite samples become the default (no hand);
    /// pointer coordinates are clamped to [0, 1].
    pub fn sanitized(&self) -> Self {
        if !self.detected || !self.pointer_x.is_finite() || !self.pointer_y.is_finite() {
            return Self::default();
        }
        Self {
            pointer_x: self.pointer_x.clamp(0.0, 1.0),
            pointer_y: self.pointer_y.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Pointer position in playfield coordinates
    pub fn pointer(&self, config: &Config) -> Vec2 {
        Vec2::new(
            self.pointer_x * config.screen_width,
            self.pointer_y * config.screen_height,
        )
    }
}

/// Advance the game by one frame
pub fn tick(game: &mut GameLogic, input: &InputSample) -> GameStatus {
    let input = input.sanitized();
    game.events.clear();

    game.paddle.update(&game.config, &input);

    handle_launch_gesture(game, &input);
    game.last_hand_state = input.hand_state;

    if game.aim_mode && input.detected {
        update_aim(game, &input);
    }

    for ball in game.balls.iter_mut() {
        if ball.update(&game.config, &game.paddle, &mut game.blocks) {
            game.score += SCORE_PER_HIT;
        }
    }

    let before = game.balls.len();
    let config = game.config;
    game.balls.retain(|ball| !ball.is_out_of_bounds(&config));
    for _ in game.balls.len()..before {
        game.events.push(GameEvent::BallLost);
    }

    trigger_power_ups(game);

    check_level_state(game)
}

/// Aim → launch → power-shot, on the rising edge of the launch gesture
fn handle_launch_gesture(game: &mut GameLogic, input: &InputSample) {
    let rising_edge = input.hand_state == LAUNCH_GESTURE && game.last_hand_state != LAUNCH_GESTURE;
    if !rising_edge || !game.paddle.can_perform_fist_action() {
        return;
    }

    if game.balls.is_empty() {
        if game.aim_mode {
            game.launch_ball_with_aim();
            game.aim_mode = false;
            game.trajectory.clear();
        } else {
            game.aim_mode = true;
            game.events.push(GameEvent::AimModeEntered);
            log::debug!("Aim mode");
        }
        game.paddle.perform_fist_action();
    } else if game.power_shots_remaining > 0 {
        game.activate_power_shots();
        game.power_shots_remaining -= 1;
        game.paddle.perform_fist_action();
        game.events.push(GameEvent::PowerShotActivated {
            remaining: game.power_shots_remaining,
        });
        log::debug!("Power shot, {} left", game.power_shots_remaining);
    }
}

/// Point the aim from the paddle toward the hand, smoothed, never downward
fn update_aim(game: &mut GameLogic, input: &InputSample) {
    let origin = Vec2::new(game.paddle.center_x(), game.paddle.y);
    let mut raw = input.pointer(&game.config) - origin;
    raw.x *= AIM_SENSITIVITY;

    let Some(dir) = try_normalize(raw) else {
        return;
    };
    let target = Vec2::new(dir.x, dir.y.min(AIM_MAX_Y));

    game.smoothed_aim = game.smoothed_aim * (1.0 - AIM_SMOOTHING) + target * AIM_SMOOTHING;
    if let Some(aim) = try_normalize(game.smoothed_aim) {
        game.aim_vector = aim;
    }

    let start = game.launch_point();
    game.trajectory = game
        .predictor
        .simulate(&game.config, start, game.aim_vector, &game.blocks);
}

/// Fire each destroyed power-up block's effect exactly once
fn trigger_power_ups(game: &mut GameLogic) {
    let triggered: Vec<PowerUp> = game
        .blocks
        .iter_mut()
        .filter_map(Block::take_power_up)
        .collect();

    for power_up in triggered {
        match power_up {
            PowerUp::ExtraBall => game.spawn_extra_ball(),
            PowerUp::SpeedUp => game.paddle.activate_speed_up(),
            PowerUp::BigPaddle => game.paddle.activate_big_paddle(&game.config),
        }
        game.events.push(GameEvent::PowerUpTriggered(power_up));
        log::debug!("Power-up {:?}", power_up);
    }
}

fn check_level_state(game: &mut GameLogic) -> GameStatus {
    if game.blocks.iter().all(Block::is_destroyed) {
        let completed = game.level;
        log::info!("Level {} complete, score {}", completed, game.score);
        game.level += 1;
        game.load_level(game.level);
        game.balls.clear();
        game.events.push(GameEvent::LevelComplete { level: completed });
        return GameStatus::LevelComplete;
    }

    // Nothing left to hit and nothing in play
    if game.balls.is_empty() && !game.blocks.iter().any(|b| !b.is_destroyed()) {
        return GameStatus::GameOver;
    }

    GameStatus::Playing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::ball::Ball;
    use crate::sim::block::BlockKind;

    fn hand(x: f32, y: f32, state: HandState) -> InputSample {
        InputSample::new(x, y, state, true)
    }

    fn open() -> InputSample {
        hand(0.5, 0.3, HandState::Open)
    }

    fn fist() -> InputSample {
        hand(0.5, 0.3, HandState::Fist)
    }

    /// Let the fist debounce run out
    fn wait_cooldown(game: &mut GameLogic) {
        for _ in 0..FIST_ACTION_COOLDOWN {
            game.update(&open());
        }
    }

    #[test]
    fn test_sanitize_input() {
        let nan = InputSample::new(f32::NAN, 0.2, HandState::Fist, true).sanitized();
        assert!(!nan.detected);
        assert_eq!(nan.hand_state, HandState::None);

        let wide = InputSample::new(1.7, -0.3, HandState::Open, true).sanitized();
        assert_eq!((wide.pointer_x, wide.pointer_y), (1.0, 0.0));

        let lost = InputSample::new(0.2, 0.2, HandState::Fist, false).sanitized();
        assert_eq!(lost, InputSample::default());
    }

    #[test]
    fn test_aim_then_launch() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);

        assert_eq!(game.update(&fist()), GameStatus::Playing);
        assert!(game.aim_mode);
        assert!(game.events().contains(&GameEvent::AimModeEntered));
        assert!(!game.trajectory.is_empty());
        assert!(game.balls.is_empty());

        // Holding the fist does not fire again
        game.update(&fist());
        assert!(game.aim_mode);

        wait_cooldown(&mut game);
        game.update(&fist());
        assert!(!game.aim_mode);
        assert!(game.trajectory.is_empty());
        assert_eq!(game.balls.len(), 1);

        let ball = &game.balls[0];
        assert!(ball.vel.y < 0.0);
        assert!((ball.speed() - LAUNCH_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_fist_edge_ignored_during_cooldown() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.update(&fist());
        game.update(&open());
        game.update(&fist());
        // Second edge came within the debounce window
        assert!(game.aim_mode);
        assert!(game.balls.is_empty());
    }

    #[test]
    fn test_power_shot_arms_all_balls() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        assert_eq!(game.power_shots_remaining, 2);
        game.balls.push(Ball::new(Vec2::new(300.0, 500.0), Vec2::new(0.0, -6.0)));
        game.balls.push(Ball::new(Vec2::new(700.0, 500.0), Vec2::new(0.0, -6.0)));

        game.update(&fist());

        assert!(game.balls.iter().all(|b| b.power_shot));
        assert_eq!(game.power_shots_remaining, 1);
        assert!(game.events().contains(&GameEvent::PowerShotActivated { remaining: 1 }));
    }

    #[test]
    fn test_no_power_shots_left() {
        let mut game = GameLogic::new(Difficulty::Expert, 1);
        game.balls.push(Ball::new(Vec2::new(300.0, 500.0), Vec2::new(0.0, -6.0)));
        game.update(&fist());
        assert!(!game.balls[0].power_shot);
        assert_eq!(game.power_shots_remaining, 0);
        assert!(game.paddle.can_perform_fist_action());
    }

    #[test]
    fn test_clearing_level_advances() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.balls.push(Ball::new(Vec2::new(500.0, 500.0), Vec2::new(0.0, -6.0)));
        for block in &mut game.blocks {
            block.shatter();
        }
        // Consume power-ups so only the level state matters
        for block in &mut game.blocks {
            block.take_power_up();
        }

        assert_eq!(game.update(&open()), GameStatus::LevelComplete);
        assert_eq!(game.level, 2);
        assert!(game.balls.is_empty());
        assert_eq!(game.blocks.len(), 60);
        assert!(game.blocks.iter().all(|b| !b.is_destroyed()));
        assert_eq!(game.level_name, "MEDIUM Level 2");
        assert!(game.events().contains(&GameEvent::LevelComplete { level: 1 }));
    }

    #[test]
    fn test_lost_ball_keeps_playing() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.balls.push(Ball::new(Vec2::new(100.0, 745.0), Vec2::new(0.0, 8.0)));
        assert_eq!(game.update(&open()), GameStatus::Playing);
        assert!(game.balls.is_empty());
        assert!(game.events().contains(&GameEvent::BallLost));
    }

    #[test]
    fn test_scoring_per_hit() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        // Straight under a row-5 block (y 280..310)
        let target = game.blocks[50].rect;
        let x = target.center().x;
        game.balls.push(Ball::new(Vec2::new(x, target.bottom() + 14.0), Vec2::new(0.0, -8.0)));
        game.update(&InputSample::default());
        assert_eq!(game.score, SCORE_PER_HIT);
    }

    #[test]
    fn test_two_balls_hit_same_block_in_one_frame() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.blocks = vec![
            Block::new(460.0, 300.0, BlockKind::Strong),
            Block::new(800.0, 100.0, BlockKind::Normal),
        ];
        // Both rise into the strong block's underside (y 330)
        game.balls.push(Ball::new(Vec2::new(480.0, 344.0), Vec2::new(0.0, -8.0)));
        game.balls.push(Ball::new(Vec2::new(520.0, 344.0), Vec2::new(0.0, -8.0)));

        assert_eq!(game.update(&InputSample::default()), GameStatus::Playing);
        assert_eq!(game.blocks[0].hits(), 2);
        assert!(game.blocks[0].is_destroyed());
        assert_eq!(game.score, 2 * SCORE_PER_HIT);
        assert!(game.balls.iter().all(|b| b.vel.y > 0.0));
    }

    #[test]
    fn test_power_up_blocks_fire_once() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.blocks = vec![
            Block::new(50.0, 80.0, BlockKind::ExtraBall),
            Block::new(140.0, 80.0, BlockKind::SpeedUp),
            Block::new(230.0, 80.0, BlockKind::BigPaddle),
            Block::new(320.0, 80.0, BlockKind::Normal),
        ];
        for block in game.blocks.iter_mut().take(3) {
            block.hit();
        }

        game.update(&InputSample::default());
        assert_eq!(game.balls.len(), 1);
        assert!(game.paddle.power_ups.speed_up.is_some());
        assert!(game.paddle.is_big());
        assert!(game.blocks.iter().all(|b| b.kind == BlockKind::Normal));

        game.update(&InputSample::default());
        assert_eq!(game.balls.len(), 1);
    }

    #[test]
    fn test_aim_never_points_down() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.aim_mode = true;
        for _ in 0..60 {
            // Hand well below the paddle
            game.update(&hand(0.9, 1.0, HandState::Open));
            assert!(game.aim_vector.y < 0.0);
            assert!((game.aim_vector.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_aim_is_smoothed() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        let input = hand(1.0, 0.5, HandState::Open);
        // Park the paddle at the right edge first
        for _ in 0..40 {
            game.update(&input);
        }
        assert!((game.paddle.center_x() - 950.0).abs() < 1e-2);

        game.aim_mode = true;
        game.update(&input);
        let first = game.aim_vector;
        for _ in 0..30 {
            game.update(&input);
        }

        // Hand at (1000, 350), paddle top centre at (950, 660)
        let target = Vec2::new(50.0 * AIM_SENSITIVITY, -310.0).normalize();
        assert!(first.x > 0.0 && first.x < target.x / 2.0);
        assert!((game.aim_vector - target).length() < 0.01);
    }

    #[test]
    fn test_undetected_hand_freezes_aim() {
        let mut game = GameLogic::new(Difficulty::Medium, 1);
        game.aim_mode = true;
        game.update(&hand(0.8, 0.3, HandState::Open));
        let aim = game.aim_vector;
        game.update(&InputSample::default());
        assert_eq!(game.aim_vector, aim);
    }
}
