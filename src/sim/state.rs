//! Game state owned by the simulation
//!
//! [`GameLogic`] exclusively owns the balls and blocks of the current level.
//! Other threads should only ever see a [`GameSnapshot`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::{Block, PowerUp};
use super::level::{LevelSource, NoLevels, load_level};
use super::paddle::Paddle;
use super::tick::{HandState, InputSample, tick};
use super::trajectory::TrajectoryPredictor;
use crate::consts::*;
use crate::settings::{Config, Difficulty};

/// Result of one frame, consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Playing,
    LevelComplete,
    GameOver,
}

/// Things that happened during the last frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AimModeEntered,
    BallLaunched { direction: Vec2 },
    PowerShotActivated { remaining: u32 },
    PowerUpTriggered(PowerUp),
    BallLost,
    LevelComplete { level: u32 },
}

/// Copy of the observable state, safe to hand to other threads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub difficulty: Difficulty,
    pub score: u64,
    pub level: u32,
    pub level_name: String,
    pub power_shots_remaining: u32,
    pub aim_mode: bool,
    pub aim_vector: Vec2,
    pub trajectory: Vec<Vec2>,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
}

/// The simulation controller
pub struct GameLogic {
    pub(crate) config: Config,
    pub difficulty: Difficulty,
    pub ball_speed_multiplier: f32,
    pub paddle_size_multiplier: f32,
    pub power_shots_remaining: u32,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub level_name: String,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub aim_mode: bool,
    /// Unit launch direction (negative y is up)
    pub aim_vector: Vec2,
    /// Aim preview polyline, empty outside aim mode
    pub trajectory: Vec<Vec2>,
    pub predictor: TrajectoryPredictor,
    pub(crate) smoothed_aim: Vec2,
    pub(crate) last_hand_state: HandState,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    levels: Box<dyn LevelSource>,
}

impl GameLogic {
    /// New game on the default playfield with procedurally generated levels
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_levels(Config::default(), difficulty, seed, Box::new(NoLevels))
    }

    pub fn with_levels(
        config: Config,
        difficulty: Difficulty,
        seed: u64,
        levels: Box<dyn LevelSource>,
    ) -> Self {
        let preset = difficulty.preset();
        let mut game = Self {
            config,
            difficulty,
            ball_speed_multiplier: preset.ball_speed_multiplier,
            paddle_size_multiplier: preset.paddle_size_multiplier,
            power_shots_remaining: preset.power_shots,
            score: 0,
            level: 1,
            level_name: String::new(),
            paddle: Paddle::new(&config, &preset),
            balls: Vec::new(),
            blocks: Vec::new(),
            aim_mode: false,
            aim_vector: Vec2::NEG_Y,
            trajectory: Vec::new(),
            predictor: TrajectoryPredictor::default(),
            smoothed_aim: Vec2::NEG_Y,
            last_hand_state: HandState::None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            levels,
        };
        game.load_level(1);
        game
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Events recorded during the most recent update
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Advance one frame
    pub fn update(&mut self, input: &InputSample) -> GameStatus {
        tick(self, input)
    }

    /// Replace the block collection with the given level's blocks
    pub fn load_level(&mut self, level: u32) {
        let loaded = load_level(self.levels.as_ref(), self.difficulty, level, &mut self.rng);
        self.level_name = loaded.name;
        self.blocks = loaded.blocks;
    }

    /// Start over at level 1 with the difficulty's starting values
    pub fn reset(&mut self) {
        log::info!("Resetting game ({})", self.difficulty.as_str());
        let preset = self.difficulty.preset();
        self.ball_speed_multiplier = preset.ball_speed_multiplier;
        self.paddle_size_multiplier = preset.paddle_size_multiplier;
        self.power_shots_remaining = preset.power_shots;
        self.score = 0;
        self.level = 1;
        self.balls.clear();
        self.load_level(1);
        self.paddle.reset(&self.config, &preset);
        self.aim_mode = false;
        self.aim_vector = Vec2::NEG_Y;
        self.smoothed_aim = Vec2::NEG_Y;
        self.trajectory.clear();
        self.last_hand_state = HandState::None;
        self.events.clear();
    }

    /// Where new balls appear: above the paddle's centre
    pub fn launch_point(&self) -> Vec2 {
        Vec2::new(self.paddle.center_x(), self.paddle.y - LAUNCH_OFFSET)
    }

    /// Fire a ball along the current aim vector
    pub fn launch_ball_with_aim(&mut self) {
        let vel = self.aim_vector * LAUNCH_SPEED * self.ball_speed_multiplier;
        self.balls.push(Ball::new(self.launch_point(), vel));
        self.events.push(GameEvent::BallLaunched {
            direction: self.aim_vector,
        });
        log::debug!("Ball launched along {:?}", self.aim_vector);
    }

    /// Extra ball from a power-up block, heading up and randomly left or right
    pub fn spawn_extra_ball(&mut self) {
        let vx = if self.rng.random_bool(0.5) {
            EXTRA_BALL_VEL_X
        } else {
            -EXTRA_BALL_VEL_X
        };
        let vel = Vec2::new(vx, EXTRA_BALL_VEL_Y) * self.ball_speed_multiplier;
        self.balls.push(Ball::new(self.launch_point(), vel));
    }

    /// Arm every live ball with a power-shot
    pub fn activate_power_shots(&mut self) {
        for ball in &mut self.balls {
            ball.arm_power_shot(POWER_SHOT_DURATION, POWER_SHOT_RADIUS);
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            difficulty: self.difficulty,
            score: self.score,
            level: self.level,
            level_name: self.level_name.clone(),
            power_shots_remaining: self.power_shots_remaining,
            aim_mode: self.aim_mode,
            aim_vector: self.aim_vector,
            trajectory: self.trajectory.clone(),
            paddle: self.paddle.clone(),
            balls: self.balls.clone(),
            blocks: self.blocks.clone(),
        }
    }
}
