//! Gesture Breaker - physics and game-state core of a block breaking game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (ball physics, collisions, aim preview, game state)
//! - `settings`: Difficulty presets and the immutable playfield configuration
//!
//! Input acquisition, rendering and level-file storage live outside this crate.
//! The core consumes one [`sim::InputSample`] per frame and reports a
//! [`sim::GameStatus`] back to the presentation layer.

pub mod settings;
pub mod sim;

pub use settings::{Config, Difficulty, DifficultyPreset};

use glam::Vec2;

/// Game tuning constants (units are playfield units and frames)
pub mod consts {
    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Slowest the ball may travel (units/frame)
    pub const BALL_MIN_SPEED: f32 = 5.0;
    /// Fastest the ball may travel (units/frame)
    pub const BALL_MAX_SPEED: f32 = 12.0;
    /// Trail lengths (normal / power-shot)
    pub const TRAIL_LENGTH: usize = 6;
    pub const POWER_SHOT_TRAIL_LENGTH: usize = 10;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance from the bottom edge of the playfield to the paddle top
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Fraction of the remaining distance to target covered per frame
    pub const PADDLE_FOLLOW: f32 = 0.4;
    /// Paddle catches the ball up to this far below its bottom edge
    pub const PADDLE_CATCH_DEPTH: f32 = 10.0;
    /// Paddle bounce: max deflection is ±π/4.4 (~41° either side of vertical)
    pub const PADDLE_DEFLECT_DIVISOR: f32 = 2.2;
    pub const PADDLE_BOUNCE_DAMPING: f32 = 0.85;

    /// Power-ups
    pub const BIG_PADDLE_WIDTH: f32 = 150.0;
    pub const BOOSTED_PADDLE_SPEED: f32 = 12.0;
    pub const POWER_UP_DURATION: u32 = 600;

    /// Gesture debounce (frames)
    pub const FIST_ACTION_COOLDOWN: u32 = 30;
    pub const PEACE_COOLDOWN: u32 = 1200;

    /// Power shot
    pub const POWER_SHOT_DURATION: u32 = 100;
    pub const POWER_SHOT_RADIUS: f32 = 40.0;

    /// Launching
    pub const LAUNCH_SPEED: f32 = 8.0;
    /// Balls spawn this far above the paddle top
    pub const LAUNCH_OFFSET: f32 = 20.0;
    pub const EXTRA_BALL_VEL_X: f32 = 4.0;
    pub const EXTRA_BALL_VEL_Y: f32 = -6.0;

    /// Aiming
    pub const AIM_SENSITIVITY: f32 = 1.8;
    /// Aim vector never points lower than this (negative is up)
    pub const AIM_MAX_Y: f32 = -0.15;
    pub const AIM_SMOOTHING: f32 = 0.25;

    /// Blocks
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;

    /// Scoring
    pub const SCORE_PER_HIT: u64 = 5;
}

/// Normalize a vector, returning `None` for zero-length input
#[inline]
pub fn try_normalize(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Rescale `vel` so its magnitude lies in `[min, max]`, keeping its direction.
///
/// A zero velocity has no direction to keep; it is replaced by a straight-up
/// velocity at `min`.
#[inline]
pub fn clamp_speed(vel: Vec2, min: f32, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed <= f32::EPSILON {
        return Vec2::new(0.0, -min);
    }
    if speed < min {
        vel * (min / speed)
    } else if speed > max {
        vel * (max / speed)
    } else {
        vel
    }
}
