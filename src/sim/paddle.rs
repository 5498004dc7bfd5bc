//! The player's paddle
//!
//! Follows the pointer with exponential smoothing and carries the power-up
//! timers and the gesture debounce counters.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::tick::{HandState, InputSample};
use crate::consts::*;
use crate::settings::{Config, DifficultyPreset};

/// Hand state that grows the paddle without needing a power-up block
pub const BIG_PADDLE_GESTURE: HandState = HandState::Peace;

/// Remaining frames for each paddle power-up (`None` = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpTimers {
    pub big_paddle: Option<u32>,
    pub speed_up: Option<u32>,
}

impl PowerUpTimers {
    pub fn any_active(&self) -> bool {
        self.big_paddle.is_some() || self.speed_up.is_some()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Where the paddle is heading this frame
    pub target_x: f32,
    /// Width without big_paddle
    pub base_width: f32,
    /// Width with big_paddle
    pub big_width: f32,
    pub power_ups: PowerUpTimers,
    pub fist_action_cooldown: u32,
    pub peace_cooldown: u32,
}

impl Paddle {
    pub fn new(config: &Config, preset: &DifficultyPreset) -> Self {
        let base_width = preset.paddle_width();
        let x = (config.screen_width - base_width) / 2.0;
        Self {
            x,
            y: config.screen_height - PADDLE_BOTTOM_OFFSET,
            width: base_width,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            target_x: x,
            base_width,
            big_width: preset.big_paddle_width(),
            power_ups: PowerUpTimers::default(),
            fist_action_cooldown: 0,
            peace_cooldown: 0,
        }
    }

    /// Back to the starting position with no power-ups or cooldowns
    pub fn reset(&mut self, config: &Config, preset: &DifficultyPreset) {
        *self = Self::new(config, preset);
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn is_big(&self) -> bool {
        self.power_ups.big_paddle.is_some()
    }

    /// Advance one frame. Does nothing while no hand is detected.
    pub fn update(&mut self, config: &Config, input: &InputSample) {
        if !input.detected {
            return;
        }

        self.fist_action_cooldown = self.fist_action_cooldown.saturating_sub(1);
        self.peace_cooldown = self.peace_cooldown.saturating_sub(1);

        // Exponential follow toward the pointer
        self.target_x = (config.screen_width - self.width) * input.pointer_x;
        self.x += (self.target_x - self.x) * PADDLE_FOLLOW;
        self.clamp_x(config);

        if input.hand_state == BIG_PADDLE_GESTURE && self.peace_cooldown == 0 && !self.is_big() {
            log::debug!("Big paddle gesture");
            self.activate_big_paddle(config);
            self.peace_cooldown = PEACE_COOLDOWN;
        }

        self.tick_power_ups(config);
    }

    pub fn can_perform_fist_action(&self) -> bool {
        self.fist_action_cooldown == 0
    }

    /// Consume the fist action if it is off cooldown
    pub fn perform_fist_action(&mut self) -> bool {
        if self.can_perform_fist_action() {
            self.fist_action_cooldown = FIST_ACTION_COOLDOWN;
            true
        } else {
            false
        }
    }

    /// Grow the paddle around its centre. Re-activating only restarts the timer.
    pub fn activate_big_paddle(&mut self, config: &Config) {
        self.power_ups.big_paddle = Some(POWER_UP_DURATION);
        self.resize(config, self.big_width);
    }

    pub fn activate_speed_up(&mut self) {
        self.power_ups.speed_up = Some(POWER_UP_DURATION);
        self.speed = BOOSTED_PADDLE_SPEED;
    }

    fn tick_power_ups(&mut self, config: &Config) {
        if let Some(remaining) = self.power_ups.big_paddle {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.power_ups.big_paddle = None;
                self.resize(config, self.base_width);
                log::debug!("Big paddle expired");
            } else {
                self.power_ups.big_paddle = Some(remaining);
            }
        }

        if let Some(remaining) = self.power_ups.speed_up {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.power_ups.speed_up = None;
                self.speed = PADDLE_SPEED;
                log::debug!("Speed up expired");
            } else {
                self.power_ups.speed_up = Some(remaining);
            }
        }
    }

    /// Change width keeping the centre where it was
    fn resize(&mut self, config: &Config, width: f32) {
        let old_width = self.width;
        self.width = width;
        self.x -= (self.width - old_width) / 2.0;
        self.clamp_x(config);
    }

    fn clamp_x(&mut self, config: &Config) {
        self.x = self.x.clamp(0.0, (config.screen_width - self.width).max(0.0));
    }
}
