//! Difficulty presets and playfield configuration
//!
//! The playfield [`Config`] is built once at startup and handed by reference
//! to every component that needs screen bounds.

use serde::{Deserialize, Serialize};

use crate::consts::{BIG_PADDLE_WIDTH, PADDLE_WIDTH};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

/// Values derived from a difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPreset {
    /// Power shots available per game
    pub power_shots: u32,
    pub ball_speed_multiplier: f32,
    pub paddle_size_multiplier: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Expert => "EXPERT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn preset(&self) -> DifficultyPreset {
        let (power_shots, ball_speed_multiplier, paddle_size_multiplier) = match self {
            Difficulty::Easy => (3, 0.7, 1.3),
            Difficulty::Medium => (2, 1.0, 1.0),
            Difficulty::Hard => (1, 1.3, 0.8),
            Difficulty::Expert => (0, 1.6, 0.6),
        };
        DifficultyPreset {
            power_shots,
            ball_speed_multiplier,
            paddle_size_multiplier,
        }
    }
}

impl DifficultyPreset {
    /// Paddle width without power-ups
    pub fn paddle_width(&self) -> f32 {
        (PADDLE_WIDTH * self.paddle_size_multiplier).round()
    }

    /// Paddle width while big_paddle is active
    pub fn big_paddle_width(&self) -> f32 {
        (BIG_PADDLE_WIDTH * self.paddle_size_multiplier).round()
    }
}

/// Immutable playfield configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logical playfield width
    pub screen_width: f32,
    /// Logical playfield height
    pub screen_height: f32,
    /// How far below the bottom edge a ball may travel before it is lost
    pub out_of_bounds_margin: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 1000.0,
            screen_height: 700.0,
            out_of_bounds_margin: 50.0,
        }
    }
}

impl Config {
    /// y coordinate past which a ball counts as lost
    #[inline]
    pub fn death_line(&self) -> f32 {
        self.screen_height + self.out_of_bounds_margin
    }
}
