//! The ball: integration, speed band, trail, and collision response
//!
//! One explicit Euler step per frame, no substepping. Walls are resolved
//! first, then the paddle, then blocks.

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockKind};
use super::collision::{Axis, bounce_off_walls, circle_rect_overlap, separate_circle_from_rect};
use super::paddle::Paddle;
use crate::clamp_speed;
use crate::consts::*;
use crate::settings::Config;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recent rounded positions, oldest first
    pub trail: VecDeque<IVec2>,
    pub active: bool,
    pub power_shot: bool,
    /// Frames of power-shot left
    pub power_shot_timer: u32,
    /// Splash radius while power-shot is active, 0 otherwise
    pub destruction_radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            trail: VecDeque::with_capacity(POWER_SHOT_TRAIL_LENGTH + 1),
            active: true,
            power_shot: false,
            power_shot_timer: 0,
            destruction_radius: 0.0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Arm the power-shot for `duration` frames
    pub fn arm_power_shot(&mut self, duration: u32, radius: f32) {
        self.power_shot = true;
        self.power_shot_timer = duration;
        self.destruction_radius = radius;
    }

    /// Ball has fallen past the bottom of the playfield
    pub fn is_out_of_bounds(&self, config: &Config) -> bool {
        self.pos.y > config.death_line()
    }

    /// Advance one frame.
    ///
    /// Returns true if the ball hit the paddle or at least one block. An
    /// inactive ball is left untouched.
    pub fn update(&mut self, config: &Config, paddle: &Paddle, blocks: &mut [Block]) -> bool {
        if !self.active {
            return false;
        }

        if self.power_shot_timer > 0 {
            self.power_shot_timer -= 1;
            if self.power_shot_timer == 0 {
                self.power_shot = false;
                self.destruction_radius = 0.0;
            }
        }

        self.pos += self.vel;
        self.vel = clamp_speed(self.vel, BALL_MIN_SPEED, BALL_MAX_SPEED);
        self.record_trail();

        bounce_off_walls(&mut self.pos, &mut self.vel, self.radius, config.screen_width);

        let paddle_hit = self.collide_paddle(paddle);
        let block_hit = self.collide_blocks(blocks);

        // Paddle damping can push the speed back under the band
        self.vel = clamp_speed(self.vel, BALL_MIN_SPEED, BALL_MAX_SPEED);

        paddle_hit || block_hit
    }

    fn trail_cap(&self) -> usize {
        if self.power_shot {
            POWER_SHOT_TRAIL_LENGTH
        } else {
            TRAIL_LENGTH
        }
    }

    fn record_trail(&mut self) {
        self.trail.push_back(self.pos.round().as_ivec2());
        let cap = self.trail_cap();
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }

    /// Bounce off the paddle top, steering by where the ball landed
    fn collide_paddle(&mut self, paddle: &Paddle) -> bool {
        let rect = paddle.rect();
        let bottom = self.pos.y + self.radius;
        let in_band = bottom >= rect.y && bottom <= rect.bottom() + PADDLE_CATCH_DEPTH;
        let in_span = self.pos.x + self.radius >= rect.x && self.pos.x - self.radius <= rect.right();

        if !(self.vel.y > 0.0 && in_band && in_span) {
            return false;
        }

        let hit_pos = ((self.pos.x - rect.x) / rect.width).clamp(0.0, 1.0);
        let angle = (hit_pos - 0.5) * PI / PADDLE_DEFLECT_DIVISOR;
        let speed = self.speed().max(BALL_MIN_SPEED);

        self.vel = Vec2::new(
            speed * angle.sin(),
            -(speed * PADDLE_BOUNCE_DAMPING).abs(),
        );
        self.pos.y = paddle.y - self.radius - 2.0;
        true
    }

    /// Collide with every live block in contact or inside the splash radius.
    ///
    /// Only the first block the ball actually overlaps deflects it; every
    /// collected block takes damage.
    fn collide_blocks(&mut self, blocks: &mut [Block]) -> bool {
        let splash = self.power_shot && self.destruction_radius > 0.0;

        let hit_indices: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_destroyed())
            .filter(|(_, block)| {
                circle_rect_overlap(self.pos, self.radius, &block.rect)
                    || (splash && self.pos.distance(block.center()) <= self.destruction_radius)
            })
            .map(|(i, _)| i)
            .collect();

        if hit_indices.is_empty() {
            return false;
        }

        // Splash-only blocks earlier in the list do not deflect
        let contact = hit_indices
            .iter()
            .filter_map(|&i| blocks.get(i))
            .find(|block| circle_rect_overlap(self.pos, self.radius, &block.rect))
            .map(|block| block.rect);
        if let Some(rect) = contact {
            let sep = separate_circle_from_rect(self.pos, self.radius, &rect);
            match sep.axis {
                Axis::X => self.vel.x = -self.vel.x,
                Axis::Y => self.vel.y = -self.vel.y,
            }
            self.pos = sep.position;
        }

        for i in hit_indices {
            if let Some(block) = blocks.get_mut(i) {
                // Splash ignores hit counts except on multi-hit blocks
                if self.power_shot && block.kind != BlockKind::MultiHit {
                    block.shatter();
                } else {
                    block.hit();
                }
            }
        }

        true
    }
}
