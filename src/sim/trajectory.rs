//! Aim preview: replays the ball's wall and block geometry ahead of time
//!
//! Never mutates game state. Termination is guaranteed by the step and
//! bounce budgets even when the path never touches anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::collision::{bounce_off_walls, circle_rect_overlap};
use crate::consts::BALL_RADIUS;
use crate::settings::Config;
use crate::try_normalize;

/// Forward simulator producing a polyline for the aim preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPredictor {
    /// Wall bounces before the preview stops
    pub max_bounces: u32,
    /// Hard cap on simulation steps
    pub max_steps: u32,
    /// Distance travelled per step
    pub step_size: f32,
    /// Points closer than this to the previous one are dropped
    pub min_spacing: f32,
    /// Radius of the simulated ball
    pub probe_radius: f32,
}

impl Default for TrajectoryPredictor {
    fn default() -> Self {
        Self {
            max_bounces: 6,
            max_steps: 800,
            step_size: 4.0,
            min_spacing: 5.0,
            probe_radius: BALL_RADIUS,
        }
    }
}

impl TrajectoryPredictor {
    /// Trace a path from `start` along `direction` against a block snapshot.
    ///
    /// The first point is always `start`. The path ends at the first point
    /// touching a live block, or when a budget runs out.
    pub fn simulate(
        &self,
        config: &Config,
        start: Vec2,
        direction: Vec2,
        blocks: &[Block],
    ) -> Vec<Vec2> {
        let mut points = vec![start];
        let Some(dir) = try_normalize(direction) else {
            return points;
        };

        let mut pos = start;
        let mut vel = dir * self.step_size;
        let mut bounces = 0;
        let mut steps = 0;

        while bounces < self.max_bounces && steps < self.max_steps {
            pos += vel;
            steps += 1;

            bounces += bounce_off_walls(&mut pos, &mut vel, self.probe_radius, config.screen_width).count();

            let blocked = blocks
                .iter()
                .any(|b| !b.is_destroyed() && circle_rect_overlap(pos, self.probe_radius, &b.rect));
            if blocked {
                points.push(pos);
                return points;
            }

            let far_enough = points
                .last()
                .is_none_or(|last| last.distance(pos) > self.min_spacing);
            if far_enough {
                points.push(pos);
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::BlockKind;

    const START: Vec2 = Vec2::new(500.0, 660.0);

    #[test]
    fn test_straight_up_runs_to_budget() {
        let config = Config::default();
        let predictor = TrajectoryPredictor::default();
        let points = predictor.simulate(&config, START, Vec2::new(0.0, -1.0), &[]);

        assert_eq!(points[0], START);
        assert!(points.iter().all(|p| p.x == 500.0));

        // Rises until the top wall, then falls
        let top = points
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.y.total_cmp(&b.1.y))
            .map(|(i, _)| i)
            .unwrap();
        assert!(points[..=top].windows(2).all(|w| w[1].y < w[0].y));
        assert!(points[top..].windows(2).all(|w| w[1].y > w[0].y));
        assert!(points[top].y < predictor.probe_radius + 2.0 * predictor.step_size);

        // Nothing cut the path short: the whole step budget was used
        let last = *points.last().unwrap();
        assert!(last.y > config.screen_height);
    }

    #[test]
    fn test_stops_at_first_live_block() {
        let config = Config::default();
        let predictor = TrajectoryPredictor::default();
        let block = Block::new(460.0, 300.0, BlockKind::Normal);
        let points = predictor.simulate(&config, START, Vec2::new(0.0, -1.0), &[block.clone()]);

        let (last, rest) = points.split_last().unwrap();
        assert_eq!(*last, Vec2::new(500.0, 336.0));
        assert!(circle_rect_overlap(*last, predictor.probe_radius, &block.rect));
        assert!(rest
            .iter()
            .all(|p| !circle_rect_overlap(*p, predictor.probe_radius, &block.rect)));
    }

    #[test]
    fn test_destroyed_blocks_are_transparent() {
        let config = Config::default();
        let predictor = TrajectoryPredictor::default();
        let mut block = Block::new(460.0, 300.0, BlockKind::Normal);
        block.hit();
        let points = predictor.simulate(&config, START, Vec2::new(0.0, -1.0), &[block]);
        assert!(points.last().unwrap().y > config.screen_height);
    }

    #[test]
    fn test_bounce_budget_ends_path() {
        let config = Config::default();
        let predictor = TrajectoryPredictor {
            max_bounces: 1,
            ..Default::default()
        };
        let points = predictor.simulate(&config, Vec2::new(500.0, 400.0), Vec2::new(1.0, 0.0), &[]);
        let last = points.last().unwrap();
        assert!(last.x >= 980.0);
        assert!(last.x <= config.screen_width - predictor.probe_radius);
        assert!(points.len() < 100);
    }

    #[test]
    fn test_points_are_spaced() {
        let config = Config::default();
        let predictor = TrajectoryPredictor::default();
        let points = predictor.simulate(&config, START, Vec2::new(0.3, -1.0), &[]);
        assert!(points.windows(2).all(|w| w[0].distance(w[1]) > predictor.min_spacing));
    }

    #[test]
    fn test_zero_direction_returns_start_only() {
        let config = Config::default();
        let points = TrajectoryPredictor::default().simulate(&config, START, Vec2::ZERO, &[]);
        assert_eq!(points, vec![START]);
    }

    #[test]
    fn test_direction_is_normalized() {
        let config = Config::default();
        let predictor = TrajectoryPredictor::default();
        let a = predictor.simulate(&config, START, Vec2::new(0.0, -1.0), &[]);
        let b = predictor.simulate(&config, START, Vec2::new(0.0, -25.0), &[]);
        assert_eq!(a, b);
    }
}
