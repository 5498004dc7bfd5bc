//! Collision geometry shared by the live ball and the trajectory preview
//!
//! Both callers must agree on these tests exactly, otherwise the aim preview
//! would show a path the real ball never takes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left anchored (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closest point on (or inside) the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }
}

/// Check whether a circle overlaps a rectangle
///
/// Uses the distance from the circle centre to the closest point on the
/// rectangle; touching exactly at `radius` is not a hit.
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance(rect.closest_point(center)) < radius
}

/// Axis of least penetration between an overlapping circle and rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of resolving a circle against a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Axis whose velocity component should be reflected
    pub axis: Axis,
    /// Circle centre moved just outside the rectangle along `axis`
    pub position: Vec2,
}

/// Pick the separating axis for an overlapping circle (minimum translation)
///
/// Penetration is measured between the circle's bounding box and the
/// rectangle; ties go to the y axis.
pub fn separate_circle_from_rect(center: Vec2, radius: f32, rect: &Rect) -> Separation {
    let rect_center = rect.center();
    let overlap_x = (radius + rect.width / 2.0) - (center.x - rect_center.x).abs();
    let overlap_y = (radius + rect.height / 2.0) - (center.y - rect_center.y).abs();

    if overlap_x < overlap_y {
        let x = if center.x < rect_center.x {
            rect.x - radius - 1.0
        } else {
            rect.right() + radius + 1.0
        };
        Separation {
            axis: Axis::X,
            position: Vec2::new(x, center.y),
        }
    } else {
        let y = if center.y < rect_center.y {
            rect.y - radius - 1.0
        } else {
            rect.bottom() + radius + 1.0
        };
        Separation {
            axis: Axis::Y,
            position: Vec2::new(center.x, y),
        }
    }
}

/// Which walls were touched during a wall pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    /// Left or right wall
    pub side: bool,
    /// Top wall (the bottom of the playfield is open)
    pub top: bool,
}

impl WallHits {
    pub fn count(&self) -> u32 {
        u32::from(self.side) + u32::from(self.top)
    }
}

/// Reflect a circle off the side and top walls, pulling it back inside
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, width: f32) -> WallHits {
    let mut hits = WallHits::default();

    if pos.x <= radius || pos.x >= width - radius {
        vel.x = -vel.x;
        let min_x = radius + 1.0;
        pos.x = pos.x.clamp(min_x, (width - radius - 1.0).max(min_x));
        hits.side = true;
    }

    if pos.y <= radius {
        vel.y = -vel.y;
        pos.y = radius + 1.0;
        hits.top = true;
    }

    hits
}
