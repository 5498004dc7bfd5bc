//! Destructible blocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{BLOCK_HEIGHT, BLOCK_WIDTH};

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Normal,
    Strong,
    ExtraBall,
    SpeedUp,
    BigPaddle,
    MultiHit,
}

/// Effects released when a power-up block is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    ExtraBall,
    SpeedUp,
    BigPaddle,
}

impl BlockKind {
    /// Hits needed to destroy a block of this kind
    pub fn default_max_hits(&self) -> u32 {
        match self {
            BlockKind::Strong => 2,
            BlockKind::MultiHit => 3,
            BlockKind::Normal | BlockKind::ExtraBall | BlockKind::SpeedUp | BlockKind::BigPaddle => 1,
        }
    }

    /// Power-up carried by this kind, if any
    pub fn power_up(&self) -> Option<PowerUp> {
        match self {
            BlockKind::ExtraBall => Some(PowerUp::ExtraBall),
            BlockKind::SpeedUp => Some(PowerUp::SpeedUp),
            BlockKind::BigPaddle => Some(PowerUp::BigPaddle),
            _ => None,
        }
    }
}

/// A block entity
///
/// `hits` only grows and `destroyed` never clears; destroyed blocks stay in
/// the level's collection until the next level load replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub kind: BlockKind,
    hits: u32,
    max_hits: u32,
    destroyed: bool,
}

impl Block {
    /// Create a block with the default size and hit count for `kind`
    pub fn new(x: f32, y: f32, kind: BlockKind) -> Self {
        Self::with_max_hits(x, y, kind, kind.default_max_hits())
    }

    /// Create a block with an explicit hit count (at least one hit)
    pub fn with_max_hits(x: f32, y: f32, kind: BlockKind, max_hits: u32) -> Self {
        Self {
            rect: Rect::new(x, y, BLOCK_WIDTH, BLOCK_HEIGHT),
            kind,
            hits: 0,
            max_hits: max_hits.max(1),
            destroyed: false,
        }
    }

    #[inline]
    pub fn hits(&self) -> u32 {
        self.hits
    }

    #[inline]
    pub fn max_hits(&self) -> u32 {
        self.max_hits
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Register one hit.
    ///
    /// Returns the block's kind when this hit destroys it. Hitting an already
    /// destroyed block does nothing.
    pub fn hit(&mut self) -> Option<BlockKind> {
        if self.destroyed {
            return None;
        }
        self.hits += 1;
        if self.hits >= self.max_hits {
            self.destroyed = true;
            Some(self.kind)
        } else {
            None
        }
    }

    /// Destroy outright regardless of remaining hits (power-shot splash)
    pub fn shatter(&mut self) {
        self.destroyed = true;
    }

    /// Take the power-up out of a destroyed block, leaving it `Normal`.
    ///
    /// Returns `None` for live blocks and for blocks already consumed, so each
    /// power-up fires at most once.
    pub fn take_power_up(&mut self) -> Option<PowerUp> {
        if !self.destroyed {
            return None;
        }
        let power_up = self.kind.power_up()?;
        self.kind = BlockKind::Normal;
        Some(power_up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normal_block_breaks_in_one_hit() {
        let mut block = Block::new(0.0, 0.0, BlockKind::Normal);
        assert_eq!(block.hit(), Some(BlockKind::Normal));
        assert!(block.is_destroyed());
    }

    #[test]
    fn test_strong_block_takes_two_hits() {
        let mut block = Block::new(0.0, 0.0, BlockKind::Strong);
        assert_eq!(block.max_hits(), 2);

        assert_eq!(block.hit(), None);
        assert!(!block.is_destroyed());
        assert_eq!(block.hits(), 1);

        assert_eq!(block.hit(), Some(BlockKind::Strong));
        assert!(block.is_destroyed());
    }

    #[test]
    fn test_default_hit_table() {
        assert_eq!(BlockKind::Normal.default_max_hits(), 1);
        assert_eq!(BlockKind::Strong.default_max_hits(), 2);
        assert_eq!(BlockKind::ExtraBall.default_max_hits(), 1);
        assert_eq!(BlockKind::SpeedUp.default_max_hits(), 1);
        assert_eq!(BlockKind::BigPaddle.default_max_hits(), 1);
        assert_eq!(BlockKind::MultiHit.default_max_hits(), 3);
    }

    #[test]
    fn test_hits_stop_at_max() {
        let mut block = Block::new(0.0, 0.0, BlockKind::Normal);
        block.hit();
        assert_eq!(block.hit(), None);
        assert_eq!(block.hits(), 1);
    }

    #[test]
    fn test_zero_override_becomes_one() {
        let block = Block::with_max_hits(0.0, 0.0, BlockKind::MultiHit, 0);
        assert_eq!(block.max_hits(), 1);
    }

    #[test]
    fn test_shatter_keeps_hit_count() {
        let mut block = Block::new(0.0, 0.0, BlockKind::Strong);
        block.shatter();
        assert!(block.is_destroyed());
        assert_eq!(block.hits(), 0);
        assert_eq!(block.hit(), None);
    }

    #[test]
    fn test_power_up_taken_once() {
        let mut block = Block::new(0.0, 0.0, BlockKind::SpeedUp);
        assert_eq!(block.take_power_up(), None);

        block.hit();
        assert_eq!(block.take_power_up(), Some(PowerUp::SpeedUp));
        assert_eq!(block.kind, BlockKind::Normal);
        assert_eq!(block.take_power_up(), None);
    }

    #[test]
    fn test_block_kind_serde_names() {
        let kind: BlockKind = serde_json::from_str("\"multi_hit\"").unwrap();
        assert_eq!(kind, BlockKind::MultiHit);
        assert_eq!(serde_json::to_string(&BlockKind::BigPaddle).unwrap(), "\"big_paddle\"");
    }

    proptest! {
        #[test]
        fn prop_hits_bounded_and_destroyed_monotonic(max_hits in 1u32..6, attempts in 0usize..20) {
            let mut block = Block::with_max_hits(0.0, 0.0, BlockKind::Normal, max_hits);
            let mut was_destroyed = false;
            for _ in 0..attempts {
                block.hit();
                prop_assert!(block.hits() <= block.max_hits());
                prop_assert!(!was_destroyed || block.is_destroyed());
                was_destroyed = block.is_destroyed();
            }
        }
    }
}
