//! Level data: external block descriptors and the procedural fallback grid
//!
//! Level files themselves are read elsewhere; this module only turns their
//! contents into [`Block`]s, or falls back to a generated layout when the
//! data is missing or unusable.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::block::{Block, BlockKind};
use crate::settings::Difficulty;

/// One block placement as it appears in level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    /// Overrides the kind's default hit count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<u32>,
}

/// A level as delivered by a [`LevelSource`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub blocks: Vec<BlockDescriptor>,
}

/// Why level data could not be used
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has no blocks")]
    Empty,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the block collection for this level
    pub fn build_blocks(&self) -> Result<Vec<Block>, LevelError> {
        if self.blocks.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(self.blocks.iter().map(block_from_descriptor).collect())
    }
}

/// Turn an external descriptor into a live block
pub fn block_from_descriptor(desc: &BlockDescriptor) -> Block {
    let (x, y) = (desc.x as f32, desc.y as f32);
    match desc.hits {
        Some(hits) => Block::with_max_hits(x, y, desc.kind, hits),
        None => Block::new(x, y, desc.kind),
    }
}

/// Fallback grid dimensions
pub const FALLBACK_COLUMNS: usize = 10;
pub const FALLBACK_ROWS: usize = 6;

/// Procedural 10×6 layout used when no level data is available.
///
/// Row 0 is multi-hit, row 1 strong; on the other rows every 4th column holds
/// a random power-up block.
pub fn generate_fallback_blocks<R: Rng + ?Sized>(rng: &mut R) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(FALLBACK_COLUMNS * FALLBACK_ROWS);
    for row in 0..FALLBACK_ROWS {
        for col in 0..FALLBACK_COLUMNS {
            let x = (col * 90 + 50) as f32;
            let y = (row * 40 + 80) as f32;
            let kind = match (row, col % 4) {
                (0, _) => BlockKind::MultiHit,
                (1, _) => BlockKind::Strong,
                (_, 0) => match rng.random_range(0..3) {
                    0 => BlockKind::ExtraBall,
                    1 => BlockKind::SpeedUp,
                    _ => BlockKind::BigPaddle,
                },
                _ => BlockKind::Normal,
            };
            blocks.push(Block::new(x, y, kind));
        }
    }
    blocks
}

/// Supplies level data by difficulty and level number
pub trait LevelSource {
    fn load(&self, difficulty: Difficulty, level: u32) -> Option<LevelDescriptor>;
}

/// A source with no levels; every load uses the fallback grid
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLevels;

impl LevelSource for NoLevels {
    fn load(&self, _difficulty: Difficulty, _level: u32) -> Option<LevelDescriptor> {
        None
    }
}

/// In-memory level table
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    levels: HashMap<(Difficulty, u32), LevelDescriptor>,
}

impl LevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, difficulty: Difficulty, level: u32, desc: LevelDescriptor) {
        self.levels.insert((difficulty, level), desc);
    }

    /// Parse and add a level from its JSON text
    pub fn insert_json(&mut self, difficulty: Difficulty, level: u32, json: &str) -> Result<(), LevelError> {
        let desc = LevelDescriptor::from_json(json)?;
        self.insert(difficulty, level, desc);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelSource for LevelSet {
    fn load(&self, difficulty: Difficulty, level: u32) -> Option<LevelDescriptor> {
        self.levels.get(&(difficulty, level)).cloned()
    }
}

/// Blocks and name for the level about to be played
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub name: String,
    pub blocks: Vec<Block>,
    /// True when the fallback grid was used
    pub procedural: bool,
}

/// Load a level, falling back to the procedural grid on any problem
pub fn load_level<R: Rng + ?Sized>(
    source: &dyn LevelSource,
    difficulty: Difficulty,
    level: u32,
    rng: &mut R,
) -> LoadedLevel {
    let default_name = format!("{} Level {}", difficulty.as_str(), level);

    let Some(desc) = source.load(difficulty, level) else {
        log::info!("No level data for {}, using fallback", default_name);
        return LoadedLevel {
            name: default_name,
            blocks: generate_fallback_blocks(rng),
            procedural: true,
        };
    };

    match desc.build_blocks() {
        Ok(blocks) => {
            log::info!("Loaded {} blocks for {}", blocks.len(), default_name);
            if !desc.description.is_empty() {
                log::info!("{}", desc.description);
            }
            LoadedLevel {
                name: desc.level_name.unwrap_or(default_name),
                blocks,
                procedural: false,
            }
        }
        Err(err) => {
            log::warn!("Rejected level data for {}: {}", default_name, err);
            LoadedLevel {
                name: default_name,
                blocks: generate_fallback_blocks(rng),
                procedural: true,
            }
        }
    }
}
