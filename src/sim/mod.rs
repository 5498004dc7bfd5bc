//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One call to [`tick`] per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (block collection order)
//! - No rendering, camera or gesture-recognition dependencies

pub mod ball;
pub mod block;
pub mod collision;
pub mod level;
pub mod paddle;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use ball::Ball;
pub use block::{Block, BlockKind, PowerUp};
pub use collision::{Rect, bounce_off_walls, circle_rect_overlap, separate_circle_from_rect};
pub use level::{
    BlockDescriptor, LevelDescriptor, LevelError, LevelSet, LevelSource, LoadedLevel, NoLevels,
    generate_fallback_blocks, load_level,
};
pub use paddle::{Paddle, PowerUpTimers};
pub use state::{GameEvent, GameLogic, GameSnapshot, GameStatus};
pub use tick::{HandState, InputSample, LAUNCH_GESTURE, tick};
pub use trajectory::TrajectoryPredictor;
