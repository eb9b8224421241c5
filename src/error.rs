//! Error types for grid bookkeeping and arena configuration.

use crate::block::BlockId;
use thiserror::Error;

/// Grid invariant violations. Each one means the caller's bookkeeping is wrong;
/// drivers are expected to propagate them and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("there is already a block present at ({x}, {y})")]
    CellOccupied { x: i32, y: i32 },
    #[error("there is no block to remove at ({x}, {y})")]
    CellEmpty { x: i32, y: i32 },
    #[error("({x}, {y}) is outside the arena")]
    OutOfBounds { x: i32, y: i32 },
    #[error("block handle {0:?} does not refer to a stored block")]
    UnknownBlock(BlockId),
    #[error("block {block:?} is not on the grid at ({x}, {y})")]
    NotAtPosition { block: BlockId, x: i32, y: i32 },
}

/// Rejected [`ArenaConfig`](crate::arena::ArenaConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("arena width must be 2..={max} columns, got {0}", max = crate::arena::MAX_WIDTH)]
    Width(i32),
    #[error("arena height must be 1..={max} rows, got {0}", max = crate::arena::MAX_HEIGHT)]
    Height(i32),
    #[error("power block chance must be a percentage (0..=100), got {0}")]
    PowerChance(u8),
    #[error("pair queue needs a lookahead of at least 1")]
    QueueLength,
    #[error("match threshold must be at least 1")]
    MatchThreshold,
}

pub type ArenaResult<T> = Result<T, ArenaError>;
