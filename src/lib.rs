//! Chainblocks: rules engine for a falling block-pair puzzle.
//!
//! Pairs of coloured blocks fall into an 8 x 13 arena. Four or more linked blocks
//! of one colour explode, the blocks above fall, and every follow-up explosion
//! multiplies the score of the settle.
//!
//! [`Arena`] holds the grid rules, [`Session`] drives an arena on a clock. The
//! `chainblocks` binary is a terminal front end over both.

pub mod arena;
pub mod block;
pub mod error;
pub mod pair;
pub mod queue;
pub mod session;

pub use arena::{Arena, ArenaConfig, ArenaEvent};
pub use block::{Block, BlockId, BlockStatus, BlockType, Position, StatusChange};
pub use error::{ArenaError, ArenaResult, ConfigError};
pub use pair::{
    ActivePair, BlockPair, HorizontalDirection, Orientation, QueuedPair, Rotation, VerticalSpeed,
};
pub use queue::BlockPairQueue;
pub use session::{Session, SessionConfig, SessionInput, Settle};
