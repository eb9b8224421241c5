//! Two blocks that fall, move and rotate together.

use crate::block::{Block, BlockId, BlockType, Position};
use rand::Rng;

/// Where block 2 sits relative to block 1. Clockwise order is
/// Right -> Below -> Left -> Above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Right,
    Below,
    Left,
    Above,
}

impl Orientation {
    const CYCLE: [Self; 4] = [Self::Right, Self::Below, Self::Left, Self::Above];

    fn cycle_index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Below => 1,
            Self::Left => 2,
            Self::Above => 3,
        }
    }

    /// Next orientation in the rotation cycle; `Rotation::None` keeps the current one.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let i = self.cycle_index();
        match rotation {
            Rotation::None => self,
            Rotation::Clockwise => Self::CYCLE[(i + 1) % 4],
            Rotation::AntiClockwise => Self::CYCLE[(i + 3) % 4],
        }
    }

    /// Grid step from block 1 to block 2.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Below => (0, -1),
            Self::Left => (-1, 0),
            Self::Above => (0, 1),
        }
    }

    /// Block 2's position for a block 1 at `anchor`.
    pub fn partner_of(self, anchor: Position) -> Position {
        let (dx, dy) = self.offset();
        anchor.offset(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise,
    AntiClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalDirection {
    #[default]
    None,
    Left,
    Right,
}

/// Affects only how often the driver ticks the pair down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalSpeed {
    #[default]
    Normal,
    DroppingFast,
}

/// A pair of blocks plus its movement intent.
///
/// Queued pairs own their [`Block`] values; once spawned the arena stores the
/// blocks and the active pair carries [`BlockId`] handles instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPair<B> {
    pub block1: B,
    pub block2: B,
    pub orientation: Orientation,
    pub rotation: Rotation,
    pub horizontal: HorizontalDirection,
    pub vertical_speed: VerticalSpeed,
}

pub type QueuedPair = BlockPair<Block>;
pub type ActivePair = BlockPair<BlockId>;

impl<B> BlockPair<B> {
    fn with_blocks(block1: B, block2: B) -> Self {
        Self {
            block1,
            block2,
            orientation: Orientation::Right,
            rotation: Rotation::None,
            horizontal: HorizontalDirection::None,
            vertical_speed: VerticalSpeed::Normal,
        }
    }

    /// Swap the payload while keeping orientation and intent.
    pub fn map<C>(self, mut f: impl FnMut(B) -> C) -> BlockPair<C> {
        BlockPair {
            block1: f(self.block1),
            block2: f(self.block2),
            orientation: self.orientation,
            rotation: self.rotation,
            horizontal: self.horizontal,
            vertical_speed: self.vertical_speed,
        }
    }

    pub fn blocks(&self) -> [&B; 2] {
        [&self.block1, &self.block2]
    }
}

impl QueuedPair {
    pub fn new(kind1: BlockType, kind2: BlockType) -> Self {
        Self::with_blocks(Block::new(kind1), Block::new(kind2))
    }

    /// Each slot rolls independently against its own power chance.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, power_chance: [u8; 2]) -> Self {
        let block1 = Block::random(rng, power_chance[0]);
        let block2 = Block::random(rng, power_chance[1]);
        Self::with_blocks(block1, block2)
    }

    pub fn kinds(&self) -> (BlockType, BlockType) {
        (self.block1.kind(), self.block2.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockStatus;

    #[test]
    fn test_new_pair_defaults() {
        let pair = QueuedPair::new(BlockType::Green, BlockType::Green);
        assert_eq!(pair.kinds(), (BlockType::Green, BlockType::Green));
        assert_eq!(pair.orientation, Orientation::Right);
        assert_eq!(pair.rotation, Rotation::None);
        assert_eq!(pair.horizontal, HorizontalDirection::None);
        assert_eq!(pair.vertical_speed, VerticalSpeed::Normal);
        assert_eq!(pair.block1.status(), BlockStatus::NotInPlay);
    }

    #[test]
    fn test_clockwise_cycle_wraps() {
        let mut o = Orientation::Right;
        let mut seen = Vec::new();
        for _ in 0..4 {
            o = o.rotated(Rotation::Clockwise);
            seen.push(o);
        }
        assert_eq!(
            seen,
            [Orientation::Below, Orientation::Left, Orientation::Above, Orientation::Right]
        );
    }

    #[test]
    fn test_anticlockwise_cycle_wraps() {
        assert_eq!(Orientation::Right.rotated(Rotation::AntiClockwise), Orientation::Above);
        assert_eq!(Orientation::Above.rotated(Rotation::AntiClockwise), Orientation::Left);
        assert_eq!(Orientation::Below.rotated(Rotation::None), Orientation::Below);
    }

    #[test]
    fn test_partner_is_one_orthogonal_step() {
        let anchor = Position::new(4, 5);
        for o in Orientation::CYCLE {
            let p = o.partner_of(anchor);
            assert_eq!((p.x - anchor.x).abs() + (p.y - anchor.y).abs(), 1);
        }
        assert_eq!(Orientation::Below.partner_of(anchor), Position::new(4, 4));
    }

    #[test]
    fn test_map_keeps_intent() {
        let mut pair = QueuedPair::new(BlockType::Red, BlockType::Blue);
        pair.orientation = Orientation::Left;
        pair.vertical_speed = VerticalSpeed::DroppingFast;
        let mapped = pair.map(|b| b.kind());
        assert_eq!(mapped.block1, BlockType::Red);
        assert_eq!(mapped.block2, BlockType::Blue);
        assert_eq!(mapped.orientation, Orientation::Left);
        assert_eq!(mapped.vertical_speed, VerticalSpeed::DroppingFast);
    }
}
