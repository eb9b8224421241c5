//! Single grid occupant: type, status state machine, position.

use rand::Rng;

/// Block colours and power blocks. The two partitions are disjoint; a block only
/// ever links with blocks of exactly the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Red,
    Green,
    Blue,
    Orange,
    Purple,
    BigExplosion,
    DelayedExplosion,
    Rock,
    InIce,
    Morphing,
}

impl BlockType {
    pub const STANDARD: [Self; 5] = [Self::Red, Self::Green, Self::Blue, Self::Orange, Self::Purple];

    pub const POWER: [Self; 5] = [
        Self::BigExplosion,
        Self::DelayedExplosion,
        Self::Rock,
        Self::InIce,
        Self::Morphing,
    ];

    pub fn is_power(self) -> bool {
        Self::POWER.contains(&self)
    }

    /// Weighted pick between the two partitions: a roll in `0..100` below
    /// `power_chance` selects a power type, anything else a standard colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, power_chance: u8) -> Self {
        let roll: u8 = rng.random_range(0..100);
        let pool = if roll < power_chance {
            &Self::POWER
        } else {
            &Self::STANDARD
        };
        pool[rng.random_range(0..pool.len())]
    }

    /// Stable index 0..10 used by the theme palette.
    pub fn palette_index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Orange => 3,
            Self::Purple => 4,
            Self::BigExplosion => 5,
            Self::DelayedExplosion => 6,
            Self::Rock => 7,
            Self::InIce => 8,
            Self::Morphing => 9,
        }
    }
}

/// Block lifecycle.
///
/// ```text
/// NotInPlay -> Stopped | Dropping
/// Dropping <-> Stopped
/// Stopped -> Detached
/// Stopped | Dropping | Detached -> MarkedForDeletion -> Exploding | Stopped
/// Exploding -> removed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockStatus {
    #[default]
    NotInPlay,
    Stopped,
    Dropping,
    Detached,
    MarkedForDeletion,
    Exploding,
}

/// 1-based grid coordinate; y grows upward from the floor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub const fn below(self) -> Self {
        self.offset(0, -1)
    }

    pub const fn above(self) -> Self {
        self.offset(0, 1)
    }

    /// East, west, north, south.
    pub const fn neighbours(self) -> [Self; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

/// Handle to a block stored inside an [`Arena`](crate::arena::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One status assignment. Fired for every assignment, including ones that
/// leave the status unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: BlockStatus,
    pub new: BlockStatus,
    pub x: i32,
    pub y: i32,
}

impl StatusChange {
    /// A block came to rest on the spawn row: the stack has overflowed.
    pub fn is_overflow(&self, spawn_row: i32) -> bool {
        self.new == BlockStatus::Stopped && self.y == spawn_row
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockType,
    status: BlockStatus,
    position: Position,
}

impl Block {
    pub fn new(kind: BlockType) -> Self {
        Self {
            kind,
            status: BlockStatus::NotInPlay,
            position: Position::default(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, power_chance: u8) -> Self {
        Self::new(BlockType::random(rng, power_chance))
    }

    /// Builder used when composing boards by hand.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    pub fn status(&self) -> BlockStatus {
        self.status
    }

    /// Only meaningful while the block is placed.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_status(&mut self, status: BlockStatus) -> StatusChange {
        let previous = self.status;
        self.status = status;
        StatusChange {
            previous,
            new: status,
            x: self.position.x,
            y: self.position.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_block_is_not_in_play() {
        let block = Block::new(BlockType::Green);
        assert_eq!(block.kind(), BlockType::Green);
        assert_eq!(block.status(), BlockStatus::NotInPlay);
    }

    #[test]
    fn test_status_change_records_previous_and_position() {
        let mut block = Block::new(BlockType::Red).at(3, 7);
        let first = block.set_status(BlockStatus::Dropping);
        assert_eq!(first.previous, BlockStatus::NotInPlay);
        assert_eq!(first.new, BlockStatus::Dropping);
        assert_eq!((first.x, first.y), (3, 7));

        let same = block.set_status(BlockStatus::Dropping);
        assert_eq!(same.previous, BlockStatus::Dropping);
        assert_eq!(same.new, BlockStatus::Dropping);
    }

    #[test]
    fn test_zero_chance_never_yields_power() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(!BlockType::random(&mut rng, 0).is_power());
        }
    }

    #[test]
    fn test_full_chance_always_yields_power() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(BlockType::random(&mut rng, 100).is_power());
        }
    }

    #[test]
    fn test_partial_chance_draws_from_both_partitions() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<_> = (0..1000).map(|_| BlockType::random(&mut rng, 20)).collect();
        assert!(draws.iter().any(|k| k.is_power()));
        assert!(draws.iter().any(|k| !k.is_power()));
    }

    #[test]
    fn test_overflow_only_when_stopped_on_spawn_row() {
        let change = StatusChange {
            previous: BlockStatus::Dropping,
            new: BlockStatus::Stopped,
            x: 5,
            y: 14,
        };
        assert!(change.is_overflow(14));
        assert!(!change.is_overflow(13));
        let moving = StatusChange {
            new: BlockStatus::Dropping,
            ..change
        };
        assert!(!moving.is_overflow(14));
    }

    #[test]
    fn test_neighbour_order_is_east_west_north_south() {
        let p = Position::new(4, 4);
        assert_eq!(
            p.neighbours(),
            [
                Position::new(5, 4),
                Position::new(3, 4),
                Position::new(4, 5),
                Position::new(4, 3)
            ]
        );
    }
}
