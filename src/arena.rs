//! Arena: the grid, the pair queue and the falling pair.
//!
//! Columns run `1..=width`, rows `1..=height + 1` with y growing upward. The
//! extra top row is the spawn line; a block coming to rest there means the stack
//! has overflowed. Cells hold [`BlockId`] handles into storage owned by the arena,
//! and each stored block's position always names the cell that holds it.
//!
//! After the falling pair settles, [`Arena::resolve_after_settle`] runs the
//! match -> explode -> gravity loop until nothing moves and returns the score.

use crate::block::{Block, BlockId, BlockStatus, BlockType, Position, StatusChange};
use crate::error::{ArenaError, ArenaResult, ConfigError};
use crate::pair::{ActivePair, HorizontalDirection, Orientation, QueuedPair, Rotation, VerticalSpeed};
use crate::queue::BlockPairQueue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_WIDTH: i32 = 8;
pub const DEFAULT_HEIGHT: i32 = 13;
/// Linked blocks needed before a group explodes.
pub const MATCH_THRESHOLD: usize = 4;
pub const SCORE_MULTIPLIER: u32 = 100;
pub const DEFAULT_QUEUE_LENGTH: usize = 2;
/// Largest arena the 2x1 cell renderer can lay out in a `u16` terminal.
pub const MAX_WIDTH: i32 = 256;
pub const MAX_HEIGHT: i32 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    pub width: i32,
    /// Playable rows, not counting the spawn line.
    pub height: i32,
    pub queue_length: usize,
    pub refill_queue: bool,
    /// Percent chance per pair slot of drawing a power block.
    pub power_chance: [u8; 2],
    pub match_threshold: usize,
    pub score_multiplier: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            queue_length: DEFAULT_QUEUE_LENGTH,
            refill_queue: true,
            power_chance: [0, 0],
            match_threshold: MATCH_THRESHOLD,
            score_multiplier: SCORE_MULTIPLIER,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_WIDTH).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(1..=MAX_HEIGHT).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if let Some(&chance) = self.power_chance.iter().find(|&&c| c > 100) {
            return Err(ConfigError::PowerChance(chance));
        }
        if self.queue_length == 0 {
            return Err(ConfigError::QueueLength);
        }
        if self.match_threshold == 0 {
            return Err(ConfigError::MatchThreshold);
        }
        Ok(())
    }
}

/// Everything observable that happened inside the arena, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaEvent {
    StatusChanged { block: BlockId, change: StatusChange },
    /// Both blocks of the falling pair are Stopped.
    PairSettled,
    /// One explode-and-fall pass of a resolution.
    Chain { chain: u32, groups: u32, removed: usize },
}

impl ArenaEvent {
    pub fn is_overflow(&self, spawn_row: i32) -> bool {
        matches!(self, Self::StatusChanged { change, .. } if change.is_overflow(spawn_row))
    }
}

#[derive(Debug, Clone)]
pub struct Arena<R = StdRng> {
    width: i32,
    height: i32,
    cells: Vec<Option<BlockId>>,
    blocks: Vec<Option<Block>>,
    free: Vec<usize>,
    queue: BlockPairQueue<R>,
    active: Option<ActivePair>,
    events: Vec<ArenaEvent>,
    match_threshold: usize,
    score_multiplier: u32,
}

impl Arena<StdRng> {
    /// Default 8 x 13 arena with an OS-seeded generator.
    pub fn new() -> Self {
        Self::build(ArenaConfig::default(), StdRng::from_os_rng())
    }

    /// Default arena with a reproducible pair sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::build(ArenaConfig::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for Arena<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Arena<R> {
    pub fn with_rng(config: ArenaConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: ArenaConfig, rng: R) -> Self {
        let rows = config.height + 1;
        Self {
            width: config.width,
            height: config.height,
            cells: vec![None; (config.width * rows) as usize],
            blocks: Vec::new(),
            free: Vec::new(),
            queue: BlockPairQueue::new(
                config.queue_length,
                config.refill_queue,
                config.power_chance,
                rng,
            ),
            active: None,
            events: Vec::new(),
            match_threshold: config.match_threshold,
            score_multiplier: config.score_multiplier,
        }
    }

    /// Dequeue the next pair, put it on the spawn line as Dropping and make it
    /// the falling pair. `Ok(false)` when the queue has run dry.
    pub fn spawn_next_pair(&mut self) -> ArenaResult<bool> {
        let (start1, start2) = self.spawn_positions();
        for start in [start1, start2] {
            if self.cell(start).is_some() {
                return Err(ArenaError::CellOccupied {
                    x: start.x,
                    y: start.y,
                });
            }
        }
        let Some(mut pair) = self.queue.next_pair() else {
            return Ok(false);
        };
        pair.orientation = Orientation::Right;
        pair.block1.set_position(start1);
        pair.block2.set_position(start2);
        let active = pair.map(|block| self.store(block));
        self.place(active.block1, BlockStatus::Dropping)?;
        self.place(active.block2, BlockStatus::Dropping)?;
        self.active = Some(active);
        Ok(true)
    }
}

impl<R> Arena<R> {
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Playable height, excluding the spawn line.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn spawn_row(&self) -> i32 {
        self.height + 1
    }

    pub fn spawn_positions(&self) -> (Position, Position) {
        let x = self.width / 2;
        let y = self.spawn_row();
        (Position::new(x, y), Position::new(x + 1, y))
    }

    pub fn match_threshold(&self) -> usize {
        self.match_threshold
    }

    pub fn active_pair(&self) -> Option<&ActivePair> {
        self.active.as_ref()
    }

    pub fn peek_next_pair(&self) -> Option<&QueuedPair> {
        self.queue.peek()
    }

    pub fn upcoming_pairs(&self) -> impl Iterator<Item = &QueuedPair> {
        self.queue.iter()
    }

    pub fn events(&self) -> &[ArenaEvent] {
        &self.events
    }

    /// Take every buffered event. Nothing else empties the buffer.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, ArenaEvent> {
        self.events.drain(..)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (1..=self.width).contains(&pos.x) && (1..=self.spawn_row()).contains(&pos.y)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| ((pos.y - 1) * self.width + (pos.x - 1)) as usize)
    }

    fn cell(&self, pos: Position) -> Option<BlockId> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    fn is_free(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx].is_none())
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0).and_then(Option::as_ref)
    }

    fn block_mut(&mut self, id: BlockId) -> ArenaResult<&mut Block> {
        self.blocks
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(ArenaError::UnknownBlock(id))
    }

    fn position_of(&self, id: BlockId) -> ArenaResult<Position> {
        self.block(id)
            .map(Block::position)
            .ok_or(ArenaError::UnknownBlock(id))
    }

    /// Occupant of `(x, y)`; `None` for empty or out-of-bounds cells.
    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block> {
        self.block_id_at(x, y).and_then(|id| self.block(id))
    }

    pub fn block_id_at(&self, x: i32, y: i32) -> Option<BlockId> {
        self.cell(Position::new(x, y))
    }

    /// Placed blocks in row-major order, floor row first.
    pub fn placed_blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.cells
            .iter()
            .flatten()
            .filter_map(|&id| self.block(id).map(|block| (id, block)))
    }

    fn row_major(&self) -> impl Iterator<Item = Position> + use<R> {
        let (width, rows) = (self.width, self.spawn_row());
        (1..=rows).flat_map(move |y| (1..=width).map(move |x| Position::new(x, y)))
    }

    fn store(&mut self, block: Block) -> BlockId {
        match self.free.pop() {
            Some(slot) => {
                self.blocks[slot] = Some(block);
                BlockId(slot)
            }
            None => {
                self.blocks.push(Some(block));
                BlockId(self.blocks.len() - 1)
            }
        }
    }

    fn dispose(&mut self, id: BlockId) {
        if let Some(slot) = self.blocks.get_mut(id.0) {
            if slot.take().is_some() {
                self.free.push(id.0);
            }
        }
    }

    /// Store `block` and place it at its own position with `status`.
    pub fn add_block(&mut self, block: Block, status: BlockStatus) -> ArenaResult<BlockId> {
        let pos = block.position();
        match self.index(pos) {
            None => return Err(ArenaError::OutOfBounds { x: pos.x, y: pos.y }),
            Some(idx) if self.cells[idx].is_some() => {
                return Err(ArenaError::CellOccupied { x: pos.x, y: pos.y });
            }
            Some(_) => {}
        }
        let id = self.store(block);
        self.place(id, status)?;
        Ok(id)
    }

    /// Put a stored block back on the grid at its position and set `status`.
    pub fn place(&mut self, id: BlockId, status: BlockStatus) -> ArenaResult<()> {
        self.put(id)?;
        self.record_status(id, status);
        Ok(())
    }

    /// Take a block off the grid. It stays stored and can be placed again.
    pub fn remove(&mut self, id: BlockId) -> ArenaResult<()> {
        self.take(id)
    }

    fn put(&mut self, id: BlockId) -> ArenaResult<()> {
        let pos = self.position_of(id)?;
        let idx = self
            .index(pos)
            .ok_or(ArenaError::OutOfBounds { x: pos.x, y: pos.y })?;
        if self.cells[idx].is_some() {
            return Err(ArenaError::CellOccupied { x: pos.x, y: pos.y });
        }
        self.cells[idx] = Some(id);
        Ok(())
    }

    fn take(&mut self, id: BlockId) -> ArenaResult<()> {
        let pos = self.position_of(id)?;
        let idx = self
            .index(pos)
            .ok_or(ArenaError::OutOfBounds { x: pos.x, y: pos.y })?;
        match self.cells[idx] {
            None => Err(ArenaError::CellEmpty { x: pos.x, y: pos.y }),
            Some(occupant) if occupant != id => Err(ArenaError::NotAtPosition {
                block: id,
                x: pos.x,
                y: pos.y,
            }),
            Some(_) => {
                self.cells[idx] = None;
                Ok(())
            }
        }
    }

    fn relocate(&mut self, id: BlockId, to: Position) -> ArenaResult<()> {
        self.take(id)?;
        self.block_mut(id)?.set_position(to);
        self.put(id)
    }

    pub fn set_status(&mut self, id: BlockId, status: BlockStatus) -> ArenaResult<()> {
        self.block_mut(id)?;
        self.record_status(id, status);
        Ok(())
    }

    fn record_status(&mut self, id: BlockId, status: BlockStatus) {
        let Some(block) = self.blocks.get_mut(id.0).and_then(Option::as_mut) else {
            return;
        };
        let change = block.set_status(status);
        self.events.push(ArenaEvent::StatusChanged { block: id, change });
        if status == BlockStatus::Stopped
            && self
                .active
                .is_some_and(|pair| pair.block1 == id || pair.block2 == id)
            && self.is_pair_settled()
        {
            self.events.push(ArenaEvent::PairSettled);
        }
    }

    /// Empty every cell, forget every stored block and the falling pair.
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.blocks.clear();
        self.free.clear();
        self.active = None;
    }

    /// False on the floor row or when the cell below is taken.
    pub fn can_drop(&self, id: BlockId) -> bool {
        let Some(block) = self.block(id) else {
            return false;
        };
        let pos = block.position();
        pos.y > 1 && self.cell(pos.below()).is_none()
    }

    /// Move the block down one row if it can drop; `Ok(false)` otherwise.
    pub fn try_drop(&mut self, id: BlockId) -> ArenaResult<bool> {
        if !self.can_drop(id) {
            return Ok(false);
        }
        let below = self.position_of(id)?.below();
        self.relocate(id, below)?;
        Ok(true)
    }

    fn active_positions(&self) -> Option<(ActivePair, Position, Position)> {
        let pair = self.active?;
        let p1 = self.block(pair.block1)?.position();
        let p2 = self.block(pair.block2)?.position();
        Some((pair, p1, p2))
    }

    pub fn is_pair_settled(&self) -> bool {
        self.active.is_some_and(|pair| {
            pair.blocks()
                .iter()
                .all(|&&id| self.block(id).is_some_and(|b| b.status() == BlockStatus::Stopped))
        })
    }

    fn can_shift(&self, dx: i32) -> bool {
        let Some((pair, p1, p2)) = self.active_positions() else {
            return false;
        };
        let wall = if dx < 0 { 1 } else { self.width };
        if p1.x == wall || p2.x == wall {
            return false;
        }
        let free = |p: Position| self.is_free(p.offset(dx, 0));
        // Only the block on the leading side needs room, unless they are stacked.
        let block1_leads = match pair.orientation {
            Orientation::Right => dx < 0,
            Orientation::Left => dx > 0,
            Orientation::Below | Orientation::Above => return free(p1) && free(p2),
        };
        if block1_leads { free(p1) } else { free(p2) }
    }

    fn shift(&mut self, dx: i32) -> ArenaResult<bool> {
        if !self.can_shift(dx) {
            return Ok(false);
        }
        let Some((pair, p1, p2)) = self.active_positions() else {
            return Ok(false);
        };
        self.take(pair.block1)?;
        self.take(pair.block2)?;
        self.block_mut(pair.block1)?.set_position(p1.offset(dx, 0));
        self.block_mut(pair.block2)?.set_position(p2.offset(dx, 0));
        self.put(pair.block1)?;
        self.put(pair.block2)?;
        Ok(true)
    }

    pub fn can_move_left(&self) -> bool {
        self.can_shift(-1)
    }

    pub fn can_move_right(&self) -> bool {
        self.can_shift(1)
    }

    pub fn move_left(&mut self) -> ArenaResult<bool> {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> ArenaResult<bool> {
        self.shift(1)
    }

    /// Block 2 can swing to the next orientation without leaving the grid or
    /// landing on another block.
    pub fn can_rotate(&self, rotation: Rotation) -> bool {
        if rotation == Rotation::None {
            return false;
        }
        let Some((pair, p1, _)) = self.active_positions() else {
            return false;
        };
        let target = pair.orientation.rotated(rotation).partner_of(p1);
        self.is_free(target)
    }

    /// Rotate block 2 around block 1. Block 1 never moves.
    pub fn rotate(&mut self, rotation: Rotation) -> ArenaResult<bool> {
        if let Some(pair) = self.active.as_mut() {
            pair.rotation = rotation;
        }
        if !self.can_rotate(rotation) {
            return Ok(false);
        }
        let Some((pair, p1, _)) = self.active_positions() else {
            return Ok(false);
        };
        let orientation = pair.orientation.rotated(rotation);
        self.relocate(pair.block2, orientation.partner_of(p1))?;
        if let Some(active) = self.active.as_mut() {
            active.orientation = orientation;
        }
        Ok(true)
    }

    pub fn quick_drop(&mut self) {
        if let Some(pair) = self.active.as_mut() {
            pair.vertical_speed = VerticalSpeed::DroppingFast;
        }
    }

    pub fn set_horizontal_intent(&mut self, direction: HorizontalDirection) {
        if let Some(pair) = self.active.as_mut() {
            pair.horizontal = direction;
        }
    }

    /// Return the pending horizontal intent and reset it.
    pub fn take_horizontal_intent(&mut self) -> HorizontalDirection {
        self.active
            .as_mut()
            .map(|pair| std::mem::take(&mut pair.horizontal))
            .unwrap_or_default()
    }

    /// One auto-fall step of the falling pair, lower block first. A block that
    /// cannot drop is set Stopped and the pair speeds up. Returns whether the
    /// pair has settled.
    pub fn fall_active_pair(&mut self) -> ArenaResult<bool> {
        let Some((pair, p1, p2)) = self.active_positions() else {
            return Ok(false);
        };
        let order = if p1.y < p2.y {
            [pair.block1, pair.block2]
        } else {
            [pair.block2, pair.block1]
        };
        for id in order {
            if !self.try_drop(id)? {
                self.record_status(id, BlockStatus::Stopped);
                self.quick_drop();
            }
        }
        Ok(self.is_pair_settled())
    }

    /// Mark every block in the component of `start` that has `kind` and a
    /// status other than `new_status`, adding each one to `counter`.
    ///
    /// Blocks already at `new_status` bound the search. A visited mask keeps
    /// the walk finite whatever statuses the component holds.
    pub fn mark_linked(
        &mut self,
        kind: BlockType,
        new_status: BlockStatus,
        start: Position,
        counter: usize,
    ) -> usize {
        let mut counter = counter;
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            let Some(idx) = self.index(pos) else {
                continue;
            };
            if std::mem::replace(&mut visited[idx], true) {
                continue;
            }
            let Some(id) = self.cells[idx] else {
                continue;
            };
            let Some(block) = self.block(id) else {
                continue;
            };
            if block.kind() != kind || block.status() == new_status {
                continue;
            }
            self.record_status(id, new_status);
            counter += 1;
            let [east, west, north, south] = pos.neighbours();
            stack.extend([south, north, west, east]);
        }
        counter
    }

    /// Match scan: every group at or above the threshold becomes Exploding,
    /// everything else is restored to Stopped. Returns `(score, groups)`.
    fn check_linked(&mut self) -> (u32, u32) {
        let mut score = 0u32;
        let mut groups = 0u32;
        for pos in self.row_major() {
            let Some(block) = self.cell(pos).and_then(|id| self.block(id)) else {
                continue;
            };
            if block.status() == BlockStatus::Exploding {
                continue;
            }
            let kind = block.kind();
            let linked = self.mark_linked(kind, BlockStatus::MarkedForDeletion, pos, 0);
            let matched = linked >= self.match_threshold;
            let settle_to = if matched {
                BlockStatus::Exploding
            } else {
                BlockStatus::Stopped
            };
            self.mark_linked(kind, settle_to, pos, 0);
            if matched {
                groups += 1;
                score += linked as u32 * groups;
            }
        }
        (score, groups)
    }

    /// Delete every Exploding block. Stopped blocks left hanging over a removed
    /// cell become Detached.
    fn remove_exploding(&mut self) -> ArenaResult<usize> {
        let exploding: Vec<(BlockId, Position)> = self
            .placed_blocks()
            .filter(|(_, b)| b.status() == BlockStatus::Exploding)
            .map(|(id, b)| (id, b.position()))
            .collect();
        for &(id, _) in &exploding {
            self.take(id)?;
            self.dispose(id);
        }
        for &(_, pos) in &exploding {
            if let Some(above) = self.cell(pos.above()) {
                if self
                    .block(above)
                    .is_some_and(|b| b.status() == BlockStatus::Stopped)
                {
                    self.record_status(above, BlockStatus::Detached);
                }
            }
        }
        Ok(exploding.len())
    }

    /// Gravity trigger: every block that can drop becomes Dropping.
    pub fn mark_suspended_as_dropping(&mut self) {
        let suspended: Vec<BlockId> = self
            .placed_blocks()
            .map(|(id, _)| id)
            .filter(|&id| self.can_drop(id))
            .collect();
        for id in suspended {
            self.record_status(id, BlockStatus::Dropping);
        }
    }

    /// Drop blocks one row per pass until a full pass moves nothing. Blocks
    /// that cannot drop are set Stopped; ones already Stopped record nothing.
    /// Returns whether anything moved.
    pub fn cascade_gravity(&mut self) -> ArenaResult<bool> {
        let mut any_moved = false;
        loop {
            let mut moved = false;
            for pos in self.row_major() {
                let Some(id) = self.cell(pos) else {
                    continue;
                };
                if self.try_drop(id)? {
                    moved = true;
                } else if self
                    .block(id)
                    .is_some_and(|b| b.status() != BlockStatus::Stopped)
                {
                    self.record_status(id, BlockStatus::Stopped);
                }
            }
            if !moved {
                return Ok(any_moved);
            }
            any_moved = true;
        }
    }

    /// Settle resolution: match, explode, fall, repeat while anything falls.
    /// Each pass multiplies the accumulated score by the chain count. Does
    /// nothing while the falling pair is still in the air.
    ///
    /// Every match scan records status changes for each block it visits. The
    /// event buffer is only emptied by [`Arena::drain_events`], so callers that
    /// resolve repeatedly must drain between settles.
    pub fn resolve_after_settle(&mut self) -> ArenaResult<u32> {
        if self.active.is_some() && !self.is_pair_settled() {
            return Ok(0);
        }
        self.active = None;
        let mut round_score = 0u32;
        let mut chain = 0u32;
        loop {
            let (score, groups) = self.check_linked();
            round_score += score;
            let removed = self.remove_exploding()?;
            if removed == 0 {
                break;
            }
            self.mark_suspended_as_dropping();
            let moved = self.cascade_gravity()?;
            chain += 1;
            round_score = round_score.saturating_mul(chain);
            self.events.push(ArenaEvent::Chain {
                chain,
                groups,
                removed,
            });
            if !moved {
                break;
            }
        }
        Ok(round_score.saturating_mul(self.score_multiplier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green(arena: &mut Arena, x: i32, y: i32) -> BlockId {
        arena
            .add_block(Block::new(BlockType::Green).at(x, y), BlockStatus::Stopped)
            .unwrap()
    }

    #[test]
    fn test_index_layout_includes_spawn_row() {
        let arena = Arena::seeded(1);
        assert_eq!(arena.index(Position::new(1, 1)), Some(0));
        assert_eq!(arena.index(Position::new(8, 1)), Some(7));
        assert_eq!(arena.index(Position::new(1, 2)), Some(8));
        assert_eq!(arena.index(Position::new(8, 14)), Some(8 * 14 - 1));
        assert_eq!(arena.index(Position::new(0, 1)), None);
        assert_eq!(arena.index(Position::new(9, 1)), None);
        assert_eq!(arena.index(Position::new(1, 15)), None);
    }

    #[test]
    fn test_disposed_slots_are_reused() {
        let mut arena = Arena::seeded(1);
        let a = green(&mut arena, 1, 1);
        arena.remove(a).unwrap();
        arena.dispose(a);
        assert!(arena.block(a).is_none());
        let b = green(&mut arena, 2, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_check_linked_scores_each_group_by_order() {
        let mut arena = Arena::seeded(1);
        for y in 1..=4 {
            green(&mut arena, 1, y);
        }
        for y in 1..=5 {
            arena
                .add_block(Block::new(BlockType::Red).at(3, y), BlockStatus::Stopped)
                .unwrap();
        }
        let (score, groups) = arena.check_linked();
        assert_eq!(groups, 2);
        // first group 4 x 1, second group 5 x 2
        assert_eq!(score, 4 + 10);
    }

    #[test]
    fn test_removal_detaches_block_above() {
        let mut arena = Arena::seeded(1);
        let doomed = green(&mut arena, 2, 1);
        let above = arena
            .add_block(Block::new(BlockType::Red).at(2, 2), BlockStatus::Stopped)
            .unwrap();
        arena.set_status(doomed, BlockStatus::Exploding).unwrap();
        assert_eq!(arena.remove_exploding().unwrap(), 1);
        assert!(arena.block_at(2, 1).is_none());
        assert_eq!(arena.block(above).unwrap().status(), BlockStatus::Detached);
    }

    #[test]
    fn test_pair_settled_event_fires_once_both_stop() {
        let mut arena = Arena::seeded(5);
        arena.spawn_next_pair().unwrap();
        let pair = *arena.active_pair().unwrap();
        arena.drain_events().for_each(drop);
        arena.set_status(pair.block1, BlockStatus::Stopped).unwrap();
        assert!(!arena.events().contains(&ArenaEvent::PairSettled));
        arena.set_status(pair.block2, BlockStatus::Stopped).unwrap();
        assert!(arena.events().contains(&ArenaEvent::PairSettled));
    }
}
