use chainblocks::{Arena, ArenaEvent, Block, BlockId, BlockStatus, BlockType};

fn put(arena: &mut Arena, kind: BlockType, x: i32, y: i32) -> BlockId {
    arena
        .add_block(Block::new(kind).at(x, y), BlockStatus::Stopped)
        .expect("cell should be free")
}

fn column(arena: &mut Arena, kind: BlockType, x: i32, ys: std::ops::RangeInclusive<i32>) {
    for y in ys {
        put(arena, kind, x, y);
    }
}

fn chain_events(arena: &Arena) -> Vec<(u32, u32, usize)> {
    arena
        .events()
        .iter()
        .filter_map(|e| match *e {
            ArenaEvent::Chain {
                chain,
                groups,
                removed,
            } => Some((chain, groups, removed)),
            _ => None,
        })
        .collect()
}

fn assert_at_rest(arena: &Arena) {
    for (id, block) in arena.placed_blocks() {
        assert_eq!(block.status(), BlockStatus::Stopped, "{:?}", block.position());
        assert!(!arena.can_drop(id), "{:?} still hanging", block.position());
    }
}

#[test]
fn test_four_in_a_column_explode() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 1, 1..=4);
    assert_eq!(arena.resolve_after_settle().unwrap(), 400);
    assert_eq!(arena.placed_blocks().count(), 0);
    assert_eq!(chain_events(&arena), vec![(1, 1, 4)]);
}

#[test]
fn test_three_linked_stay() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 1, 1..=3);
    assert_eq!(arena.resolve_after_settle().unwrap(), 0);
    assert_eq!(arena.placed_blocks().count(), 3);
    assert_at_rest(&arena);
    assert!(chain_events(&arena).is_empty());
}

#[test]
fn test_t_shape_scores_five_hundred() {
    let mut arena = Arena::seeded(1);
    for (x, y) in [(2, 1), (3, 1), (4, 1), (3, 2), (3, 3)] {
        put(&mut arena, BlockType::Green, x, y);
    }
    assert_eq!(arena.resolve_after_settle().unwrap(), 500);
    assert_eq!(arena.placed_blocks().count(), 0);
}

#[test]
fn test_second_group_in_a_pass_scores_double() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 1, 1..=4);
    column(&mut arena, BlockType::Red, 3, 1..=5);
    // 4 x 1 + 5 x 2, one pass
    assert_eq!(arena.resolve_after_settle().unwrap(), 1400);
    assert_eq!(chain_events(&arena), vec![(1, 2, 9)]);
}

#[test]
fn test_unmatched_blocks_fall_after_explosion() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 2, 1..=4);
    let red = put(&mut arena, BlockType::Red, 2, 5);
    let blue = put(&mut arena, BlockType::Blue, 2, 6);
    assert_eq!(arena.resolve_after_settle().unwrap(), 400);
    assert_eq!(arena.block(red).unwrap().position().y, 1);
    assert_eq!(arena.block(blue).unwrap().position().y, 2);
    assert_at_rest(&arena);
}

#[test]
fn test_block_above_explosion_is_detached_then_lands() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 2, 1..=4);
    let red = put(&mut arena, BlockType::Red, 2, 5);
    arena.drain_events().for_each(drop);
    arena.resolve_after_settle().unwrap();
    let red_statuses: Vec<BlockStatus> = arena
        .events()
        .iter()
        .filter_map(|e| match *e {
            ArenaEvent::StatusChanged { block, change } if block == red => Some(change.new),
            _ => None,
        })
        .collect();
    let detached = red_statuses
        .iter()
        .position(|&s| s == BlockStatus::Detached)
        .expect("red should be detached");
    assert_eq!(red_statuses[detached + 1], BlockStatus::Dropping);
    assert_eq!(red_statuses.last(), Some(&BlockStatus::Stopped));
}

#[test]
fn test_chain_multiplies_score() {
    let mut arena = Arena::seeded(1);
    // Floor row of greens with three reds stacked on the first one.
    for x in 1..=4 {
        put(&mut arena, BlockType::Green, x, 1);
    }
    column(&mut arena, BlockType::Red, 1, 2..=4);
    column(&mut arena, BlockType::Blue, 2, 2..=3);
    // Floating red that lands beside the red stack once the greens go.
    put(&mut arena, BlockType::Red, 2, 5);

    // pass 1: 4 -> x1 = 4; pass 2: 4 + 4 = 8 -> x2 = 16
    assert_eq!(arena.resolve_after_settle().unwrap(), 1600);
    assert_eq!(chain_events(&arena), vec![(1, 1, 4), (2, 1, 4)]);

    let left: Vec<_> = arena
        .placed_blocks()
        .map(|(_, b)| (b.kind(), b.x(), b.y()))
        .collect();
    assert_eq!(left, vec![(BlockType::Blue, 2, 1), (BlockType::Blue, 2, 2)]);
    assert_at_rest(&arena);
}

#[test]
fn test_resolve_waits_for_pair_to_land() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 1, 1..=4);
    arena.spawn_next_pair().unwrap();
    assert_eq!(arena.resolve_after_settle().unwrap(), 0);
    assert_eq!(arena.placed_blocks().count(), 6);
    assert!(arena.active_pair().is_some());
}

#[test]
fn test_settled_pair_completes_a_group() {
    let mut arena = Arena::seeded(1);
    let kind = arena.peek_next_pair().unwrap().block1.kind();
    // Block 1 lands on (4,3) and links these three.
    column(&mut arena, kind, 4, 1..=2);
    put(&mut arena, kind, 3, 3);
    arena.spawn_next_pair().unwrap();
    let pair = *arena.active_pair().unwrap();
    while !arena.fall_active_pair().unwrap() {}
    assert_eq!(arena.block(pair.block1).unwrap().position().y, 3);
    assert!(arena.resolve_after_settle().unwrap() >= 400);
    assert!(arena.active_pair().is_none());
    assert!(arena.block_at(4, 1).is_none());
    assert!(arena.block_at(3, 3).is_none());
}

#[test]
fn test_explosions_free_storage_slots() {
    let mut arena = Arena::seeded(1);
    let ids: Vec<_> = (1..=4).map(|y| put(&mut arena, BlockType::Purple, 6, y)).collect();
    arena.resolve_after_settle().unwrap();
    for id in ids {
        assert!(arena.block(id).is_none());
    }
}

#[test]
fn test_gravity_on_a_resting_board_records_nothing() {
    let mut arena = Arena::seeded(1);
    column(&mut arena, BlockType::Green, 1, 1..=3);
    column(&mut arena, BlockType::Red, 2, 1..=2);
    arena.drain_events().for_each(drop);
    assert!(!arena.cascade_gravity().unwrap());
    assert!(arena.events().is_empty());
}
