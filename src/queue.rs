//! Lookahead queue of pregenerated block pairs.

use crate::pair::QueuedPair;
use rand::Rng;
use std::collections::VecDeque;

/// FIFO of upcoming pairs. With `refill` on, every dequeue generates a new pair
/// at the back so the lookahead length stays constant.
#[derive(Debug, Clone)]
pub struct BlockPairQueue<R> {
    pairs: VecDeque<QueuedPair>,
    refill: bool,
    power_chance: [u8; 2],
    rng: R,
}

impl<R: Rng> BlockPairQueue<R> {
    pub fn new(length: usize, refill: bool, power_chance: [u8; 2], mut rng: R) -> Self {
        let pairs = (0..length)
            .map(|_| QueuedPair::random(&mut rng, power_chance))
            .collect();
        Self {
            pairs,
            refill,
            power_chance,
            rng,
        }
    }

    /// Next pair, or `None` once a non-refilling queue runs dry.
    pub fn next_pair(&mut self) -> Option<QueuedPair> {
        let pair = self.pairs.pop_front()?;
        if self.refill {
            self.pairs
                .push_back(QueuedPair::random(&mut self.rng, self.power_chance));
        }
        Some(pair)
    }
}

impl<R> BlockPairQueue<R> {
    pub fn peek(&self) -> Option<&QueuedPair> {
        self.pairs.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn queue(length: usize, refill: bool, seed: u64) -> BlockPairQueue<StdRng> {
        BlockPairQueue::new(length, refill, [0, 0], StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_peek_matches_next() {
        let mut q = queue(2, true, 1);
        let peeked = q.peek().cloned();
        assert_eq!(peeked, q.next_pair());
    }

    #[test]
    fn test_refill_keeps_length() {
        let mut q = queue(3, true, 1);
        for _ in 0..20 {
            assert!(q.next_pair().is_some());
            assert_eq!(q.len(), 3);
        }
    }

    #[test]
    fn test_without_refill_runs_dry() {
        let mut q = queue(2, false, 1);
        assert!(q.next_pair().is_some());
        assert!(q.next_pair().is_some());
        assert!(q.next_pair().is_none());
        assert!(q.is_empty());
        assert!(q.peek().is_none());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = queue(2, true, 99);
        let mut b = queue(2, true, 99);
        for _ in 0..50 {
            assert_eq!(
                a.next_pair().map(|p| p.kinds()),
                b.next_pair().map(|p| p.kinds())
            );
        }
    }

    #[test]
    fn test_lookahead_reads_without_a_generator() {
        let q = BlockPairQueue {
            pairs: [
                QueuedPair::new(BlockType::Red, BlockType::Blue),
                QueuedPair::new(BlockType::Green, BlockType::Green),
            ]
            .into(),
            refill: false,
            power_chance: [0, 0],
            rng: (),
        };
        assert_eq!(q.len(), 2);
        assert!(!q.is_empty());
        assert_eq!(
            q.peek().map(QueuedPair::kinds),
            Some((BlockType::Red, BlockType::Blue))
        );
        let kinds: Vec<_> = q.iter().map(QueuedPair::kinds).collect();
        assert_eq!(
            kinds,
            vec![
                (BlockType::Red, BlockType::Blue),
                (BlockType::Green, BlockType::Green)
            ]
        );
    }

    #[test]
    fn test_power_chance_is_per_slot() {
        let mut q = BlockPairQueue::new(4, true, [0, 100], StdRng::seed_from_u64(3));
        for _ in 0..50 {
            let pair = q.next_pair().expect("refilling queue never runs dry");
            assert!(!pair.block1.kind().is_power());
            assert!(pair.block2.kind().is_power());
        }
    }
}
