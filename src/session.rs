//! Game session: drives an [`Arena`] on a clock.
//!
//! The caller feeds elapsed time and the player's current intent; the session
//! applies moves and rotations on their own cadence, ticks the falling pair down,
//! resolves settles into score and spawns the next pair.

use crate::arena::{Arena, ArenaConfig, ArenaEvent};
use crate::block::BlockStatus;
use crate::error::{ArenaError, ArenaResult, ConfigError};
use crate::pair::{HorizontalDirection, Rotation, VerticalSpeed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Time between auto-fall steps at normal speed.
pub const NORMAL_DROP_INTERVAL: Duration = Duration::from_millis(600);
pub const FAST_DROP_INTERVAL: Duration = Duration::from_millis(100);
pub const MOVES_PER_DROP: u32 = 8;
pub const ROTATES_PER_DROP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub normal_drop: Duration,
    pub fast_drop: Duration,
    pub moves_per_drop: u32,
    pub rotates_per_drop: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            normal_drop: NORMAL_DROP_INTERVAL,
            fast_drop: FAST_DROP_INTERVAL,
            moves_per_drop: MOVES_PER_DROP,
            rotates_per_drop: ROTATES_PER_DROP,
        }
    }
}

/// What the player is holding down this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionInput {
    pub horizontal: HorizontalDirection,
    pub rotation: Rotation,
    pub quick_drop: bool,
}

impl SessionInput {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of one settle, for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settle {
    pub points: u32,
    pub chains: u32,
}

#[derive(Debug)]
pub struct Session<R = StdRng> {
    arena: Arena<R>,
    config: SessionConfig,
    score: u32,
    last_settle: Option<Settle>,
    game_over: bool,
    overflowed: bool,
    events: Vec<ArenaEvent>,
    fall_timer: Duration,
    move_timer: Duration,
    rotate_timer: Duration,
}

impl Session<StdRng> {
    pub fn new(arena: ArenaConfig, config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_rng(arena, config, StdRng::from_os_rng())
    }

    pub fn seeded(arena: ArenaConfig, config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(arena, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(arena: ArenaConfig, config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        let arena = Arena::with_rng(arena, rng)?;
        let mut session = Self {
            arena,
            config,
            score: 0,
            last_settle: None,
            game_over: false,
            overflowed: false,
            events: Vec::new(),
            fall_timer: Duration::ZERO,
            move_timer: Duration::ZERO,
            rotate_timer: Duration::ZERO,
        };
        if session.spawn().is_err() {
            session.game_over = true;
        }
        Ok(session)
    }

    /// Empty the arena, zero the score and spawn a fresh pair.
    pub fn restart(&mut self) -> ArenaResult<()> {
        self.arena.clear();
        self.arena.drain_events().for_each(drop);
        self.events.clear();
        self.score = 0;
        self.last_settle = None;
        self.game_over = false;
        self.overflowed = false;
        self.fall_timer = Duration::ZERO;
        self.move_timer = Duration::ZERO;
        self.rotate_timer = Duration::ZERO;
        self.spawn()
    }

    fn spawn(&mut self) -> ArenaResult<()> {
        match self.arena.spawn_next_pair() {
            Ok(true) => {}
            Ok(false) | Err(ArenaError::CellOccupied { .. }) => self.game_over = true,
            Err(err) => return Err(err),
        }
        self.collect_events();
        Ok(())
    }

    /// Advance the session by `elapsed`. Returns the settle that happened
    /// during this step, if any.
    ///
    /// Arena events collected along the way accumulate until
    /// [`Session::drain_events`]; a frontend should drain once per frame.
    pub fn update(&mut self, elapsed: Duration, input: SessionInput) -> ArenaResult<Option<Settle>> {
        if self.game_over || self.arena.active_pair().is_none() {
            return Ok(None);
        }
        self.fall_timer += elapsed;
        self.move_timer += elapsed;
        self.rotate_timer += elapsed;

        if !input.is_idle() {
            self.apply_input(input)?;
        }

        if self.fall_timer < self.drop_interval() {
            self.collect_events();
            return Ok(None);
        }
        self.fall_timer = Duration::ZERO;
        let settled = self.arena.fall_active_pair()?;
        self.collect_events();
        if settled { self.settle().map(Some) } else { Ok(None) }
    }

    fn apply_input(&mut self, input: SessionInput) -> ArenaResult<()> {
        if input.quick_drop {
            self.arena.quick_drop();
        }
        if !self.pair_in_flight() {
            return Ok(());
        }
        let interval = self.drop_interval();
        if input.horizontal != HorizontalDirection::None
            && self.move_timer >= interval / self.config.moves_per_drop.max(1)
        {
            self.arena.set_horizontal_intent(input.horizontal);
            match self.arena.take_horizontal_intent() {
                HorizontalDirection::Left => self.arena.move_left()?,
                HorizontalDirection::Right => self.arena.move_right()?,
                HorizontalDirection::None => false,
            };
            self.move_timer = Duration::ZERO;
        }
        if input.rotation != Rotation::None
            && self.rotate_timer >= interval / self.config.rotates_per_drop.max(1)
        {
            self.arena.rotate(input.rotation)?;
            self.rotate_timer = Duration::ZERO;
        }
        Ok(())
    }

    fn settle(&mut self) -> ArenaResult<Settle> {
        if self.overflowed {
            self.game_over = true;
            let settle = Settle::default();
            self.last_settle = Some(settle);
            return Ok(settle);
        }
        let points = self.arena.resolve_after_settle()?;
        self.collect_events();
        let chains = self
            .events
            .iter()
            .rev()
            .take_while(|e| !matches!(e, ArenaEvent::PairSettled))
            .filter(|e| matches!(e, ArenaEvent::Chain { .. }))
            .count() as u32;
        self.score = self.score.saturating_add(points);
        let settle = Settle { points, chains };
        self.last_settle = Some(settle);
        // Resolution can leave a block resting on the spawn line.
        if self.overflowed {
            self.game_over = true;
        } else {
            self.spawn()?;
        }
        Ok(settle)
    }
}

impl<R> Session<R> {
    /// Both pair blocks still falling; the only state in which the pair steers.
    fn pair_in_flight(&self) -> bool {
        self.arena.active_pair().is_some_and(|pair| {
            pair.blocks().iter().all(|&&id| {
                self.arena
                    .block(id)
                    .is_some_and(|b| b.status() == BlockStatus::Dropping)
            })
        })
    }

    fn drop_interval(&self) -> Duration {
        match self.arena.active_pair().map(|p| p.vertical_speed) {
            Some(VerticalSpeed::DroppingFast) => self.config.fast_drop,
            _ => self.config.normal_drop,
        }
    }

    fn collect_events(&mut self) {
        let spawn_row = self.arena.spawn_row();
        for event in self.arena.drain_events() {
            self.overflowed |= event.is_overflow(spawn_row);
            self.events.push(event);
        }
    }

    pub fn arena(&self) -> &Arena<R> {
        &self.arena
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn last_settle(&self) -> Option<Settle> {
        self.last_settle
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Arena events gathered since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, ArenaEvent> {
        self.events.drain(..)
    }
}
