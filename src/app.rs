//! App: terminal init, main loop, key handling.

use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Explosions};
use anyhow::Result;
use chainblocks::{ArenaEvent, BlockStatus, Position, Session, SessionInput};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Delay before a held key starts acting every frame. Only used when the
/// terminal reports key releases.
const REPEAT_DELAY_MS: u64 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    session: Session,
    theme: Theme,
    screen: Screen,
    paused: bool,
    no_animation: bool,
    frame_duration: Duration,
    last_update: Instant,
    /// Key held down and when it was pressed.
    repeat_state: Option<(Action, Instant)>,
    release_events: bool,
    explosions: Explosions,
}

impl App {
    pub fn new(session: Session, theme: Theme, no_animation: bool, frame_rate: f64) -> Self {
        Self {
            session,
            theme,
            screen: Screen::Playing,
            paused: false,
            no_animation,
            frame_duration: Duration::from_secs_f64(1.0 / frame_rate.clamp(1.0, 240.0)),
            last_update: Instant::now(),
            repeat_state: None,
            release_events: false,
            explosions: Explosions::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events let held keys keep steering the pair.
        self.release_events = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();

        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        let result = self.run_loop(&mut terminal);

        if self.release_events {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn restart(&mut self) -> Result<()> {
        self.session.restart()?;
        self.screen = Screen::Playing;
        self.paused = false;
        self.repeat_state = None;
        self.explosions.clear();
        self.last_update = Instant::now();
        Ok(())
    }

    /// Blocks that exploded since the last frame.
    fn collect_explosions(&mut self) {
        let cells: Vec<Position> = self
            .session
            .drain_events()
            .filter_map(|event| match event {
                ArenaEvent::StatusChanged { change, .. } if change.new == BlockStatus::Exploding => {
                    Some(Position::new(change.x, change.y))
                }
                _ => None,
            })
            .collect();
        if !cells.is_empty() {
            self.explosions.start(cells);
        }
    }

    fn held_input(&self, now: Instant) -> SessionInput {
        let mut input = SessionInput::default();
        if let Some((action, since)) = self.repeat_state {
            if now.duration_since(since) >= Duration::from_millis(REPEAT_DELAY_MS) {
                action.apply_to(&mut input);
            }
        }
        input
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                ui::draw(
                    f,
                    self.screen,
                    &self.session,
                    &self.theme,
                    self.paused,
                    &mut self.explosions,
                    self.no_animation,
                    now,
                );
            })?;

            if self.explosions.is_active() && (self.no_animation || self.explosions.is_done()) {
                self.explosions.clear();
            }

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            let mut input = self.held_input(now);

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    let action = key_to_action(key);
                    match key.kind {
                        KeyEventKind::Release => {
                            if self.repeat_state.map(|(a, _)| a) == Some(action) {
                                self.repeat_state = None;
                            }
                            continue;
                        }
                        // OS auto-repeat acts like a fresh press; the session throttles it.
                        KeyEventKind::Repeat => {
                            action.apply_to(&mut input);
                            continue;
                        }
                        KeyEventKind::Press => {}
                    }

                    match (self.screen, action) {
                        (_, Action::Quit) => return Ok(()),
                        (_, Action::Restart) => self.restart()?,
                        (Screen::Playing, Action::Pause) => {
                            self.paused = !self.paused;
                            self.repeat_state = None;
                        }
                        (Screen::Playing, _) if !self.paused => {
                            action.apply_to(&mut input);
                            if self.release_events && action.is_held() {
                                self.repeat_state = Some((action, Instant::now()));
                            }
                        }
                        _ => {}
                    }
                }
            }

            let elapsed = self.last_update.elapsed();
            self.last_update = Instant::now();
            if self.screen == Screen::Playing && !self.paused {
                if self.session.update(elapsed, input)?.is_some() {
                    self.repeat_state = None;
                }
                self.collect_explosions();
                if self.session.is_game_over() {
                    self.screen = Screen::GameOver;
                }
            }
        }
    }
}
