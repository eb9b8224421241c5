//! Layout and drawing: arena, next pairs, score sidebar, pause and game over.

use crate::app::Screen;
use crate::theme::Theme;
use chainblocks::{Arena, BlockStatus, BlockType, Position as GridPos, QueuedPair, Session};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each arena cell is two terminal columns wide so blocks come out square-ish.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;
const SIDEBAR_WIDTH: u16 = 24;
/// Duration of the explosion fade (TachyonFX) in ms.
const EXPLOSION_FADE_MS: u32 = 350;

const STANDARD_GLYPH: &str = "██";
const POWER_GLYPH: &str = "▓▓";
const FLASH_GLYPH: &str = "░░";

/// Arena size in terminal cells, border included.
fn arena_pixel_size(arena: &Arena) -> (u16, u16) {
    let w = arena.width() as u16 * CELL_WIDTH;
    let h = arena.spawn_row() as u16 * CELL_HEIGHT;
    (w + 2, h + 2)
}

/// Terminal cell of the top-left corner of grid cell `(x, y)`.
fn cell_origin(board: Rect, arena: &Arena, pos: GridPos) -> (u16, u16) {
    let col = (pos.x - 1) as u16 * CELL_WIDTH;
    let row = (arena.spawn_row() - pos.y) as u16 * CELL_HEIGHT;
    (board.x + col, board.y + row)
}

fn glyph(kind: BlockType) -> &'static str {
    if kind.is_power() { POWER_GLYPH } else { STANDARD_GLYPH }
}

/// Cells cleared by the last settle, flashed then faded to the background.
#[derive(Default)]
pub struct Explosions {
    cells: Vec<GridPos>,
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl Explosions {
    pub fn start(&mut self, cells: Vec<GridPos>) {
        self.cells = cells;
        self.effect = None;
        self.last_process = None;
    }

    pub fn is_active(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.effect.as_ref().is_some_and(Effect::done)
    }

    pub fn clear(&mut self) {
        self.start(Vec::new());
    }
}

/// Draw the game screen with the pause or game-over overlay on top.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    session: &Session,
    theme: &Theme,
    paused: bool,
    explosions: &mut Explosions,
    no_animation: bool,
    now: Instant,
) {
    let area = frame.area();
    let board = draw_game(frame, session, theme, area, explosions);
    if explosions.is_active() && !no_animation {
        apply_explosion_effect(frame, session.arena(), theme, board, explosions, now);
    }
    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, theme, area),
        Screen::Playing => {}
        Screen::GameOver => draw_game_over(frame, session, theme, area),
    }
}

/// Draw arena + sidebar centred in `area`. Returns the inner board rect.
fn draw_game(
    frame: &mut Frame,
    session: &Session,
    theme: &Theme,
    area: Rect,
    explosions: &Explosions,
) -> Rect {
    let (pw, ph) = arena_pixel_size(session.arena());
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let board = draw_arena(frame, session.arena(), theme, inner[0], explosions);
    draw_sidebar(frame, session, theme, inner[1]);
    board
}

fn draw_arena(
    frame: &mut Frame,
    arena: &Arena,
    theme: &Theme,
    area: Rect,
    explosions: &Explosions,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Chainblocks ", theme.title));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let bottom = board.y + board.height;
    let right = board.x + board.width;
    let buf = frame.buffer_mut();

    for y in 1..=arena.spawn_row() {
        // The spawn line sits above the playable rows.
        let bg = if y == arena.spawn_row() {
            theme.div_line
        } else {
            theme.bg
        };
        for x in 1..=arena.width() {
            let pos = GridPos::new(x, y);
            let (rx, ry) = cell_origin(board, arena, pos);
            if rx + CELL_WIDTH > right || ry >= bottom {
                continue;
            }
            let (symbol, style) = match arena.block_at(x, y) {
                Some(b) => {
                    let color = theme.block_color(b.kind());
                    let mut style = Style::default().fg(color).bg(bg);
                    if b.status() == BlockStatus::Detached {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    (glyph(b.kind()), style)
                }
                None if explosions.cells.contains(&pos) => {
                    (FLASH_GLYPH, Style::default().fg(Color::White).bg(bg))
                }
                None => ("  ", Style::default().bg(bg)),
            };
            buf.set_string(rx, ry, symbol, style);
        }
    }
    board
}

/// Buffer cells covered by the explosion flash. Cells a block has since fallen
/// into are left alone.
fn explosion_buffer_positions(board: Rect, arena: &Arena, cells: &[GridPos]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &pos in cells {
        if arena.block_at(pos.x, pos.y).is_some() {
            continue;
        }
        let (x0, y0) = cell_origin(board, arena, pos);
        for bx in x0..(x0 + CELL_WIDTH).min(board.x + board.width) {
            for by in y0..(y0 + CELL_HEIGHT).min(board.y + board.height) {
                set.insert((bx, by));
            }
        }
    }
    set
}

/// Create or advance the explosion fade (TachyonFX: flash cells fade to bg).
fn apply_explosion_effect(
    frame: &mut Frame,
    arena: &Arena,
    theme: &Theme,
    board: Rect,
    explosions: &mut Explosions,
    now: Instant,
) {
    let delta = explosions
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or_default();
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    explosions.last_process = Some(now);

    if explosions.effect.is_none() {
        let flashing = explosion_buffer_positions(board, arena, &explosions.cells);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            flashing.contains(&(pos.x, pos.y))
        }));
        let bg = theme.bg;
        let effect = fx::fade_to(bg, bg, (EXPLOSION_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        explosions.effect = Some(effect);
    }

    if let Some(effect) = explosions.effect.as_mut() {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_sidebar(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let arena = session.arena();
    let lookahead = arena.upcoming_pairs().count() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(lookahead * 2 + 2), // Next (border + title + one row per pair)
            Constraint::Length(1),
            Constraint::Length(6), // Stats
            Constraint::Length(1),
            Constraint::Length(7), // Controls
        ])
        .split(area);

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    draw_next_preview(frame, arena.upcoming_pairs(), theme, next_inner);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let last = session.last_settle().unwrap_or_default();
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats = vec![
        stat("Score: ", session.score().to_string()),
        stat("Last:  ", format!("+{}", last.points)),
        stat("Chain: ", format!("x{}", last.chains)),
        stat("Blocks: ", arena.placed_blocks().count().to_string()),
    ];
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    let help_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let help_inner = help_block.inner(chunks[4]);
    help_block.render(chunks[4], frame.buffer_mut());
    let dim = Style::default().fg(theme.inactive_fg);
    let help = vec![
        Line::from(Span::styled("Z/X ←/→   move", dim)),
        Line::from(Span::styled("↑ / U     rotate", dim)),
        Line::from(Span::styled("↓         drop", dim)),
        Line::from(Span::styled("P pause   Q quit", dim)),
        Line::from(Span::styled("R restart", dim)),
    ];
    Paragraph::new(Text::from(help)).render(help_inner, frame.buffer_mut());
}

/// Upcoming pairs, first in line at the top, drawn the way they will spawn.
fn draw_next_preview<'a>(
    frame: &mut Frame,
    pairs: impl Iterator<Item = &'a QueuedPair>,
    theme: &Theme,
    area: Rect,
) {
    let pair_w = CELL_WIDTH * 2;
    let x = area.x + area.width.saturating_sub(pair_w) / 2;
    let buf = frame.buffer_mut();
    for (i, pair) in pairs.enumerate() {
        let y = area.y + i as u16 * 2;
        if y >= area.y + area.height {
            break;
        }
        for (slot, block) in pair.blocks().into_iter().enumerate() {
            let color = theme.block_color(block.kind());
            buf.set_string(
                x + slot as u16 * CELL_WIDTH,
                y,
                glyph(block.kind()),
                Style::default().fg(color).bg(theme.bg),
            );
        }
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P: resume    Q: quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let popup_w = 30u16;
    let popup_h = 8u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R: restart    Q: quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Chainblocks ", theme.title)),
        )
        .render(popup, frame.buffer_mut());
}
