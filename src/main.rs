//! Chainblocks: falling block-pair chain puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use chainblocks::{ArenaConfig, Session, SessionConfig};
use clap::{Parser, ValueEnum};

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|_| {
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    });
    let arena = args.arena_config();
    let session = match args.seed {
        Some(seed) => Session::seeded(arena, SessionConfig::default(), seed),
        None => Session::new(arena, SessionConfig::default()),
    }
    .context("invalid arena settings")?;
    let mut app = App::new(session, theme, args.no_animation, args.frame_rate);
    app.run()?;
    Ok(())
}

/// Falling block-pair puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "chainblocks",
    version,
    about = "Falling block-pair puzzle in the terminal. Link four of a colour to blow them up; chains multiply the score.",
    long_about = "Chainblocks drops pairs of coloured blocks into the arena.\n\n\
        Four or more orthogonally linked blocks of one colour explode. Blocks above fall \
        into the gaps, and every further explosion in the same settle multiplies the score. \
        The game ends when a pair comes to rest on the spawn line.\n\n\
        CONTROLS:\n  Z / Left    Move left    X / Right   Move right\n  Up / K      Rotate CW    U           Rotate CCW\n  Down / J    Drop faster  P           Pause\n  R           Restart      Q / Esc     Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Arena width in columns.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub width: i32,

    /// Playable arena height in rows, not counting the spawn line.
    #[arg(long, default_value = "13", value_name = "ROWS")]
    pub height: i32,

    /// Seed for a reproducible pair sequence.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Percent chance of a power block in each pair slot.
    #[arg(long, default_value = "0", value_name = "PCT")]
    pub power_chance: u8,

    /// Number of upcoming pairs shown.
    #[arg(long, default_value = "2", value_name = "N")]
    pub lookahead: usize,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the explosion fade.
    #[arg(long)]
    pub no_animation: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE", value_parser = parse_frame_rate)]
    pub frame_rate: f64,
}

impl Args {
    fn arena_config(&self) -> ArenaConfig {
        ArenaConfig {
            width: self.width,
            height: self.height,
            queue_length: self.lookahead,
            power_chance: [self.power_chance; 2],
            ..ArenaConfig::default()
        }
    }
}

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("frame rate must be a positive number, got {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
