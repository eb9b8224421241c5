//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use chainblocks::BlockType;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Block colours and UI colours, One Dark unless a theme file says otherwise.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Indexed by [`BlockType::palette_index`]: five colours, then five power types.
    pub blocks: [Color; 10],
    /// Arena background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, chain).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const ONEDARK_BLOCKS: [Color; 10] = [
    hex(0xE06C75), // red
    hex(0x98C379), // green
    hex(0x61AFEF), // blue
    hex(0xD19A66), // orange
    hex(0xC678DD), // purple
    hex(0x56B6C2), // big explosion
    hex(0xE5C07B), // delayed explosion
    hex(0x5C6370), // rock
    hex(0xABD8E6), // in ice
    hex(0xBE5046), // morphing
];

/// Theme keys tried in order for each block colour.
const BLOCK_KEYS: [&[&str]; 10] = [
    &["cpu_end", "temp_end"],
    &["mem_box", "cpu_start"],
    &["cpu_box"],
    &["cpu_mid", "available_end"],
    &["net_box"],
    &["hi_fg", "proc_misc"],
    &["title"],
    &["inactive_fg"],
    &["temp_start"],
    &["used_end"],
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            blocks: ONEDARK_BLOCKS,
            bg: hex(0x31353F),
            div_line: hex(0x3F444F),
            main_fg: hex(0xABB2BF),
            title: hex(0xE5C07B),
            inactive_fg: hex(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if `path` is None or missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override the five standard colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let standard = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => [
                hex(0xFF0000),
                hex(0x00FF00),
                hex(0x0088FF),
                hex(0xFF8800),
                hex(0xFF00FF),
            ],
            // Okabe-Ito style: no red/green pair left to tell apart by hue alone.
            crate::Palette::Colorblind => [
                hex(0xCC3311),
                hex(0x009988),
                hex(0x0077BB),
                hex(0xEE7733),
                hex(0xEE3377),
            ],
        };
        self.blocks[..standard.len()].copy_from_slice(&standard);
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let mut theme = Self::onedark_default();
        for (slot, keys) in theme.blocks.iter_mut().zip(BLOCK_KEYS) {
            if let Some(color) = keys.iter().find_map(|&k| get(k)) {
                *slot = color;
            }
        }
        if let Some(c) = get("meter_bg") {
            theme.bg = c;
        }
        if let Some(c) = get("div_line") {
            theme.div_line = c;
        }
        if let Some(c) = get("main_fg") {
            theme.main_fg = c;
        }
        if let Some(c) = get("title") {
            theme.title = c;
        }
        if let Some(c) = get("inactive_fg") {
            theme.inactive_fg = c;
        }
        theme
    }

    #[inline]
    pub fn block_color(&self, kind: BlockType) -> Color {
        self.blocks[kind.palette_index()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).map_err(|_| invalid());
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
