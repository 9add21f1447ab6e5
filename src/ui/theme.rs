use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Resolved color palette. Host-supplied tokens override the built-in
/// defaults once at startup; unknown or malformed tokens are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub long: Color,
    pub short: Color,
    pub hint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            long: Color::Green,
            short: Color::Red,
            hint: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = Theme::default();
        Self {
            accent: parse_hex(config.accent.as_deref()).unwrap_or(defaults.accent),
            long: parse_hex(config.long.as_deref()).unwrap_or(defaults.long),
            short: parse_hex(config.short.as_deref()).unwrap_or(defaults.short),
            hint: parse_hex(config.hint.as_deref()).unwrap_or(defaults.hint),
        }
    }
}

fn parse_hex(token: Option<&str>) -> Option<Color> {
    let token = token?.trim().strip_prefix('#')?;
    if token.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&token[0..2], 16).ok()?;
    let g = u8::from_str_radix(&token[2..4], 16).ok()?;
    let b = u8::from_str_radix(&token[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
