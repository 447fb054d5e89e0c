//! Theme and Colors
//!
//! The portfolio's warm palette: orange accents on stone neutrals.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Palette
// ============================================================================

/// Accent orange (header bar, user bubbles)
pub const ACCENT_ORANGE: Color = Color::Rgb(234, 88, 12);

/// Lighter orange for highlights
pub const ACCENT_ORANGE_LIGHT: Color = Color::Rgb(251, 146, 60);

/// Bot bubble text
pub const STONE_TEXT: Color = Color::Rgb(231, 229, 228);

/// Secondary text (timestamps, footer)
pub const STONE_DIM: Color = Color::Rgb(120, 113, 108);

/// Borders and separators
pub const STONE_BORDER: Color = Color::Rgb(68, 64, 60);

/// Online badge
pub const ONLINE_GREEN: Color = Color::Rgb(74, 222, 128);

/// Demo-mode badge
pub const DEMO_AMBER: Color = Color::Rgb(251, 191, 36);

// ============================================================================
// Styles
// ============================================================================

/// Header title
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(ACCENT_ORANGE)
        .add_modifier(Modifier::BOLD)
}

/// User turn text
pub fn user_style() -> Style {
    Style::default().fg(ACCENT_ORANGE_LIGHT)
}

/// Bot turn text
pub fn bot_style() -> Style {
    Style::default().fg(STONE_TEXT)
}

/// Dimmed text
pub fn dim_style() -> Style {
    Style::default().fg(STONE_DIM)
}
