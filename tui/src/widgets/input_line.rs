//! InputLine Widget
//!
//! The single-line composer under the transcript. While a reply is in flight
//! it shows a spinner and the widget state instead of the text cursor.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::theme::{dim_style, user_style, ACCENT_ORANGE, STONE_BORDER};

/// Spinner frames for the busy indicator
pub const SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

const PROMPT: &str = "> ";

/// The input composer
pub struct InputLine<'a> {
    text: &'a str,
    placeholder: &'a str,
    /// `Some(label)` while a reply is in flight
    busy: Option<&'a str>,
    spinner_frame: usize,
}

impl<'a> InputLine<'a> {
    /// Create an input line showing `text`
    pub fn new(text: &'a str, placeholder: &'a str) -> Self {
        Self {
            text,
            placeholder,
            busy: None,
            spinner_frame: 0,
        }
    }

    /// Mark the input as disabled with a status label
    #[must_use]
    pub fn busy(mut self, label: &'a str, spinner_frame: usize) -> Self {
        self.busy = Some(label);
        self.spinner_frame = spinner_frame;
        self
    }
}

impl Widget for InputLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < 5 {
            return;
        }

        let separator = "-".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &separator, Style::default().fg(STONE_BORDER));

        let y = area.y + 1;
        let text_width = area.width.saturating_sub(1) as usize;

        if let Some(label) = self.busy {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            buf.set_stringn(
                area.x,
                y,
                format!("{spinner} {label}"),
                text_width,
                Style::default().fg(ACCENT_ORANGE),
            );
            return;
        }

        buf.set_string(area.x, y, PROMPT, Style::default().fg(ACCENT_ORANGE));
        let x = area.x + PROMPT.width() as u16;
        let available = text_width.saturating_sub(PROMPT.width());

        if self.text.is_empty() {
            buf.set_stringn(x, y, self.placeholder, available, dim_style());
            return;
        }

        // Keep the tail visible when the text is wider than the line
        let full = format!("{}_", self.text);
        let mut visible: &str = &full;
        while visible.width() > available {
            let mut chars = visible.chars();
            chars.next();
            visible = chars.as_str();
        }
        buf.set_string(x, y, visible, user_style());
    }
}
