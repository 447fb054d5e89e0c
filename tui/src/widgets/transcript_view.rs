//! TranscriptView Widget
//!
//! A borderless, scrollable rendering of the chat transcript. User turns are
//! right-aligned, bot turns left-aligned, and a typing turn ends with a
//! blinking cursor glyph.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use folio_chat_core::{ChatMessage, Sender};

use crate::theme::{bot_style, dim_style, user_style};

/// Glyph drawn after a typing turn
pub const CURSOR_GLYPH: &str = "\u{258d}";

/// Bubbles take at most this share of the width (percent)
const BUBBLE_WIDTH_PERCENT: usize = 80;

/// State for a scrollable transcript view
#[derive(Debug, Default)]
pub struct TranscriptViewState {
    /// Scroll offset (lines from bottom, 0 = latest)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
}

impl TranscriptViewState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.total_lines.saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the latest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// A rendered row: text already padded for alignment, plus its style
pub type StyledLine = (String, Style);

/// Wrap the transcript into display rows
pub fn build_lines(
    messages: &[ChatMessage],
    width: usize,
    cursor_visible: bool,
) -> Vec<StyledLine> {
    let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100).clamp(1, width.max(1));
    let mut lines = Vec::new();

    for msg in messages {
        let style = match msg.sender {
            Sender::User => user_style(),
            Sender::Bot => bot_style(),
        };

        let text = if msg.is_typing && cursor_visible {
            format!("{}{CURSOR_GLYPH}", msg.text)
        } else {
            msg.text.clone()
        };

        for row in wrap(&text, bubble_width) {
            let row = row.into_owned();
            let padded = match msg.sender {
                Sender::User => {
                    let pad = width.saturating_sub(row.width());
                    format!("{}{row}", " ".repeat(pad))
                }
                Sender::Bot => row,
            };
            lines.push((padded, style));
        }
        lines.push((String::new(), Style::default()));
    }

    lines
}

/// A borderless, scrollable transcript
pub struct TranscriptView<'a> {
    messages: &'a [ChatMessage],
    cursor_visible: bool,
}

impl<'a> TranscriptView<'a> {
    /// Create a view over the transcript's messages
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            cursor_visible: true,
        }
    }

    /// Whether the blinking cursor is in its visible phase
    #[must_use]
    pub fn cursor_visible(mut self, visible: bool) -> Self {
        self.cursor_visible = visible;
        self
    }
}

impl StatefulWidget for TranscriptView<'_> {
    type State = TranscriptViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = area.width.saturating_sub(2) as usize;
        let height = area.height as usize;
        if width < 10 || height == 0 {
            return;
        }

        let lines = build_lines(self.messages, width, self.cursor_visible);
        state.total_lines = lines.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let has_content_above = visible_start > 0;

        for (i, (line, style)) in lines[visible_start..visible_end].iter().enumerate() {
            // Fade the top row when older messages are hidden
            let style = if has_content_above && i == 0 {
                dim_style()
            } else {
                *style
            };
            let y = area.y + u16::try_from(i).unwrap_or(u16::MAX);
            buf.set_stringn(area.x + 1, y, line, width, style);
        }
    }
}
