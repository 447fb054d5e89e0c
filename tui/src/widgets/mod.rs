//! Custom widgets

mod input_line;
mod transcript_view;

pub use input_line::{InputLine, SPINNER_FRAMES};
pub use transcript_view::{
    build_lines, StyledLine, TranscriptView, TranscriptViewState, CURSOR_GLYPH,
};
