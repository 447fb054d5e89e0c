//! Folio TUI - Terminal front-end for the portfolio chat assistant
//!
//! This crate renders a [`folio_chat_core::ChatWidget`] in the terminal.
//!
//! # Architecture
//!
//! - **App**: Event loop, key handling and frame layout
//! - **Ask**: One-shot question mode that streams the reply to stdout
//! - **Widgets**: Borderless scrollable transcript and the input line
//! - **Theme**: The portfolio's orange/stone palette

pub mod app;
pub mod ask;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use ask::run_ask;
