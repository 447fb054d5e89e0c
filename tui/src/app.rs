//! Main Application
//!
//! The App struct manages the TUI lifecycle around one [`ChatWidget`]:
//! - Event loop (keyboard, resize)
//! - Submitting the input line and polling the reply stream every frame
//! - Rendering header, transcript, input line and footer

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use unicode_width::UnicodeWidthStr;

use folio_chat_core::{
    BackendError, ChatError, ChatState, ChatWidget, LlmBackend, PendingReply, StreamingToken,
};

use crate::theme::{dim_style, header_style, DEMO_AMBER, ONLINE_GREEN, STONE_BORDER};
use crate::widgets::{InputLine, TranscriptView, TranscriptViewState};

/// Input area height (separator + text line)
const INPUT_HEIGHT: u16 = 2;

/// Placeholder shown in an empty input line
pub const INPUT_PLACEHOLDER: &str = "Ask about my projects...";

/// Cursor blink half-period
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// A submission whose stream is being opened on a background task
struct OpeningReply {
    pending: PendingReply,
    task: JoinHandle<Result<mpsc::Receiver<StreamingToken>, BackendError>>,
}

/// Main application state
pub struct App<B: LlmBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// The chat widget (transcript + submission flow)
    widget: ChatWidget<B>,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Text accepted by Enter, submitted by the frame loop
    pending_submission: Option<String>,
    /// Stream open in flight
    opening: Option<OpeningReply>,
    /// Transcript scroll position
    transcript_state: TranscriptViewState,

    // === Animation State ===
    /// Last frame time (for animations)
    last_frame: Instant,
    /// Time since the cursor last toggled
    blink_elapsed: Duration,
    cursor_visible: bool,
    spinner_frame: usize,
    /// Terminal size
    size: (u16, u16),
}

impl<B: LlmBackend + 'static> App<B> {
    /// Create a new App instance
    pub fn new(widget: ChatWidget<B>, size: (u16, u16)) -> Self {
        Self {
            running: true,
            widget,
            input_buffer: String::new(),
            pending_submission: None,
            opening: None,
            transcript_state: TranscriptViewState::default(),
            last_frame: Instant::now(),
            blink_elapsed: Duration::ZERO,
            cursor_visible: true,
            spinner_frame: 0,
            size,
        }
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // Target ~30 FPS so streamed text appears smoothly
        let frame_duration = Duration::from_millis(33);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(frame_duration) => {}
            }

            // Opening runs off-loop so keys and frames keep flowing
            self.start_pending();
            self.poll_opening();

            // Apply any streamed fragments
            self.widget.poll_streaming();

            self.update();
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Dispatch a terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(w, h) => self.size = (w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Submit message
            KeyCode::Enter => {
                if self.accepts_input() && !self.input_buffer.trim().is_empty() {
                    self.pending_submission = Some(std::mem::take(&mut self.input_buffer));
                }
            }

            // Typing
            KeyCode::Char(c)
                if self.accepts_input()
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace if self.accepts_input() => {
                self.input_buffer.pop();
            }

            // Conversation scrolling
            KeyCode::PageUp => self.transcript_state.scroll_up(self.page_size()),
            KeyCode::PageDown => self.transcript_state.scroll_down(self.page_size()),

            _ => {}
        }
    }

    /// Submit the text accepted by Enter, if any
    ///
    /// The stream is opened on a spawned task; [`App::poll_opening`] attaches
    /// it once the backend answers.
    pub fn start_pending(&mut self) {
        let Some(message) = self.pending_submission.take() else {
            return;
        };

        match self.widget.begin_submission(&message) {
            Ok(pending) => {
                let backend = self.widget.backend();
                let request = pending.request().clone();
                let task = tokio::spawn(async move { backend.open_stream(&request).await });
                self.opening = Some(OpeningReply { pending, task });
            }
            Err(e) => log_refused(&e),
        }
        self.transcript_state.scroll_to_bottom();
    }

    /// Attach the stream once its open task has finished
    ///
    /// Returns true if a submission was settled.
    pub fn poll_opening(&mut self) -> bool {
        let joined = match self.opening.as_mut() {
            Some(opening) => (&mut opening.task).now_or_never(),
            None => return false,
        };
        let Some(joined) = joined else {
            return false;
        };
        let Some(opening) = self.opening.take() else {
            return false;
        };

        let opened = joined.unwrap_or_else(|e| Err(BackendError::Task(e.to_string())));
        if let Err(e) = self.widget.attach_stream(opening.pending, opened) {
            log_refused(&e);
        }
        self.transcript_state.scroll_to_bottom();
        true
    }

    /// Whether a stream open is in flight
    pub fn is_opening(&self) -> bool {
        self.opening.is_some()
    }

    /// Update animations
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.blink_elapsed += delta;
        if self.blink_elapsed >= BLINK_INTERVAL {
            self.blink_elapsed = Duration::ZERO;
            self.cursor_visible = !self.cursor_visible;
        }

        if self.is_busy() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        } else {
            self.spinner_frame = 0;
        }
    }

    fn render<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> io::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let [header, body, input, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_header(frame, header);

        frame.render_stateful_widget(
            TranscriptView::new(self.widget.transcript().messages())
                .cursor_visible(self.cursor_visible),
            body,
            &mut self.transcript_state,
        );

        let status = self.status_label();
        let mut input_line = InputLine::new(&self.input_buffer, INPUT_PLACEHOLDER);
        if self.is_busy() {
            input_line = input_line.busy(status, self.spinner_frame);
        }
        frame.render_widget(input_line, input);

        self.draw_footer(frame, footer);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let buf = frame.buffer_mut();
        buf.set_style(area, header_style());

        let title = format!(" {}", self.widget.settings().persona.assistant_name);
        buf.set_stringn(area.x, area.y, &title, area.width as usize, header_style());

        let (badge, color) = if self.widget.is_demo_mode() {
            ("\u{25cf} Demo mode ".to_string(), DEMO_AMBER)
        } else {
            (format!("\u{25cf} {} ", self.status_label()), ONLINE_GREEN)
        };
        let badge_width = u16::try_from(badge.width()).unwrap_or(u16::MAX);
        let title_width = u16::try_from(title.width()).unwrap_or(u16::MAX);
        if title_width.saturating_add(badge_width) < area.width {
            buf.set_string(
                area.x + area.width - badge_width,
                area.y,
                &badge,
                header_style().fg(color),
            );
        }
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let scroll_info = if self.transcript_state.scroll_offset > 0 {
            format!(" [^{} lines - PgDn]", self.transcript_state.scroll_offset)
        } else {
            String::new()
        };

        let footer = format!(
            " Powered by {} | Esc to quit | PgUp/PgDn scroll{scroll_info}",
            self.widget.settings().model
        );

        let buf = frame.buffer_mut();
        buf.set_style(area, Style::default().fg(STONE_BORDER));
        buf.set_stringn(area.x, area.y, &footer, area.width as usize, dim_style());
    }

    fn status_label(&self) -> &'static str {
        if self.pending_submission.is_some() {
            ChatState::Submitting.description()
        } else {
            self.widget.state().description()
        }
    }

    fn page_size(&self) -> usize {
        usize::from(self.size.1.saturating_sub(INPUT_HEIGHT + 2) / 2).max(1)
    }

    /// Whether a reply is pending or in flight
    pub fn is_busy(&self) -> bool {
        self.pending_submission.is_some() || !self.widget.input_enabled()
    }

    fn accepts_input(&self) -> bool {
        !self.is_busy()
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current input buffer
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// The chat widget
    pub fn widget(&self) -> &ChatWidget<B> {
        &self.widget
    }

    /// Mutable access to the chat widget
    pub fn widget_mut(&mut self) -> &mut ChatWidget<B> {
        &mut self.widget
    }
}

impl<B: LlmBackend> Drop for App<B> {
    fn drop(&mut self) {
        if let Some(opening) = self.opening.take() {
            opening.task.abort();
        }
    }
}

fn log_refused(error: &ChatError) {
    if error.is_rejection() {
        tracing::debug!(error = %error, "Submission ignored");
    } else {
        tracing::warn!(error = %error, "Submission failed");
    }
}
