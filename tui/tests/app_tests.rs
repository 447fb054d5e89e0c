//! App behavior tests
//!
//! Drive the App with synthetic key events and render into ratatui's
//! `TestBackend` to check what the user would see.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use folio_chat_core::{
    BackendError, CannedBackend, ChatRequest, ChatState, ChatWidget, LlmBackend, Sender,
    StreamingToken, WidgetSettings,
};
use folio_tui::app::INPUT_PLACEHOLDER;
use folio_tui::App;

/// Remote-looking backend whose stream stays open until the sender is dropped
struct HeldBackend {
    tokens: Vec<&'static str>,
}

#[async_trait::async_trait]
impl LlmBackend for HeldBackend {
    fn name(&self) -> &str {
        "Held"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn open_stream(
        &self,
        _request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError> {
        let (tx, rx) = mpsc::channel(10);
        for token in &self.tokens {
            let _ = tx.send(StreamingToken::Token((*token).to_string())).await;
        }
        let _ = tx.send(StreamingToken::Complete).await;
        Ok(rx)
    }
}

/// Backend whose connect never finishes
struct HungBackend;

#[async_trait::async_trait]
impl LlmBackend for HungBackend {
    fn name(&self) -> &str {
        "Hung"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn open_stream(
        &self,
        _request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError> {
        std::future::pending().await
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text<B: LlmBackend + 'static>(app: &mut App<B>, text: &str) {
    for c in text.chars() {
        app.handle_event(key(KeyCode::Char(c)));
    }
}

/// Start the accepted submission and wait until its stream is attached
async fn open_pending<B: LlmBackend + 'static>(app: &mut App<B>) {
    app.start_pending();
    tokio::time::timeout(Duration::from_secs(2), async {
        while !app.poll_opening() && app.is_opening() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}

fn screen_text<B: LlmBackend + 'static>(app: &mut App<B>, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();

    let buffer = terminal.backend().buffer().clone();
    let mut text = String::new();
    for y in 0..height {
        for x in 0..width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn demo_app() -> App<CannedBackend> {
    let widget = ChatWidget::new(CannedBackend::new("demo reply"), WidgetSettings::default());
    App::new(widget, (60, 20))
}

#[tokio::test]
async fn test_typing_and_submit() {
    let widget = ChatWidget::new(
        HeldBackend {
            tokens: vec!["Hel", "lo!"],
        },
        WidgetSettings::default(),
    );
    let mut app = App::new(widget, (60, 20));

    type_text(&mut app, "Hi there");
    assert_eq!(app.input(), "Hi there");

    app.handle_event(key(KeyCode::Enter));
    assert_eq!(app.input(), "");
    assert!(app.is_busy());

    open_pending(&mut app).await;
    assert_eq!(app.widget().state(), ChatState::Streaming);

    // Typing is ignored while the reply streams
    type_text(&mut app, "x");
    assert_eq!(app.input(), "");

    app.widget_mut().poll_streaming();
    assert!(!app.is_busy());

    let messages = app.widget().transcript().messages();
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "Hi there");
    assert_eq!(messages[2].text, "Hello!");
}

#[tokio::test]
async fn test_blank_enter_ignored() {
    let mut app = demo_app();

    type_text(&mut app, "   ");
    app.handle_event(key(KeyCode::Enter));
    open_pending(&mut app).await;

    assert!(!app.is_busy());
    assert_eq!(app.widget().transcript().len(), 1);
}

#[test]
fn test_escape_quits() {
    let mut app = demo_app();
    assert!(app.is_running());
    app.handle_event(key(KeyCode::Esc));
    assert!(!app.is_running());
}

#[test]
fn test_ctrl_c_quits() {
    let mut app = demo_app();
    app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(!app.is_running());
}

#[test]
fn test_backspace_edits() {
    let mut app = demo_app();
    type_text(&mut app, "abc");
    app.handle_event(key(KeyCode::Backspace));
    assert_eq!(app.input(), "ab");
}

#[test]
fn test_initial_screen() {
    let mut app = demo_app();
    let screen = screen_text(&mut app, 60, 20);

    assert!(screen.contains("Ask AI Spencer"));
    assert!(screen.contains("Demo mode"));
    assert!(screen.contains("Hi! I'm Spencer's AI"));
    assert!(screen.contains(INPUT_PLACEHOLDER));
    assert!(screen.contains("Powered by gemini-2.5-flash"));
}

#[tokio::test]
async fn test_demo_reply_rendered() {
    let mut app = demo_app();
    type_text(&mut app, "Stack?");
    app.handle_event(key(KeyCode::Enter));
    open_pending(&mut app).await;
    app.widget_mut().finish_response().await;

    let screen = screen_text(&mut app, 60, 20);
    assert!(screen.contains("Stack?"));
    assert!(screen.contains("demo reply"));
}

#[tokio::test]
async fn test_hung_open_keeps_ui_responsive() {
    let widget = ChatWidget::new(HungBackend, WidgetSettings::default());
    let mut app = App::new(widget, (60, 20));

    type_text(&mut app, "hi");
    app.handle_event(key(KeyCode::Enter));
    app.start_pending();

    assert!(app.is_opening());
    assert_eq!(app.widget().state(), ChatState::Submitting);

    // Frames keep polling without waiting on the connect
    for _ in 0..3 {
        tokio::task::yield_now().await;
        assert!(!app.poll_opening());
        app.widget_mut().poll_streaming();
        app.update();
    }
    assert!(screen_text(&mut app, 60, 20).contains("Connecting..."));

    // Input stays locked, but quitting still works
    type_text(&mut app, "more");
    assert_eq!(app.input(), "");
    app.handle_event(key(KeyCode::Esc));
    assert!(!app.is_running());
    assert_eq!(app.widget().transcript().len(), 2);
}

#[tokio::test]
async fn test_ctrl_c_while_opening() {
    let widget = ChatWidget::new(HungBackend, WidgetSettings::default());
    let mut app = App::new(widget, (60, 20));

    type_text(&mut app, "hi");
    app.handle_event(key(KeyCode::Enter));
    app.start_pending();

    app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(!app.is_running());
}

#[test]
fn test_modified_chars_not_typed() {
    let mut app = demo_app();
    type_text(&mut app, "ab");

    app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('a'),
        KeyModifiers::CONTROL,
    )));
    app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)));
    app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('C'),
        KeyModifiers::SHIFT,
    )));

    assert_eq!(app.input(), "abC");
}
