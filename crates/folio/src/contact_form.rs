//! Contact form overlay and background submission.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_config::{ContactMode, ContactSettings};
use folio_contact::{ContactApi, ContactMessage, Field, MemoryStore, RelayClient, ValidationError};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// How long the sent/failed notice stays on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

/// What the form wants the app to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Close,
    Submit(ContactMessage),
}

/// Result of one submission, as reported by the worker thread.
pub type SubmitOutcome = Result<(), String>;

#[derive(Debug, Default)]
pub struct ContactForm {
    draft: ContactMessage,
    focus: Field,
    error: Option<ValidationError>,
    sending: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ContactMessage {
        &self.draft
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => FormAction::Close,
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.submit(),
            (_, KeyCode::Enter) if self.focus == Field::Message => self.submit(),
            (_, KeyCode::Tab | KeyCode::Down | KeyCode::Enter) => {
                self.focus = self.focus.next();
                FormAction::None
            }
            (_, KeyCode::BackTab | KeyCode::Up) => {
                self.focus = self.focus.prev();
                FormAction::None
            }
            _ if self.sending => FormAction::None,
            (_, KeyCode::Backspace) => {
                self.draft.get_mut(self.focus).pop();
                FormAction::None
            }
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                self.draft.get_mut(self.focus).push(c);
                FormAction::None
            }
            _ => FormAction::None,
        }
    }

    /// Validate and, if the draft passes, hand it off for sending.
    fn submit(&mut self) -> FormAction {
        if self.sending {
            return FormAction::None;
        }
        match self.draft.validate() {
            Ok(()) => {
                self.error = None;
                self.sending = true;
                FormAction::Submit(self.draft.clone())
            }
            Err(err) => {
                self.focus = err.field;
                self.error = Some(err);
                FormAction::None
            }
        }
    }

    /// Record the worker's answer. A sent message clears the form.
    pub fn finish(&mut self, outcome: &SubmitOutcome) {
        self.sending = false;
        if outcome.is_ok() {
            self.draft = ContactMessage::default();
            self.focus = Field::Name;
        }
    }
}

impl Widget for &ContactForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" Get In Touch ")
            .border_style(Style::new().fg(Color::Cyan))
            .bg(Color::Black);

        let mut lines = Vec::with_capacity(Field::ALL.len() * 2 + 3);
        for field in Field::ALL {
            let focused = field == self.focus;
            let label = if focused {
                field.label().bold().cyan()
            } else {
                field.label().dark_gray()
            };
            lines.push(Line::from(label));
            let mut value = vec![Span::raw(self.draft.get(field).to_string())];
            if focused {
                value.push("▏".cyan());
            }
            lines.push(Line::from(value));
        }
        lines.push(Line::default());
        if let Some(err) = &self.error {
            lines.push(Line::from(err.message.as_str().red()));
        } else if self.sending {
            lines.push(Line::from("Sending...".yellow()));
        } else {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            "Tab".bold().cyan(),
            " next  ".dark_gray(),
            "Enter".bold().cyan(),
            " send  ".dark_gray(),
            "Esc".bold().cyan(),
            " close".dark_gray(),
        ]));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Banner shown after a submission finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
    pub success: bool,
    expires: Instant,
}

impl Notice {
    pub fn from_outcome(outcome: &SubmitOutcome, now: Instant) -> Self {
        let expires = now + NOTICE_DURATION;
        match outcome {
            Ok(()) => Self {
                title: "Message sent successfully!",
                description: "Thank you for your message. I'll get back to you soon.".to_string(),
                success: true,
                expires,
            },
            Err(reason) => {
                log::warn!("contact submission failed: {reason}");
                Self {
                    title: "Failed to send message",
                    description: "Please try again later or contact me directly.".to_string(),
                    success: false,
                    expires,
                }
            }
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires
    }
}

#[derive(Debug, Clone)]
enum Destination {
    Relay(RelayClient),
    Local(ContactApi<MemoryStore>),
}

impl Destination {
    fn deliver(&self, message: ContactMessage) -> SubmitOutcome {
        match self {
            Destination::Relay(client) => client.send(&message).map_err(|e| e.to_string()),
            Destination::Local(api) => {
                let response = api.submit(message);
                if response.is_success() {
                    Ok(())
                } else {
                    Err(response
                        .message()
                        .unwrap_or("contact api rejected the message")
                        .to_string())
                }
            }
        }
    }
}

/// Sends messages on short-lived worker threads and collects the results.
#[derive(Debug)]
pub struct Submitter {
    destination: Destination,
    tx: Sender<SubmitOutcome>,
    rx: Receiver<SubmitOutcome>,
}

impl Submitter {
    pub fn new(settings: &ContactSettings) -> Self {
        let destination = match settings.mode {
            ContactMode::Relay => Destination::Relay(RelayClient::new(
                settings.endpoint.clone(),
                Duration::from_secs(settings.timeout_secs),
            )),
            ContactMode::Local => Destination::Local(ContactApi::new(MemoryStore::new())),
        };
        let (tx, rx) = mpsc::channel();
        Self {
            destination,
            tx,
            rx,
        }
    }

    pub fn submit(&self, message: ContactMessage) {
        let destination = self.destination.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = destination.deliver(message);
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(outcome);
        });
    }

    /// A finished submission, if one is waiting.
    pub fn poll(&self) -> Option<SubmitOutcome> {
        self.rx.try_recv().ok()
    }
}
