use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use folio_backdrop::{Backdrop, BackdropWidget, Host, HostEvent, PixelBuffer};
use folio_config::Config;
use folio_core::Rgba;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use crate::contact_form::{ContactForm, FormAction, Notice, Submitter};
use crate::terminal_host::TerminalHost;

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 14;

/// The main application: a hero card over the animated backdrop, plus a
/// contact form overlay.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    base: Rgba,
    host: TerminalHost,
    backdrop: Backdrop<PixelBuffer>,
    started: Instant,
    last_frame: Option<Instant>,
    /// Paused with `p`; the backdrop is treated as hidden.
    paused: bool,
    focused: bool,
    form: ContactForm,
    form_open: bool,
    submitter: Submitter,
    notice: Option<Notice>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let host = TerminalHost::new(
            0,
            0,
            &config.terminal,
            config.backdrop.max_pixel_ratio,
        );
        Self {
            running: false,
            base: config.terminal.base_color(),
            backdrop: Backdrop::new(config.backdrop.clone()),
            submitter: Submitter::new(&config.contact),
            host,
            config,
            started: Instant::now(),
            last_frame: None,
            paused: false,
            focused: true,
            form: ContactForm::new(),
            form_open: false,
            notice: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.start(size.width, size.height);
        while self.running {
            let now = Instant::now();
            self.drive_backdrop(now);
            self.collect_submissions(now);
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.backdrop.unmount(&mut self.host);
        Ok(())
    }

    fn start(&mut self, cols: u16, rows: u16) {
        self.host.set_terminal_size(cols, rows);
        self.backdrop.mount(&mut self.host);
        self.running = true;
    }

    /// Deliver due timers and, at most once per frame interval, the
    /// pending frame.
    fn drive_backdrop(&mut self, now: Instant) {
        for id in self.host.take_due_timers(now) {
            self.backdrop.on_timer(&mut self.host, id);
        }
        if !self.host.has_pending_frame() {
            return;
        }
        let interval = self.backdrop.settings().frame_interval();
        if self
            .last_frame
            .is_some_and(|last| now.duration_since(last) < interval)
        {
            return;
        }
        let time_ms = now.duration_since(self.started).as_secs_f64() * 1000.0;
        for handle in self.host.take_frames() {
            self.backdrop.on_frame(&mut self.host, handle, time_ms);
        }
        self.last_frame = Some(now);
    }

    /// How long to wait for input before the next frame or timer is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        let interval = self.backdrop.settings().frame_interval();
        let mut timeout = match self.last_frame {
            Some(last) if self.host.has_pending_frame() => {
                interval.saturating_sub(now.duration_since(last))
            }
            Some(_) => interval,
            None => Duration::ZERO,
        };
        if let Some(deadline) = self.host.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }

    fn collect_submissions(&mut self, now: Instant) {
        while let Some(outcome) = self.submitter.poll() {
            self.form.finish(&outcome);
            if outcome.is_ok() {
                self.form_open = false;
            }
            self.notice = Some(Notice::from_outcome(&outcome, now));
        }
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(surface) = self.backdrop.surface() {
            frame.render_widget(BackdropWidget::new(surface, self.base), area);
        }

        let profile = &self.config.profile;
        let mut card = vec![
            Line::from(profile.name.as_str().bold().cyan()),
            Line::default(),
            Line::from(profile.headline.as_str().white()),
            Line::from(profile.tagline.as_str().gray()),
        ];
        if !profile.links.is_empty() {
            card.push(Line::default());
            card.extend(
                profile
                    .links
                    .iter()
                    .map(|link| Line::from(link.as_str().light_blue().underlined())),
            );
        }

        let chunks = Layout::vertical([
            Constraint::Length(3),                 // Notice
            Constraint::Fill(1),                   // Top padding
            Constraint::Length(card.len() as u16), // Hero card
            Constraint::Fill(1),                   // Bottom padding
            Constraint::Length(1),                 // Help text
        ])
        .split(area);

        if let Some(notice) = &self.notice {
            let color = if notice.success { Color::Green } else { Color::Red };
            let text = vec![
                Line::from(notice.title.bold().fg(color)),
                Line::from(notice.description.as_str().white()),
            ];
            frame.render_widget(Paragraph::new(text).centered(), chunks[0]);
        }

        frame.render_widget(Paragraph::new(card).centered(), chunks[2]);

        let pause_label = if self.paused { " resume  " } else { " pause  " };
        let help = Line::from(vec![
            "q".bold().cyan(),
            " quit  ".dark_gray(),
            "c".bold().cyan(),
            " contact  ".dark_gray(),
            "p".bold().cyan(),
            pause_label.dark_gray(),
            "r".bold().cyan(),
            " reseed".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[4]);

        if self.form_open {
            let popup = centered(area, FORM_WIDTH, FORM_HEIGHT);
            frame.render_widget(&self.form, popup);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_terminal_resize(cols, rows),
                Event::FocusLost => {
                    self.focused = false;
                    self.sync_visibility();
                }
                Event::FocusGained => {
                    self.focused = true;
                    self.sync_visibility();
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.quit();
            return;
        }

        if self.form_open {
            match self.form.handle_key(key) {
                FormAction::Close => self.form_open = false,
                FormAction::Submit(message) => {
                    log::info!("submitting contact message from {}", message.email);
                    self.submitter.submit(message);
                }
                FormAction::None => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Char('c') => self.form_open = true,
            KeyCode::Char('p') => self.toggle_pause(),
            KeyCode::Char('r') => self.reseed(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let at = self.host.cell_to_logical(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.dispatch(HostEvent::PointerMove(at));
            }
            MouseEventKind::Down(MouseButton::Left) => self.dispatch(HostEvent::Click(at)),
            _ => {}
        }
    }

    fn on_terminal_resize(&mut self, cols: u16, rows: u16) {
        self.host.set_terminal_size(cols, rows);
        if self.backdrop.is_running() {
            self.dispatch(HostEvent::Resize(self.host.viewport()));
        } else {
            // A zero-sized terminal leaves nothing to mount on; retry now.
            self.backdrop.mount(&mut self.host);
            self.sync_visibility();
        }
    }

    /// Forward an event to the backdrop if it is listening for it.
    fn dispatch(&mut self, event: HostEvent) {
        if self.host.is_listening(event.kind()) {
            self.backdrop.handle_event(&mut self.host, event);
        }
    }

    fn sync_visibility(&mut self) {
        let hidden = self.paused || !self.focused;
        self.dispatch(HostEvent::Visibility { hidden });
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.sync_visibility();
    }

    /// Start over with a fresh particle population.
    fn reseed(&mut self) {
        self.backdrop.unmount(&mut self.host);
        self.backdrop = Backdrop::new(self.backdrop.settings().clone());
        self.backdrop.mount(&mut self.host);
        self.sync_visibility();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}
