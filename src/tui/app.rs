use crate::config::DialogSettings;
use crate::tui::components::Component;
use crate::tui::components::dialogs::{
    AccessibilityImportance, DialogBody, DialogConfig, DialogControl, DialogEvent, DialogHost,
    DialogId, DialogRegistry, DialogVariant, InputOutcome, OpenOptions,
};
use crate::tui::events::Event;
use crate::tui::themes::Theme;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc;
use tracing::debug;

const MUTE: &str = "mute-words";
const CONFIRM: &str = "confirm-clear";
const MENU: &str = "post-menu";

/// Demo shell: a feed in the background and three dialogs on top of it
pub struct App {
    pub should_quit: bool,
    theme: Theme,
    host: DialogHost,
    mute: DialogControl,
    confirm: DialogControl,
    menu: DialogControl,
    posts: Vec<String>,
    feed_state: ListState,
    status_message: Option<String>,
    last_event: Option<String>,
    sender: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        settings: &DialogSettings,
        registry: DialogRegistry,
        sender: mpsc::UnboundedSender<Event>,
        dialog_sender: mpsc::UnboundedSender<DialogEvent>,
    ) -> Result<Self> {
        let base = settings.dialog_config();
        let mut host = DialogHost::new(registry);
        host.set_event_sender(dialog_sender);

        let mute = DialogControl::with_id(MUTE);
        let confirm = DialogControl::with_id(CONFIRM);
        let menu = DialogControl::with_id(MENU);

        let on_close = sender.clone();
        host.mount(&mute, mute_config(&base), mute_body())?
            .on_close(move || {
                let _ = on_close.send(Event::StatusMessage("Mute words closed".to_string()));
            });
        host.mount(&confirm, confirm_config(&base), confirm_body())?;
        host.mount(&menu, menu_config(&base), menu_body())?;

        let mut feed_state = ListState::default();
        feed_state.select(Some(0));

        Ok(Self {
            should_quit: false,
            theme: Theme::default(),
            host,
            mute,
            confirm,
            menu,
            posts: sample_posts(),
            feed_state,
            status_message: None,
            last_event: None,
            sender,
        })
    }

    pub fn host(&self) -> &DialogHost {
        &self.host
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Handle an event. Returns `true` when the app should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
            Event::Resize(width, height) => debug!("Terminal resized to {}x{}", width, height),
            Event::Tick => {}
            Event::Dialog(event) => {
                debug!(?event, "dialog event");
                self.last_event = Some(describe(&event));
            }
            Event::StatusMessage(message) => self.status_message = Some(message),
        }
        Ok(self.should_quit)
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.host.handle_key_event(&key) {
            InputOutcome::Handled => {}
            InputOutcome::Dialog(id) => {
                if key.code == KeyCode::Enter {
                    self.activate(&id);
                }
            }
            InputOutcome::Background => self.handle_background_key(key),
        }
    }

    fn handle_background_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                debug!("Quit requested");
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(1),
            KeyCode::Char('m') => self.mute.open(),
            KeyCode::Char('p') => self.menu.open_with(OpenOptions::at_index(0)),
            KeyCode::Char('P') => self.menu.open_with(OpenOptions::at_index(1)),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        // background content is inert while a dialog is presented
        if Component::handle_mouse_event(&mut self.host, mouse)? {
            return Ok(());
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.select_offset(-1),
            MouseEventKind::ScrollDown => self.select_offset(1),
            _ => {}
        }
        Ok(())
    }

    fn select_offset(&mut self, offset: isize) {
        if self.posts.is_empty() {
            return;
        }
        let current = self.feed_state.selected().unwrap_or(0) as isize;
        let last = self.posts.len() as isize - 1;
        self.feed_state
            .select(Some((current + offset).clamp(0, last) as usize));
    }

    /// Run the focused action of dialog `id`
    fn activate(&mut self, id: &DialogId) {
        let Some(controller) = self.host.controller(id) else {
            return;
        };
        let Some(action) = controller.focused_slot() else {
            return;
        };
        let context = controller.context();
        let sender = self.sender.clone();
        let notify = move |message: &str| {
            let message = message.to_string();
            move || {
                let _ = sender.send(Event::StatusMessage(message));
            }
        };

        match (id.as_str(), action.as_str()) {
            (MUTE, "Save") => context.close_then(notify("Muted words saved")),
            (MUTE, "Clear all") => self.confirm.open(),
            (CONFIRM, "Clear") => context.close_then(notify("Muted words cleared")),
            (MENU, "Report post") => context.close_then(notify("Post reported")),
            (MENU, "Copy link") => context.close_then(notify("Link copied")),
            _ => context.close(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        self.render_feed(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);
        if self.host.is_visible() {
            self.host.render(frame, area, &self.theme);
        }
    }

    fn render_feed(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .posts
            .iter()
            .map(|post| ListItem::new(Line::from(post.as_str())))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border))
                    .title(" Feed  m: mute words  p/P: post menu  q: quit "),
            )
            .style(self.theme.text())
            .highlight_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.feed_state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let registry = self.host.registry();
        let importance = match registry.accessibility() {
            AccessibilityImportance::Auto => "auto",
            AccessibilityImportance::NoHideDescendants => "no-hide-descendants",
        };
        let mut spans = vec![
            Span::styled(
                format!(" dialogs open: {} ", registry.open_count()),
                Style::default().fg(self.theme.bg_base).bg(self.theme.primary),
            ),
            Span::styled(format!(" background: {} ", importance), self.theme.muted()),
        ];
        if let Some(event) = &self.last_event {
            spans.push(Span::styled(format!(" {} ", event), self.theme.muted()));
        }
        if let Some(message) = &self.status_message {
            spans.push(Span::styled(
                format!(" {} ", message),
                Style::default().fg(self.theme.accent).bg(self.theme.bg_base),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn describe(event: &DialogEvent) -> String {
    match event {
        DialogEvent::StateChanged { id, to, .. } => format!("{id}: {to}"),
        DialogEvent::Dismissed { id, trigger } => format!("{id} dismissed ({trigger})"),
        DialogEvent::RegistryChanged { any_open } => format!("any open: {any_open}"),
    }
}

fn mute_config(base: &DialogConfig) -> DialogConfig {
    base.clone()
        .with_title("Mute words & tags")
        .with_label("Manage your muted words and tags")
}

fn mute_body() -> DialogBody {
    DialogBody::new(vec![
        Line::from("Posts containing these words won't appear in your feed."),
        Line::from(""),
        Line::from("  #spoilers  #politics  crypto"),
    ])
    .with_actions(vec![
        "Cancel".to_string(),
        "Clear all".to_string(),
        "Save".to_string(),
    ])
}

fn confirm_config(base: &DialogConfig) -> DialogConfig {
    base.clone()
        .with_title("Clear muted words?")
        .with_max_width(48)
}

fn confirm_body() -> DialogBody {
    DialogBody::new(vec![Line::from("This removes every muted word and tag.")])
        .with_actions(vec!["Cancel".to_string(), "Clear".to_string()])
}

fn menu_config(base: &DialogConfig) -> DialogConfig {
    base.clone()
        .with_title("Post options")
        .with_variant(DialogVariant::Sheet {
            snap_points: vec![40, 80],
        })
}

fn menu_body() -> DialogBody {
    DialogBody::new(vec![
        Line::from("Choose what to do with this post."),
    ])
    .with_actions(vec![
        "Copy link".to_string(),
        "Report post".to_string(),
        "Close".to_string(),
    ])
}

fn sample_posts() -> Vec<String> {
    [
        "alice: shipped the new release today",
        "bob: anyone else watching the launch?",
        "carol: thread on terminal UI design",
        "dave: coffee first, code second",
        "erin: muted words finally work on mobile",
    ]
    .iter()
    .map(|post| post.to_string())
    .collect()
}
