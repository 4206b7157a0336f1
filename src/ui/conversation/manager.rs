use crate::backend::{AskResponse, TriageBackend};
use crate::config::{SIDEBAR_PERCENT_RANGE, UiConfig};
use crate::error::BackendError;
use crate::events::TuiEvent;
use crate::session::ConversationSession;
use crate::ui::conversation::{
    ComposerResult, ConversationComposer, ConversationHistory, ErrorBanner, SlashCommand,
    SourcesPanel, get_help_text,
};
use crate::ui::{render_footer, render_header};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::sync::Arc;
use tokio::sync::mpsc;

type Outcome = Result<AskResponse, BackendError>;

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Couples the conversation session to the backend and the widgets.
///
/// Submissions run on a spawned task; their outcome comes back through a
/// channel drained by `process_outcomes` from the event loop, so every
/// state change happens on the loop's thread.
pub struct ConversationManager {
    session: ConversationSession,
    composer: ConversationComposer,
    history: ConversationHistory,
    backend: Arc<dyn TriageBackend>,
    backend_label: String,
    sidebar_percent: u16,
    show_help: bool,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl ConversationManager {
    pub fn new(backend: Arc<dyn TriageBackend>, ui: &UiConfig) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let backend_label = backend.describe();

        Self {
            session: ConversationSession::new(),
            composer: ConversationComposer::new(),
            history: ConversationHistory::new(ui.show_timestamps),
            backend,
            backend_label,
            sidebar_percent: ui
                .sidebar_percent
                .clamp(*SIDEBAR_PERCENT_RANGE.start(), *SIDEBAR_PERCENT_RANGE.end()),
            show_help: false,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ConversationSession {
        &mut self.session
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: TuiEvent) -> ConversationAction {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => {
                self.composer.paste(self.session.input_mut(), &text);
                ConversationAction::None
            }
            TuiEvent::Resize(_, _) => ConversationAction::None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.kind != KeyEventKind::Press {
            return ConversationAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ConversationAction::Exit;
        }

        if key.code == KeyCode::Esc {
            if self.show_help {
                self.show_help = false;
                return ConversationAction::None;
            }
            return ConversationAction::Exit;
        }

        match self.composer.handle_key(key, self.session.input_mut()) {
            ComposerResult::Submit => {
                self.submit();
                ConversationAction::None
            }
            ComposerResult::Command(SlashCommand::Help) => {
                self.show_help = !self.show_help;
                ConversationAction::None
            }
            ComposerResult::Command(SlashCommand::Bye) => ConversationAction::Exit,
            ComposerResult::None => ConversationAction::None,
        }
    }

    /// Submit the current input. Returns whether a request was dispatched;
    /// blank input or an in-flight request makes this a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> bool {
        let Some(query) = self.session.begin_submit() else {
            return false;
        };
        tracing::debug!(chars = query.chars().count(), "submitting triage query");

        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = backend.ask(&query).await;
            // The receiver lives as long as the manager
            let _ = tx.send(outcome);
        });

        true
    }

    /// Apply any finished request without blocking. Returns whether state changed.
    pub fn process_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.session.complete(outcome);
            changed = true;
        }
        changed
    }

    /// Wait for the in-flight request to finish and apply it.
    /// Returns `false` immediately when nothing is pending.
    pub async fn wait_for_outcome(&mut self) -> bool {
        if !self.session.is_pending() {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.session.complete(outcome);
                true
            }
            None => false,
        }
    }

    fn render_chat(&self, area: Rect, buf: &mut Buffer) {
        let banner = self.session.error().map(ErrorBanner::new);
        let banner_height = banner.as_ref().map_or(0, |b| b.height(area.width));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),              // History
                Constraint::Length(4),           // Composer
                Constraint::Length(banner_height), // Error banner
            ])
            .split(area);

        self.history
            .render(self.session.messages(), self.session.is_pending(), chunks[0], buf);
        self.composer.render(
            self.session.input(),
            self.session.is_pending(),
            chunks[1],
            buf,
        );
        if let Some(banner) = banner {
            banner.render(chunks[2], buf);
        }

        if self.show_help {
            render_help(chunks[0], buf);
        }
    }
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let help = get_help_text();
    let height = (help.lines().count() as u16 + 2).min(area.height);
    let width = area.width.saturating_sub(4).min(64);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = help.lines().map(|l| Line::from(Span::raw(l.to_string()))).collect();
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .render(popup, buf);
}

impl Widget for &ConversationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Chat and sidebar
                Constraint::Length(1), // Footer
            ])
            .split(area);

        render_header(rows[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - self.sidebar_percent),
                Constraint::Percentage(self.sidebar_percent),
            ])
            .split(rows[1]);

        self.render_chat(columns[0], buf);
        SourcesPanel::new(self.session.sources()).render(columns[1], buf);

        render_footer(&self.backend_label, self.session.is_pending(), rows[2], buf);
    }
}
