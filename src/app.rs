use crate::backend::HttpTriageBackend;
use crate::config::Config;
use crate::events::TuiEvent;
use crate::ui::{self, Tui};
use crate::ui::conversation::{ConversationAction, ConversationManager};
use anyhow::{Context, Result};
use crossterm::event;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for terminal input before checking for answers
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the chat UI until the user quits.
///
/// Must be called from within a multi-threaded tokio runtime: requests run
/// on spawned tasks while this loop blocks on terminal input.
pub fn run(config: &Config) -> Result<()> {
    let backend = HttpTriageBackend::new(&config.backend)
        .with_context(|| format!("Invalid backend address {}", config.backend.base_url))?;
    let mut manager = ConversationManager::new(Arc::new(backend), &config.ui);

    tracing::info!(backend = %config.backend.base_url, "starting chat session");

    ui::install_panic_hook();
    let mut terminal = ui::init_terminal().context("Failed to initialize terminal")?;
    let result = event_loop(&mut terminal, &mut manager);
    let restored = ui::restore_terminal(&mut terminal).context("Failed to restore terminal");

    tracing::info!(
        messages = manager.session().messages().len(),
        "chat session ended"
    );
    first_error(result, restored)
}

/// The event loop's own error wins over a failure to restore the terminal
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(err), Err(restore_err)) => {
            tracing::error!(error = %restore_err, "terminal restore failed after loop error");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), restored) => restored,
    }
}

fn event_loop(terminal: &mut Tui, manager: &mut ConversationManager) -> Result<()> {
    let mut dirty = true;

    loop {
        if manager.process_outcomes() {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| frame.render_widget(&*manager, frame.size()))?;
            dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let Some(tui_event) = TuiEvent::from_crossterm(event::read()?) else {
            continue;
        };
        dirty = true;

        if manager.handle_event(tui_event) == ConversationAction::Exit {
            return Ok(());
        }
    }
}
