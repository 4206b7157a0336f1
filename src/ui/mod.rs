//! Terminal user interface built with ratatui

pub mod conversation;
pub mod text;

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::io;
use std::panic;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub const APP_TITLE: &str = "HealthDialog";
pub const SUBTITLE: &str =
    "Clinically grounded health triage chatbot (RAG + hallucination detection)";
pub const EMERGENCY_PILL: &str = " ⚠ Not a substitute for emergency care. ";

/// Initialize terminal
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Put the terminal back before the default panic output is printed.
///
/// Without this a panic inside the event loop leaves the shell in raw mode
/// on the alternate screen with the message invisible.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show);
        previous(info);
    }));
}

/// Title, subtitle and the emergency-care pill
pub fn render_header(area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let title = Line::from(vec![
        Span::styled(
            format!(" {APP_TITLE}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]);
    buf.set_line(area.x, area.y, &title, area.width);

    let pill_width = text::char_width(EMERGENCY_PILL) as u16;
    if area.width > pill_width {
        let pill = Line::from(Span::styled(
            EMERGENCY_PILL,
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        buf.set_line(area.x + area.width - pill_width, area.y, &pill, pill_width);
    }

    if area.height > 1 {
        let subtitle = Line::from(Span::styled(
            format!(" {SUBTITLE}"),
            Style::default().fg(Color::Gray),
        ));
        buf.set_line(area.x, area.y + 1, &subtitle, area.width);
    }
}

/// Backend address and key hints
pub fn render_footer(backend: &str, pending: bool, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let status = if pending {
        Span::styled(" waiting for backend ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ready ", Style::default().fg(Color::Green))
    };

    let line = Line::from(vec![
        status,
        Span::styled(format!("│ {backend} "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            "│ Enter send · Shift+Enter newline · /help · Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    buf.set_line(area.x, area.y, &line, area.width);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    /// Buffer contents as one string per row
    pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let width = buf.area.width as usize;
        buf.content
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::buffer_lines;
    use super::*;

    #[test]
    fn header_shows_title_subtitle_and_pill() {
        let area = Rect::new(0, 0, 120, 3);
        let mut buf = Buffer::empty(area);
        render_header(area, &mut buf);

        let lines = buffer_lines(&buf);
        assert!(lines[0].contains("HealthDialog"));
        assert!(lines[0].contains("Not a substitute for emergency care."));
        assert!(lines[1].contains("Clinically grounded health triage chatbot"));
    }

    #[test]
    fn footer_reflects_pending_state() {
        let area = Rect::new(0, 0, 120, 1);

        let mut buf = Buffer::empty(area);
        render_footer("http://localhost:8000/ask", true, area, &mut buf);
        let line = buffer_lines(&buf).remove(0);
        assert!(line.contains("waiting for backend"));
        assert!(line.contains("http://localhost:8000/ask"));

        let mut buf = Buffer::empty(area);
        render_footer("http://localhost:8000/ask", false, area, &mut buf);
        assert!(buffer_lines(&buf)[0].contains("ready"));
    }
}
