use crate::events::Source;
use crate::ui::text::wrap_text;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub const SIDEBAR_TITLE: &str = " Evidence & Sources ";
pub const CAPTION: &str =
    "These are the clinical documents retrieved by the RAG pipeline for the latest answer.";
pub const NO_SOURCES: &str = "Ask a question to see guideline references and FAQs here.";
pub const DISCLAIMER: &str = "This system is for information and triage support only. \
It does not provide a diagnosis, and it does not replace a doctor or emergency services.";

/// Sidebar listing the citations of the latest answer.
///
/// An empty set shows the same placeholder whether nothing was fetched yet
/// or the last answer cited nothing.
pub struct SourcesPanel<'a> {
    sources: &'a [Source],
}

impl<'a> SourcesPanel<'a> {
    pub fn new(sources: &'a [Source]) -> Self {
        Self { sources }
    }

    fn source_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for wrapped in wrap_text(CAPTION, width) {
            lines.push(Line::from(Span::styled(wrapped, Style::default().fg(Color::Gray))));
        }
        lines.push(Line::from(""));

        if self.sources.is_empty() {
            for wrapped in wrap_text(NO_SOURCES, width) {
                lines.push(Line::from(Span::styled(
                    wrapped,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            return lines;
        }

        for (index, source) in self.sources.iter().enumerate() {
            let title = format!("{}. {}", index + 1, source.display_title());
            for wrapped in wrap_text(&title, width) {
                lines.push(Line::from(Span::styled(
                    wrapped,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            if let Some(snippet) = source.snippet.as_deref().filter(|s| !s.is_empty()) {
                for wrapped in wrap_text(snippet, width.saturating_sub(3)) {
                    lines.push(Line::from(format!("   {wrapped}")));
                }
            }
            if let Some(url) = source.url.as_deref().filter(|u| !u.is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("   View source: {url}"),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                )));
            }
            lines.push(Line::from(""));
        }

        lines
    }
}

impl Widget for SourcesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                SIDEBAR_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner_area = block.inner(area);
        block.render(area, buf);

        // One spare row covers the "Important:" prefix
        let disclaimer_lines = wrap_text(DISCLAIMER, inner_area.width as usize).len() as u16 + 1;
        let disclaimer_height = disclaimer_lines.min(inner_area.height / 2);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(disclaimer_height)])
            .split(inner_area);

        let lines = self.source_lines(chunks[0].width as usize);
        for (i, line) in lines.iter().take(chunks[0].height as usize).enumerate() {
            buf.set_line(chunks[0].x, chunks[0].y + i as u16, line, chunks[0].width);
        }

        let disclaimer = Paragraph::new(Line::from(vec![
            Span::styled("Important: ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(DISCLAIMER, Style::default().fg(Color::Gray)),
        ]))
        .wrap(Wrap { trim: true });
        disclaimer.render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::buffer_lines;

    fn render(sources: &[Source]) -> String {
        let area = Rect::new(0, 0, 40, 30);
        let mut buf = Buffer::empty(area);
        SourcesPanel::new(sources).render(area, &mut buf);
        buffer_lines(&buf).join("\n")
    }

    #[test]
    fn empty_set_shows_placeholder() {
        let text = render(&[]);
        assert!(text.contains("Ask a question to see"));
        assert!(text.contains("Important:"));
    }

    #[test]
    fn lists_each_source_with_optional_fields() {
        let sources = vec![
            Source {
                title: Some("Guideline A".to_string()),
                snippet: Some("Chest pain needs review".to_string()),
                url: Some("https://g.example/a".to_string()),
            },
            Source::default(),
        ];

        let text = render(&sources);
        assert!(text.contains("1. Guideline A"));
        assert!(text.contains("Chest pain needs review"));
        assert!(text.contains("View source: https://g.example/a"));
        assert!(text.contains("2. Source"));
        assert!(!text.contains("Ask a question to see"));
    }
}
