//! Conversation history display component

use crate::events::{HallucinationRisk, Message, MessageMeta, Role};
use crate::ui::text::{char_width, wrap_text};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub const THINKING_TEXT: &str = "HealthDialog is thinking";

/// Renders the message log as speech bubbles, oldest first, anchored to
/// the bottom once it overflows.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    show_timestamps: bool,
}

impl ConversationHistory {
    pub fn new(show_timestamps: bool) -> Self {
        Self { show_timestamps }
    }

    pub fn render(&self, messages: &[Message], pending: bool, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Conversation ");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut all_lines: Vec<Line> = Vec::new();
        for message in messages {
            all_lines.extend(self.render_message(message, inner_area.width));
            // spacing between messages
            all_lines.push(Line::from(""));
        }

        if pending {
            all_lines.push(Line::from(vec![
                Span::styled(format!("{THINKING_TEXT} "), Style::default().fg(Color::Green)),
                Span::styled("● ● ●", Style::default().fg(Color::Yellow)),
            ]));
        }

        // Show the newest lines when the log is taller than the panel
        let height = inner_area.height as usize;
        let start = all_lines.len().saturating_sub(height);

        for (i, line) in all_lines[start..].iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }

    /// Render a single message into lines
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let width = width as usize;
        let bubble_width = (width * 3 / 4).max(10).min(width.saturating_sub(2).max(1));
        let is_user = message.role == Role::User;
        let mut lines = Vec::new();

        let header = if self.show_timestamps {
            format!(
                "{} · {}",
                message.role.display_name(),
                message.timestamp.format("%H:%M:%S")
            )
        } else {
            message.role.display_name().to_string()
        };
        let header_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);
        lines.push(if is_user {
            right_aligned(vec![Span::styled(header.clone(), header_style)], char_width(&header), width)
        } else {
            Line::from(vec![Span::styled(header, header_style)])
        });

        let content_style = self.get_content_style(message.role);
        let bar_style = content_style.add_modifier(Modifier::BOLD);
        for content_line in wrap_text(&message.content, bubble_width) {
            let len = char_width(&content_line);
            lines.push(if is_user {
                right_aligned(
                    vec![
                        Span::styled(content_line, content_style),
                        Span::styled(" ▐", bar_style),
                    ],
                    len + 2,
                    width,
                )
            } else {
                Line::from(vec![
                    Span::styled("▌ ", bar_style),
                    Span::styled(content_line, content_style),
                ])
            });
        }

        if !is_user {
            if let Some(badges) = message.meta.as_ref().and_then(render_badges) {
                lines.push(badges);
            }
        }

        lines
    }

    /// Get content style based on role
    fn get_content_style(&self, role: Role) -> Style {
        match role {
            Role::User => Style::default().fg(Color::Cyan),
            Role::Assistant => Style::default().fg(Color::White),
        }
    }
}

/// Confidence and risk badges, each shown only when its field is present
fn render_badges(meta: &MessageMeta) -> Option<Line<'static>> {
    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::White))];

    if let Some(percent) = meta.confidence_percent() {
        spans.push(Span::styled(
            format!("[Confidence: {percent}]"),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(risk) = &meta.hallucination_risk {
        if spans.len() > 1 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("[Hallucination risk: {}]", risk.label()),
            Style::default().fg(risk_color(risk)),
        ));
    }

    (spans.len() > 1).then(|| Line::from(spans))
}

fn risk_color(risk: &HallucinationRisk) -> Color {
    match risk {
        HallucinationRisk::Low => Color::Green,
        HallucinationRisk::Medium => Color::Yellow,
        HallucinationRisk::High => Color::Red,
        HallucinationRisk::Other(_) => Color::Gray,
    }
}

fn right_aligned(mut spans: Vec<Span<'static>>, len: usize, width: usize) -> Line<'static> {
    let pad = width.saturating_sub(len);
    spans.insert(0, Span::raw(" ".repeat(pad)));
    Line::from(spans)
}
