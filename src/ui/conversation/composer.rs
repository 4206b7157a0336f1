use crate::ui::conversation::commands::{SlashCommand, parse_slash_command};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub const PLACEHOLDER: &str =
    "Describe your symptom (e.g. 'I have chest pain and shortness of breath')...";

/// Result returned when the user interacts with the conversation composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    /// Enter pressed on ordinary text; the session decides if it is accepted
    Submit,
    Command(SlashCommand),
    None,
}

/// Input editor for the question being typed.
///
/// The text itself lives in the conversation session; the composer only
/// tracks the cursor, counted in chars.
#[derive(Debug, Clone, Default)]
pub struct ConversationComposer {
    cursor: usize,
}

impl ConversationComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle key input against the session's input text
    pub fn handle_key(&mut self, key: KeyEvent, input: &mut String) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }
        self.clamp(input);

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) {
                    self.insert_str(input, "\n");
                } else if let Some(command) = parse_slash_command(input) {
                    input.clear();
                    self.cursor = 0;
                    return ComposerResult::Command(command);
                } else {
                    return ComposerResult::Submit;
                }
            }
            KeyCode::Char(_)
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => {
                self.insert_str(input, c.encode_utf8(&mut [0; 4]));
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = byte_offset(input, self.cursor);
                    input.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < input.chars().count() {
                    let at = byte_offset(input, self.cursor);
                    input.remove(at);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < input.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = input.chars().count();
            }
            _ => {}
        }

        ComposerResult::None
    }

    /// Insert pasted text at the cursor
    pub fn paste(&mut self, input: &mut String, text: &str) {
        self.clamp(input);
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.insert_str(input, &text);
    }

    fn insert_str(&mut self, input: &mut String, text: &str) {
        let at = byte_offset(input, self.cursor);
        input.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Keep the cursor inside the text, e.g. after the session cleared it
    fn clamp(&mut self, input: &str) {
        self.cursor = self.cursor.min(input.chars().count());
    }

    /// Render the composer for the given input and pending state
    pub fn render(&self, input: &str, pending: bool, area: Rect, buf: &mut Buffer) {
        let enabled = !pending && !input.trim().is_empty();
        let title = if pending { " Thinking... " } else { " Ask " };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                if enabled {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ))
            .border_style(if enabled {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if input.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
            return;
        }

        let mut content = input.to_string();
        let cursor = self.cursor.min(input.chars().count());
        content.insert(byte_offset(&content, cursor), '▌');

        // Keep the line holding the cursor visible
        let lines: Vec<&str> = content.split('\n').collect();
        let cursor_line = lines.iter().position(|l| l.contains('▌')).unwrap_or(0);
        let height = inner_area.height as usize;
        let start = (cursor_line + 1).saturating_sub(height);

        for (i, line_text) in lines.iter().skip(start).take(height).enumerate() {
            let line = Line::from(vec![Span::raw(*line_text)]);
            buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
        }
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
