use crate::ui::text::wrap_text;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Error banner shown under the composer until the next submission
pub struct ErrorBanner<'a> {
    message: &'a str,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Rows needed to show the whole message at the given width, borders included
    pub fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(4) as usize;
        wrap_text(self.message, inner).len() as u16 + 2
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::Red);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(Span::styled(" Error ", style.add_modifier(Modifier::BOLD)));
        let inner_area = block.inner(area);
        block.render(area, buf);

        let width = inner_area.width.saturating_sub(2);
        for (i, wrapped) in wrap_text(self.message, width as usize)
            .into_iter()
            .take(inner_area.height as usize)
            .enumerate()
        {
            let line = Line::from(vec![Span::raw(" "), Span::styled(wrapped, style)]);
            buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
        }
    }
}
