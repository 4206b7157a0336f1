/// Wrap text to fit within the given width.
///
/// Explicit newlines are kept as line breaks; words longer than the width
/// are split. Widths count chars, not display columns.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current_line));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if current_len == 0 {
                current_line.extend(word.iter());
                current_len = word.len();
            } else if current_len + word.len() < width {
                current_line.push(' ');
                current_line.extend(word.iter());
                current_len += word.len() + 1;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line.extend(word.iter());
                current_len = word.len();
            }
        }

        lines.push(current_line);
    }

    lines
}

/// Number of chars in a string, used for right-aligning user bubbles
pub fn char_width(text: &str) -> usize {
    text.chars().count()
}
