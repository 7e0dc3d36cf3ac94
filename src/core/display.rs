//! Text helpers for the terminal front end
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

/// Default wrap width for transcript rendering
pub const TERMINAL_WIDTH: usize = 80;

/// Format a number of seconds as `M:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Wrap text to `width` columns (UTF-8 safe, paragraph-aware)
///
/// Existing newlines are kept. Lines are broken at whitespace when possible,
/// and words longer than `width` are split by characters.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.chars().count() <= width {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if word_len > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let mut pieces = split_long_word(word, width);
                if let Some(last) = pieces.pop() {
                    lines.extend(pieces);
                    current_len = last.chars().count();
                    current = last;
                }
                continue;
            }

            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split a single word into `width`-character pieces
fn split_long_word(word: &str, width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in word.chars() {
        if count == width {
            result.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Shorten text to at most `max_chars` characters, adding an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
