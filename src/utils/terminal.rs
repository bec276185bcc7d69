//! Terminal output helpers
//!
//! # Security: Terminal Injection Prevention
//!
//! Record fields are free text that may have been hand-edited or imported, so anything
//! printed from a JSONL file goes through [`strip_ansi_codes`] first. An embedded escape
//! sequence could otherwise clear the screen, move the cursor or recolor the terminal.

/// Strips ANSI CSI escape codes and other control characters from a string
///
/// Tab, newline and carriage return are kept.
///
/// # Examples
///
/// ```
/// use brag::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // CSI sequence: ESC [ params final-letter
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Lay out rows in left-aligned columns separated by two spaces
///
/// Every cell is sanitized and newlines are flattened to spaces so one record
/// always occupies one row.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let clean = |cell: &str| strip_ansi_codes(cell).replace(['\n', '\r', '\t'], " ");
    let rows: Vec<Vec<String>> =
        rows.iter().map(|row| row.iter().map(|cell| clean(cell)).collect()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let underline: Vec<String> = headers.iter().map(|h| "-".repeat(h.chars().count())).collect();
    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    for row in std::iter::once(&header_row).chain(std::iter::once(&underline)).chain(rows.iter())
    {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                let width = widths.get(i).copied().unwrap_or(0);
                let pad = width.saturating_sub(cell.chars().count()) + 2;
                out.push_str(&" ".repeat(pad));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_color() {
        let text = "\x1b[31mRed text\x1b[0m normal";
        assert_eq!(strip_ansi_codes(text), "Red text normal");
    }

    #[test]
    fn test_strip_ansi_codes_cursor_movement() {
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H Cleared screen"), " Cleared screen");
    }

    #[test]
    fn test_strip_ansi_codes_bell_and_backspace() {
        assert_eq!(strip_ansi_codes("Alert! \x07Test\x08"), "Alert! Test");
    }

    #[test]
    fn test_strip_ansi_codes_preserves_whitespace_and_unicode() {
        let text = "Zürich 👋\nLine 2\tTabbed";
        assert_eq!(strip_ansi_codes(text), text);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("Acme", 20), "Acme");
        assert_eq!(truncate("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("Very Long Company Name Inc", 20), "Very Long Company...");
        assert_eq!(truncate("Very Long Company...", 20).chars().count(), 20);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let table = format_table(
            &["ID", "COMPANY"],
            &[
                vec!["app-1".to_string(), "Acme".to_string()],
                vec!["app-22".to_string(), "Globex".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID      COMPANY");
        assert_eq!(lines[1], "--      -------");
        assert_eq!(lines[2], "app-1   Acme");
        assert_eq!(lines[3], "app-22  Globex");
    }

    #[test]
    fn test_format_table_flattens_newlines() {
        let table = format_table(&["NOTE"], &[vec!["line one\nline two".to_string()]]);
        assert_eq!(table.lines().nth(2), Some("line one line two"));
    }
}
