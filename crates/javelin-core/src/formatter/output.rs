//! Output sinks for the printer
//!
//! The printer is generic over [`Output`]: [`Emitter`] builds the formatted
//! text, [`Measurer`] only counts how wide a subtree would be on one line.
//! A measurer stops counting at the first line break or once the width
//! exceeds its limit, which is all a fit decision needs.

use unicode_width::UnicodeWidthChar;

pub(crate) trait Output {
    /// Append text; embedded line breaks are kept verbatim
    fn push_text(&mut self, text: &str);

    /// End the current line, dropping its trailing whitespace
    fn push_newline(&mut self);

    /// Drop the padding written at the start of the current line
    fn clear_padding(&mut self);

    /// Display width of the current line so far
    fn column(&self) -> usize;

    /// Whether further output is pointless (measurement decided)
    fn should_stop(&self) -> bool;

    /// Whether this sink measures a one-line rendering
    fn is_measuring(&self) -> bool {
        false
    }

    /// Record that the rendering cannot stay on one line
    fn mark_broken(&mut self) {}

    /// Whether nothing has been written yet
    fn is_empty(&self) -> bool;
}

fn char_width(c: char, tab_width: usize) -> usize {
    if c == '\t' {
        tab_width
    } else {
        c.width().unwrap_or(0)
    }
}

fn text_width(text: &str, tab_width: usize) -> usize {
    text.chars().map(|c| char_width(c, tab_width)).sum()
}

/// Writes formatted text into a buffer
#[derive(Debug)]
pub(crate) struct Emitter {
    buffer: String,
    column: usize,
    tab_width: usize,
}

impl Emitter {
    pub(crate) fn new(tab_width: usize) -> Self {
        Self {
            buffer: String::new(),
            column: 0,
            tab_width,
        }
    }

    /// Final text: trailing blank lines removed, exactly one final newline
    pub(crate) fn finish(mut self) -> String {
        let trimmed = self.buffer.trim_end().len();
        self.buffer.truncate(trimmed);
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer
    }
}

impl Output for Emitter {
    fn push_text(&mut self, text: &str) {
        self.buffer.push_str(text);
        match text.rfind('\n') {
            Some(index) => self.column = text_width(&text[index + 1..], self.tab_width),
            None => self.column += text_width(text, self.tab_width),
        }
    }

    fn push_newline(&mut self) {
        let trimmed = self.buffer.trim_end_matches([' ', '\t']).len();
        self.buffer.truncate(trimmed);
        self.buffer.push('\n');
        self.column = 0;
    }

    fn clear_padding(&mut self) {
        let trimmed = self.buffer.trim_end_matches([' ', '\t']).len();
        self.buffer.truncate(trimmed);
        self.column = 0;
    }

    fn column(&self) -> usize {
        self.column
    }

    fn should_stop(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Counts the one-line width of a rendering
#[derive(Debug, Clone)]
pub(crate) struct Measurer {
    start_column: usize,
    width: usize,
    limit: usize,
    broken: bool,
    tab_width: usize,
}

impl Measurer {
    pub(crate) fn new(start_column: usize, limit: usize, tab_width: usize) -> Self {
        Self {
            start_column,
            width: 0,
            limit,
            broken: false,
            tab_width,
        }
    }

    /// Width counted up to the first line break
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn is_broken(&self) -> bool {
        self.broken
    }
}

impl Output for Measurer {
    fn push_text(&mut self, text: &str) {
        if self.should_stop() {
            return;
        }
        match text.find('\n') {
            Some(index) => {
                self.width += text_width(&text[..index], self.tab_width);
                self.broken = true;
            }
            None => self.width += text_width(text, self.tab_width),
        }
    }

    fn push_newline(&mut self) {
        self.broken = true;
    }

    fn clear_padding(&mut self) {}

    fn column(&self) -> usize {
        self.start_column + self.width
    }

    fn should_stop(&self) -> bool {
        self.broken || self.column() > self.limit
    }

    fn is_measuring(&self) -> bool {
        true
    }

    fn mark_broken(&mut self) {
        self.broken = true;
    }

    fn is_empty(&self) -> bool {
        self.width == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_trims_trailing_whitespace() {
        let mut out = Emitter::new(4);
        out.push_text("int x;   ");
        out.push_newline();
        out.push_text("    ");
        out.push_newline();
        out.push_text("y");
        assert_eq!(out.column(), 1);
        assert_eq!(out.finish(), "int x;\n\ny\n");
    }

    #[test]
    fn test_emitter_tracks_column_after_verbatim_newlines() {
        let mut out = Emitter::new(4);
        out.push_text("\"\"\"\n  text\n  \"\"\"");
        assert_eq!(out.column(), 5);
    }

    #[test]
    fn test_measurer_stops_at_line_break() {
        let mut out = Measurer::new(10, 100, 4);
        out.push_text("foo(");
        out.push_text("/* a\n b */");
        assert!(out.is_broken());
        assert_eq!(out.width(), 8);
        out.push_text("ignored");
        assert_eq!(out.width(), 8);
    }

    #[test]
    fn test_measurer_stops_past_limit() {
        let mut out = Measurer::new(35, 40, 4);
        out.push_text("abcdef");
        assert!(out.should_stop());
        assert!(!out.is_broken());
    }

    #[test]
    fn test_wide_characters() {
        let mut out = Emitter::new(4);
        out.push_text("\"日本\"");
        assert_eq!(out.column(), 6);
    }
}
