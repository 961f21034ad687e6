//! The indented character sink every emitted byte goes through.

const INDENT: &str = "    ";

/// Line-buffered writer with lazy indentation: the indent for a fresh line
/// is only written when the first non-newline text arrives, so empty lines
/// stay empty. Line and column are 1-based, matching what the source-map
/// recorder expects.
pub struct SourceWriter {
    output: String,
    indent: u32,
    line_start: bool,
    line_count: u32,
    line_pos: usize,
    new_line: String,
}

impl SourceWriter {
    #[must_use]
    pub fn new(new_line: &str) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            line_start: true,
            line_count: 1,
            line_pos: 0,
            new_line: new_line.to_string(),
        }
    }

    /// Write text containing no newlines.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.line_start {
            for _ in 0..self.indent {
                self.output.push_str(INDENT);
            }
            self.line_start = false;
        }
        self.output.push_str(text);
    }

    /// Write text that may contain newlines, keeping line/column tracking
    /// accurate. Used for verbatim multi-line source slices (template
    /// literals, comments).
    pub fn write_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.line_start {
            for _ in 0..self.indent {
                self.output.push_str(INDENT);
            }
            self.line_start = false;
        }
        self.output.push_str(text);
        let mut last_newline = None;
        let mut newlines = 0u32;
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                newlines += 1;
                last_newline = Some(i);
            }
        }
        if let Some(last) = last_newline {
            self.line_count += newlines;
            self.line_pos = self.output.len() - (text.len() - last - 1);
        }
    }

    /// Terminate the current line. Idempotent when the line is already empty.
    pub fn write_line(&mut self) {
        if !self.line_start {
            self.output.push_str(&self.new_line);
            self.line_count += 1;
            self.line_pos = self.output.len();
            self.line_start = true;
        }
    }

    /// Force a newline even when the current line is empty. The comment
    /// router uses this to reproduce blank lines the source had before a
    /// comment.
    pub fn write_blank_line(&mut self) {
        self.output.push_str(&self.new_line);
        self.line_count += 1;
        self.line_pos = self.output.len();
        self.line_start = true;
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// 1-based line of the next character to be written.
    #[must_use]
    pub fn get_line(&self) -> u32 {
        self.line_count
    }

    /// 1-based column of the next character to be written, accounting for
    /// pending indentation.
    #[must_use]
    pub fn get_column(&self) -> u32 {
        if self.line_start {
            self.indent * INDENT.len() as u32 + 1
        } else {
            (self.output.len() - self.line_pos) as u32 + 1
        }
    }

    #[must_use]
    pub fn get_text_pos(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[must_use]
    pub fn get_text(self) -> String {
        self.output
    }

    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }
}

#[cfg(test)]
#[path = "tests/writer.rs"]
mod tests;
