use once_cell::sync::Lazy;
use regex::Regex;

use quill_ast::comments::{leading_comment_ranges, trailing_comment_ranges, CommentRange};
use quill_ast::Node;

use super::Printer;

static TRIPLE_SLASH_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^///\s*<(reference|amd-dependency|amd-module)\b").expect("directive regex")
});

impl<'a> Printer<'a> {
    // =========================================================================
    // Comment routing
    // =========================================================================

    /// Does a comment survive `removeComments`? Only pinned (`/*!`) and
    /// triple-slash directive comments do.
    fn comment_survives(&self, text: &str) -> bool {
        if !self.options.remove_comments {
            return true;
        }
        text.starts_with("/*!") || TRIPLE_SLASH_DIRECTIVE.is_match(text)
    }

    fn comment_text(&self, range: &CommentRange) -> Option<String> {
        let text = self.source_text?;
        let start = range.pos as usize;
        let end = (range.end as usize).min(text.len());
        if start >= end {
            return None;
        }
        Some(text[start..end].to_string())
    }

    /// Leading comments of a node: everything between the node's trivia
    /// start and its first token, minus ranges already consumed by the
    /// detached header.
    pub(crate) fn emit_leading_comments_of_node(&mut self, node: &Node) {
        if node.is_synthesized() || node.pos >= node.end {
            return;
        }
        self.emit_leading_comments_of_position(node.pos);
    }

    pub(crate) fn emit_leading_comments_of_position(&mut self, pos: u32) {
        let Some(text) = self.source_text else {
            return;
        };
        let ranges = leading_comment_ranges(text, pos);
        let mut previous_end = pos;
        for range in ranges {
            if let Some(detached_end) = self.detached_comment_end {
                if range.end <= detached_end {
                    previous_end = range.end;
                    continue;
                }
            }
            let Some(comment) = self.comment_text(&range) else {
                continue;
            };
            if !self.comment_survives(&comment) {
                previous_end = range.end;
                continue;
            }

            // Reproduce a blank line the source had before this comment.
            if count_line_breaks_between(text, previous_end, range.pos) >= 2 {
                self.write_line();
                self.writer.write_blank_line();
            }

            self.write_comment(&comment);
            if range.has_trailing_new_line {
                self.write_line();
            } else {
                self.write_space();
            }
            previous_end = range.end;
        }
    }

    /// Comments on the same line after the node's end (`foo(); // note`).
    pub(crate) fn emit_trailing_comments_of_node(&mut self, node: &Node) {
        if node.is_synthesized() || node.pos >= node.end {
            return;
        }
        let Some(text) = self.source_text else {
            return;
        };
        let ranges = trailing_comment_ranges(text, node.end);
        for range in ranges {
            let Some(comment) = self.comment_text(&range) else {
                continue;
            };
            if !self.comment_survives(&comment) {
                continue;
            }
            self.write_space();
            self.write_comment(&comment);
        }
    }

    /// The copyright-style header: the initial run of comments separated
    /// from the first statement by at least one blank line. Written once;
    /// the first node's leading set then skips it.
    pub(crate) fn emit_detached_comments(&mut self, file_start: u32) {
        let Some(text) = self.source_text else {
            return;
        };
        let ranges = leading_comment_ranges(text, file_start);
        if ranges.is_empty() {
            return;
        }

        // Find the last comment still followed by a blank line before the
        // next content.
        let mut detached_end: Option<u32> = None;
        for (i, range) in ranges.iter().enumerate() {
            let next_pos = ranges
                .get(i + 1)
                .map_or_else(|| token_start_after(text, range.end), |r| r.pos);
            if count_line_breaks_between(text, range.end, next_pos) >= 2 {
                detached_end = Some(range.end);
                break;
            }
        }
        let Some(detached_end) = detached_end else {
            return;
        };

        for range in &ranges {
            if range.end > detached_end {
                break;
            }
            let Some(comment) = self.comment_text(range) else {
                continue;
            };
            if !self.comment_survives(&comment) {
                continue;
            }
            self.write_comment(&comment);
            self.write_line();
        }
        self.writer.write_blank_line();
        self.detached_comment_end = Some(detached_end);
    }

    /// Write comment text, trimming trailing whitespace from each line of a
    /// multi-line comment.
    pub(crate) fn write_comment(&mut self, text: &str) {
        if text.contains('\n') {
            let trimmed: Vec<&str> = text.split('\n').map(str::trim_end).collect();
            self.writer.write_literal(&trimmed.join("\n"));
        } else {
            self.write(text);
        }
    }
}

fn count_line_breaks_between(text: &str, start: u32, end: u32) -> usize {
    let bytes = text.as_bytes();
    let from = (start as usize).min(bytes.len());
    let to = (end as usize).min(bytes.len());
    bytes[from..to].iter().filter(|&&b| b == b'\n').count()
}

fn token_start_after(text: &str, pos: u32) -> u32 {
    quill_ast::comments::skip_trivia(text, pos)
}
