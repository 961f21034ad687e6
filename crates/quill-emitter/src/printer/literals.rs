use std::fmt::Write;

use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Identifiers and literals
    // =========================================================================

    /// Every identifier that reaches the sink is verbatim source text, a
    /// resolver substitution, or a name this printer manufactured.
    pub(super) fn emit_identifier(&mut self, node: &Node, idx: NodeIndex) {
        let Some(ident) = self.arena.get_identifier(node) else {
            return;
        };

        // Block-scoped bindings that collided in their enclosing scope were
        // renamed at declaration; every reference carrying the same id
        // substitutes the new name.
        if let Some(id) = self.resolver.get_block_scoped_variable_id(idx) {
            if let Some(renamed) = self.block_scoped_renames.get(&id) {
                let renamed = renamed.clone();
                self.write(&renamed);
                return;
            }
        }

        if let Some(substitution) = self.resolver.get_expression_name_substitution(idx) {
            self.write(&substitution);
            return;
        }

        self.write(&ident.text);
    }

    pub(super) fn emit_this(&mut self, _node: &Node) {
        if let Some(substitute) = self.this_substitution.clone() {
            self.write(&substitute);
        } else {
            self.write("this");
        }
    }

    pub(super) fn emit_super(&mut self, _node: &Node) {
        if let Some(super_name) = self.super_name.clone() {
            self.write(&super_name);
        } else {
            self.write("super");
        }
    }

    pub(super) fn emit_numeric_literal(&mut self, node: &Node) {
        if let Some(lit) = self.arena.get_literal(node) {
            let text = lit.text.clone();
            self.write(&text);
        }
    }

    pub(super) fn emit_regex_literal(&mut self, node: &Node) {
        if let Some(lit) = self.arena.get_literal(node) {
            let text = lit.text.clone();
            self.write(&text);
        }
    }

    pub(super) fn emit_string_literal(&mut self, node: &Node) {
        if let Some(lit) = self.arena.get_literal(node) {
            let text = lit.text.clone();
            self.emit_string_literal_text(&text);
        }
    }

    /// Quote and escape cooked string text.
    pub(super) fn emit_string_literal_text(&mut self, text: &str) {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        escape_string_into(&mut out, text, '"');
        out.push('"');
        self.write(&out);
    }

    /// Template parts dispatch here only when emitted standalone; the
    /// template emitters write delimiters themselves.
    pub(super) fn emit_template_part(&mut self, node: &Node) {
        let Some(lit) = self.arena.get_literal(node) else {
            return;
        };
        let text = lit.text.clone();
        if node.kind == SyntaxKind::NoSubstitutionTemplateLiteral {
            if self.options.target.supports_es2015() {
                self.writer.write_literal(&format!("`{text}`"));
            } else {
                self.emit_string_literal_text(&text);
            }
        } else {
            self.writer.write_literal(&text);
        }
    }
}

/// Escape cooked string content for emission between `quote` characters.
pub(crate) fn escape_string_into(out: &mut String, text: &str, quote: char) {
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}
