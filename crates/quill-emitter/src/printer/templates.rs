use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::{temp_flags, Printer};

impl<'a> Printer<'a> {
    // =========================================================================
    // Template literals
    // =========================================================================

    pub(super) fn emit_template_expression(&mut self, node: &Node, idx: NodeIndex) {
        let Some(template) = self.arena.get_template_expr(node) else {
            return;
        };
        let (head, spans) = (template.head, template.spans.nodes.clone());

        if self.options.target.supports_es2015() {
            let head_text = self.arena.literal_text(head).to_string();
            self.writer.write_literal(&format!("`{head_text}"));
            for &span in &spans {
                self.emit(span);
            }
            self.writer.write_literal("`");
            return;
        }

        self.emit_down_level_template(idx, head, &spans);
    }

    pub(super) fn emit_template_span(&mut self, node: &Node) {
        let Some(span) = self.arena.get_template_span(node) else {
            return;
        };
        let (expression, literal) = (span.expression, span.literal);
        self.write("${");
        self.emit_expression(expression);
        self.write("}");
        let text = self.arena.literal_text(literal).to_string();
        self.writer.write_literal(&text);
    }

    /// Below ES6 a template becomes string concatenation: the head string,
    /// then `+ expr + "text"` per span. Interpolations whose precedence does
    /// not exceed binary `+` are parenthesized so the concatenation
    /// associates the way the template did.
    fn emit_down_level_template(&mut self, idx: NodeIndex, head: NodeIndex, spans: &[NodeIndex]) {
        let needs_parens = self.template_needs_parens(idx);
        if needs_parens {
            self.write("(");
        }

        let head_text = self.arena.literal_text(head).to_string();
        self.emit_string_literal_text(&head_text);

        for &span_idx in spans {
            let Some(span) = self
                .arena
                .get(span_idx)
                .and_then(|n| self.arena.get_template_span(n))
            else {
                continue;
            };
            let (expression, literal) = (span.expression, span.literal);

            self.write(" + ");
            let wrap = self.arena.kind(expression) != SyntaxKind::ParenthesizedExpression
                && self.comparison_to_binary_plus(expression) != std::cmp::Ordering::Greater;
            if wrap {
                self.write("(");
            }
            self.emit_expression(expression);
            if wrap {
                self.write(")");
            }

            let literal_text = self.arena.literal_text(literal).to_string();
            if !literal_text.is_empty() {
                self.write(" + ");
                self.emit_string_literal_text(&literal_text);
            }
        }

        if needs_parens {
            self.write(")");
        }
    }

    fn template_needs_parens(&self, idx: NodeIndex) -> bool {
        let parent = self.arena.parent(idx);
        matches!(
            self.arena.kind(parent),
            SyntaxKind::PropertyAccessExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::CallExpression
                | SyntaxKind::NewExpression
        )
    }

    pub(super) fn emit_tagged_template_expression(&mut self, node: &Node) {
        let Some(tagged) = self.arena.get_tagged_template(node) else {
            return;
        };
        let (tag, template) = (tagged.tag, tagged.template);

        if self.options.target.supports_es2015() {
            self.emit_expression(tag);
            self.emit(template);
            return;
        }

        self.emit_down_level_tagged_template(tag, template);
    }

    /// `tag`x=${n}`` lowers to
    /// `(_a = ["x=", ""], _a.raw = ["x=", ""], tag(_a, n))`; the temporary is
    /// hoisted into the enclosing function's `var` prelude.
    fn emit_down_level_tagged_template(&mut self, tag: NodeIndex, template: NodeIndex) {
        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        self.record_temp_declaration(temp.clone());

        let (cooked, raw, expressions) = self.template_pieces(template);

        self.write("(");
        self.write(&temp);
        self.write(" = [");
        for (i, text) in cooked.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_string_literal_text(text);
        }
        self.write("], ");
        self.write(&temp);
        self.write(".raw = [");
        for (i, text) in raw.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_string_literal_text(text);
        }
        self.write("], ");
        self.emit_expression(tag);
        self.write("(");
        self.write(&temp);
        for &expr in &expressions {
            self.write(", ");
            self.emit_expression(expr);
        }
        self.write("))");
    }

    /// Cooked strings, raw strings, and interpolated expressions of a
    /// template, in order. Raw text comes from the source slice when the
    /// part has a real span, else falls back to the cooked text.
    fn template_pieces(&self, template: NodeIndex) -> (Vec<String>, Vec<String>, Vec<NodeIndex>) {
        let mut cooked = Vec::new();
        let mut raw = Vec::new();
        let mut expressions = Vec::new();

        let Some(template_node) = self.arena.get(template) else {
            return (cooked, raw, expressions);
        };
        let template_node = *template_node;

        if template_node.kind == SyntaxKind::NoSubstitutionTemplateLiteral {
            let text = self
                .arena
                .get_literal(&template_node)
                .map(|l| l.text.clone())
                .unwrap_or_default();
            raw.push(self.raw_template_text(&template_node).unwrap_or_else(|| text.clone()));
            cooked.push(text);
            return (cooked, raw, expressions);
        }

        let Some(data) = self.arena.get_template_expr(&template_node) else {
            return (cooked, raw, expressions);
        };
        let head_text = self.arena.literal_text(data.head).to_string();
        let head_raw = self
            .arena
            .get(data.head)
            .and_then(|n| self.raw_template_text(n))
            .unwrap_or_else(|| head_text.clone());
        cooked.push(head_text);
        raw.push(head_raw);

        for &span_idx in &data.spans.nodes {
            let Some(span) = self
                .arena
                .get(span_idx)
                .and_then(|n| self.arena.get_template_span(n))
            else {
                continue;
            };
            expressions.push(span.expression);
            let text = self.arena.literal_text(span.literal).to_string();
            let raw_text = self
                .arena
                .get(span.literal)
                .and_then(|n| self.raw_template_text(n))
                .unwrap_or_else(|| text.clone());
            cooked.push(text);
            raw.push(raw_text);
        }

        (cooked, raw, expressions)
    }

    /// Source slice of a template part with the delimiters trimmed:
    /// a head drops `` ` `` and `${`, a middle drops `}` and `${`, a tail
    /// drops `}` and `` ` ``.
    fn raw_template_text(&self, part: &Node) -> Option<String> {
        let text = self.source_text?;
        if part.is_synthesized() || part.pos >= part.end {
            return None;
        }
        let start = part.pos as usize;
        let end = (part.end as usize).min(text.len());
        if start >= end {
            return None;
        }
        let mut slice = &text[start..end];
        slice = slice
            .strip_prefix('`')
            .or_else(|| slice.strip_prefix('}'))
            .unwrap_or(slice);
        slice = slice
            .strip_suffix("${")
            .or_else(|| slice.strip_suffix('`'))
            .unwrap_or(slice);
        Some(slice.to_string())
    }
}
