use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::{temp_flags, Printer};

/// Segment of an array literal or argument list split on spread elements.
enum SpreadSegment<'s> {
    Elements(&'s [NodeIndex]),
    Spread(NodeIndex),
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Names in expression position
    // =========================================================================

    pub(super) fn emit_qualified_name(&mut self, node: &Node) {
        let Some(name) = self.arena.get_qualified_name(node) else {
            return;
        };
        self.emit(name.left);
        self.write(".");
        self.emit(name.right);
    }

    pub(super) fn emit_computed_property_name(&mut self, node: &Node, idx: NodeIndex) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        self.write("[");
        // A decorated computed member captured its expression into a
        // temporary; later mentions reuse the temporary so the expression is
        // evaluated exactly once.
        if let Some(temp) = self.computed_property_temps.get(&idx).cloned() {
            self.write(&temp);
        } else {
            self.emit_expression(wrapped.expression);
        }
        self.write("]");
    }

    // =========================================================================
    // Literal-shaped expressions
    // =========================================================================

    pub(super) fn emit_array_literal(&mut self, node: &Node) {
        let Some(array) = self.arena.get_literal_expr(node) else {
            return;
        };
        let elements = array.elements.nodes.clone();

        if !self.options.target.supports_es2015() && self.has_spread_element(&elements) {
            self.emit_array_literal_with_spread_es5(&elements);
            return;
        }

        let multiline = elements.len() > 1
            && self.nodes_on_separate_lines(elements[0], elements[elements.len() - 1]);
        if multiline {
            self.write("[");
            self.write_line();
            self.increase_indent();
            for (i, &element) in elements.iter().enumerate() {
                self.emit(element);
                if i + 1 < elements.len() {
                    self.write(",");
                }
                self.write_line();
            }
            self.decrease_indent();
            self.write("]");
        } else {
            self.write("[");
            self.emit_comma_separated(&elements);
            self.write("]");
        }
    }

    pub(super) fn has_spread_element(&self, elements: &[NodeIndex]) -> bool {
        elements
            .iter()
            .any(|&e| self.arena.kind(e) == SyntaxKind::SpreadElement)
    }

    fn split_on_spreads<'s>(&self, elements: &'s [NodeIndex]) -> Vec<SpreadSegment<'s>> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (i, &elem) in elements.iter().enumerate() {
            if self.arena.kind(elem) == SyntaxKind::SpreadElement {
                if start < i {
                    segments.push(SpreadSegment::Elements(&elements[start..i]));
                }
                segments.push(SpreadSegment::Spread(elem));
                start = i + 1;
            }
        }
        if start < elements.len() {
            segments.push(SpreadSegment::Elements(&elements[start..]));
        }
        segments
    }

    fn emit_spread_operand(&mut self, spread_idx: NodeIndex) {
        if let Some(node) = self.arena.get(spread_idx) {
            let node = *node;
            if let Some(spread) = self.arena.get_wrapped_expr(&node) {
                self.emit_expression(spread.expression);
            }
        }
    }

    /// Below ES6, spread lowers to `concat` chains:
    /// `[1, ...a, 2]` becomes `[1].concat(a, [2])`, and a lone `[...a]`
    /// becomes `a.slice()` so the result is still a fresh array.
    fn emit_array_literal_with_spread_es5(&mut self, elements: &[NodeIndex]) {
        let segments = self.split_on_spreads(elements);
        match segments.as_slice() {
            [] => self.write("[]"),
            [SpreadSegment::Spread(spread)] => {
                let spread = *spread;
                self.emit_spread_operand(spread);
                self.write(".slice()");
            }
            [first, rest @ ..] => {
                match first {
                    SpreadSegment::Elements(elems) => {
                        let elems = elems.to_vec();
                        self.write("[");
                        self.emit_comma_separated(&elems);
                        self.write("]");
                    }
                    SpreadSegment::Spread(spread) => {
                        let spread = *spread;
                        self.emit_spread_operand(spread);
                    }
                }
                if !rest.is_empty() {
                    self.write(".concat(");
                    for (i, segment) in rest.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        match segment {
                            SpreadSegment::Elements(elems) => {
                                let elems = elems.to_vec();
                                self.write("[");
                                self.emit_comma_separated(&elems);
                                self.write("]");
                            }
                            SpreadSegment::Spread(spread) => {
                                let spread = *spread;
                                self.emit_spread_operand(spread);
                            }
                        }
                    }
                    self.write(")");
                }
            }
        }
    }

    pub(super) fn emit_object_literal(&mut self, node: &Node, idx: NodeIndex) {
        let Some(object) = self.arena.get_literal_expr(node) else {
            return;
        };
        let properties = object.elements.nodes.clone();

        if properties.is_empty() {
            self.write("{}");
            return;
        }

        if !self.options.target.supports_es2015() && self.has_computed_property(&properties) {
            self.emit_object_literal_with_computed_es5(&properties, idx);
            return;
        }

        let multiline = !self.is_single_line(node) && properties.len() > 1;
        if multiline {
            self.write("{");
            self.write_line();
            self.increase_indent();
            for (i, &prop) in properties.iter().enumerate() {
                self.emit(prop);
                if i + 1 < properties.len() {
                    self.write(",");
                }
                self.write_line();
            }
            self.decrease_indent();
            self.write("}");
        } else {
            self.write("{ ");
            self.emit_comma_separated(&properties);
            self.write(" }");
        }
    }

    fn has_computed_property(&self, properties: &[NodeIndex]) -> bool {
        properties.iter().any(|&p| {
            self.arena
                .get(p)
                .and_then(|n| self.arena.get_property_assignment(n))
                .is_some_and(|data| {
                    self.arena.kind(data.name) == SyntaxKind::ComputedPropertyName
                })
        })
    }

    /// `{ a: 1, [k]: 2 }` lowers to `(_a = { a: 1 }, _a[k] = 2, _a)` below
    /// ES6: plain properties before the first computed name stay in literal
    /// position; everything after is assigned onto the temporary.
    fn emit_object_literal_with_computed_es5(
        &mut self,
        properties: &[NodeIndex],
        _idx: NodeIndex,
    ) {
        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        self.record_temp_declaration(temp.clone());

        let first_computed = properties
            .iter()
            .position(|&p| {
                self.arena
                    .get(p)
                    .and_then(|n| self.arena.get_property_assignment(n))
                    .is_some_and(|data| {
                        self.arena.kind(data.name) == SyntaxKind::ComputedPropertyName
                    })
            })
            .unwrap_or(properties.len());

        self.write("(");
        self.write(&temp);
        self.write(" = ");
        let head = &properties[..first_computed];
        if head.is_empty() {
            self.write("{}");
        } else {
            self.write("{ ");
            let head = head.to_vec();
            self.emit_comma_separated(&head);
            self.write(" }");
        }

        for &prop_idx in &properties[first_computed..] {
            let Some(prop_node) = self.arena.get(prop_idx) else {
                continue;
            };
            let prop_node = *prop_node;
            let Some(prop) = self.arena.get_property_assignment(&prop_node) else {
                continue;
            };
            let (name, initializer) = (prop.name, prop.initializer);
            self.write(", ");
            self.write(&temp);
            if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
                self.emit(name);
            } else {
                self.write("[");
                self.emit_property_name_as_string(name);
                self.write("]");
            }
            self.write(" = ");
            if initializer.is_some() {
                self.emit_expression(initializer);
            } else {
                // Shorthand: the value is the same identifier.
                self.emit(name);
            }
        }

        self.write(", ");
        self.write(&temp);
        self.write(")");
    }

    /// Emit a declaration-name node as a string-literal key.
    pub(super) fn emit_property_name_as_string(&mut self, name: NodeIndex) {
        let Some(node) = self.arena.get(name) else {
            return;
        };
        let node = *node;
        match node.kind {
            SyntaxKind::Identifier => {
                let text = self
                    .arena
                    .get_identifier(&node)
                    .map(|i| i.text.clone())
                    .unwrap_or_default();
                self.emit_string_literal_text(&text);
            }
            SyntaxKind::StringLiteral => self.emit_string_literal(&node),
            SyntaxKind::NumericLiteral => {
                let text = self
                    .arena
                    .get_literal(&node)
                    .map(|l| l.text.clone())
                    .unwrap_or_default();
                self.emit_string_literal_text(&text);
            }
            _ => self.emit(name),
        }
    }

    pub(super) fn emit_property_assignment(&mut self, node: &Node) {
        let Some(prop) = self.arena.get_property_assignment(node) else {
            return;
        };
        let (name, initializer) = (prop.name, prop.initializer);
        self.emit(name);
        self.write(": ");
        self.emit_expression(initializer);
    }

    pub(super) fn emit_shorthand_property(&mut self, node: &Node, idx: NodeIndex) {
        let Some(prop) = self.arena.get_property_assignment(node) else {
            return;
        };
        let name = prop.name;
        if self.options.target.supports_es2015()
            && self
                .resolver
                .get_expression_name_substitution(name)
                .is_none()
        {
            self.emit(name);
            return;
        }
        // Below ES6 (or when the value reference is substituted) the
        // shorthand expands to `name: value`.
        let text = self.arena.identifier_text(name).to_string();
        self.write(&text);
        self.write(": ");
        self.emit(name);
        let _ = idx;
    }

    // =========================================================================
    // Access and calls
    // =========================================================================

    pub(super) fn emit_property_access(&mut self, node: &Node, idx: NodeIndex) {
        let Some(access) = self.arena.get_access_expr(node) else {
            return;
        };
        let (expression, member) = (access.expression, access.member);

        // Const-enum member accesses with a known value inline the number,
        // unless separate compilation forbids cross-file inlining.
        if !self.options.separate_compilation {
            if let Some(value) = self.resolver.get_constant_value(idx) {
                self.write(&format_constant_value(value));
                let member_text = self.arena.identifier_text(member).to_string();
                if !member_text.is_empty() {
                    self.write(" /* ");
                    self.write(&member_text);
                    self.write(" */");
                }
                return;
            }
        }

        if self.arena.kind(expression) == SyntaxKind::SuperKeyword && self.super_name.is_some() {
            let super_name = self.super_name.clone().unwrap_or_default();
            self.write(&super_name);
            self.write(".prototype.");
            let member_text = self.arena.identifier_text(member).to_string();
            self.write(&member_text);
            return;
        }

        self.emit_expression(expression);
        self.write(".");
        let member_text = self.arena.identifier_text(member).to_string();
        self.write(&member_text);
    }

    pub(super) fn emit_element_access(&mut self, node: &Node) {
        let Some(access) = self.arena.get_access_expr(node) else {
            return;
        };
        let (expression, member) = (access.expression, access.member);
        self.emit_expression(expression);
        self.write("[");
        self.emit_expression(member);
        self.write("]");
    }

    pub(super) fn emit_call_expression(&mut self, node: &Node) {
        let Some(call) = self.arena.get_call_expr(node) else {
            return;
        };
        let callee = call.expression;
        let arguments = call.arguments.nodes.clone();
        let lowering = !self.options.target.supports_es2015();

        // `super(...)` and `super.m(...)` lower through `_super` when the
        // enclosing class was lowered to an IIFE.
        if lowering && self.super_name.is_some() {
            if self.arena.kind(callee) == SyntaxKind::SuperKeyword {
                self.emit_super_call_es5(&arguments);
                return;
            }
            if self.arena.kind(callee) == SyntaxKind::PropertyAccessExpression {
                let is_super_method = self
                    .arena
                    .get(callee)
                    .and_then(|n| self.arena.get_access_expr(n))
                    .is_some_and(|a| self.arena.kind(a.expression) == SyntaxKind::SuperKeyword);
                if is_super_method {
                    self.emit_super_method_call_es5(callee, &arguments);
                    return;
                }
            }
        }

        if lowering && self.has_spread_element(&arguments) {
            self.emit_call_with_spread_es5(callee, &arguments);
            return;
        }

        self.emit_expression(callee);
        self.write("(");
        self.emit_comma_separated(&arguments);
        self.write(")");
    }

    fn emit_super_call_es5(&mut self, arguments: &[NodeIndex]) {
        let super_name = self.super_name.clone().unwrap_or_default();
        if self.has_spread_element(arguments) {
            self.write(&super_name);
            self.write(".apply(this, ");
            self.emit_spread_arguments_array(arguments);
            self.write(")");
            return;
        }
        self.write(&super_name);
        self.write(".call(this");
        for &arg in arguments {
            self.write(", ");
            self.emit_expression(arg);
        }
        self.write(")");
    }

    fn emit_super_method_call_es5(&mut self, callee: NodeIndex, arguments: &[NodeIndex]) {
        let super_name = self.super_name.clone().unwrap_or_default();
        let member_text = self
            .arena
            .get(callee)
            .and_then(|n| self.arena.get_access_expr(n))
            .map(|a| self.arena.identifier_text(a.member).to_string())
            .unwrap_or_default();

        self.write(&super_name);
        self.write(".prototype.");
        self.write(&member_text);
        if self.has_spread_element(arguments) {
            self.write(".apply(this, ");
            self.emit_spread_arguments_array(arguments);
            self.write(")");
        } else {
            self.write(".call(this");
            for &arg in arguments {
                self.write(", ");
                self.emit_expression(arg);
            }
            self.write(")");
        }
    }

    /// `f(...xs)` lowers to `f.apply(void 0, xs)`; `o.m(head, ...tail)` to
    /// `o.m.apply(o, [head].concat(tail))` with a temporary when the receiver
    /// is not a stable reference.
    fn emit_call_with_spread_es5(&mut self, callee: NodeIndex, arguments: &[NodeIndex]) {
        let callee_kind = self.arena.kind(callee);
        if callee_kind == SyntaxKind::PropertyAccessExpression
            || callee_kind == SyntaxKind::ElementAccessExpression
        {
            let target = self
                .arena
                .get(callee)
                .and_then(|n| self.arena.get_access_expr(n))
                .map(|a| a.expression)
                .unwrap_or(NodeIndex::NONE);
            let target_kind = self.arena.kind(target);
            let target_is_stable = matches!(
                target_kind,
                SyntaxKind::Identifier | SyntaxKind::ThisKeyword
            );

            if target_is_stable {
                self.emit_expression(callee);
                self.write(".apply(");
                self.emit_expression(target);
                self.write(", ");
                self.emit_spread_arguments_array(arguments);
                self.write(")");
            } else {
                let temp = self.make_temp_variable_name(temp_flags::AUTO);
                self.record_temp_declaration(temp.clone());
                self.write("(");
                self.write(&temp);
                self.write(" = ");
                self.emit_expression(target);
                self.write(")");
                self.emit_access_tail(callee);
                self.write(".apply(");
                self.write(&temp);
                self.write(", ");
                self.emit_spread_arguments_array(arguments);
                self.write(")");
            }
        } else {
            self.emit_expression(callee);
            self.write(".apply(void 0, ");
            self.emit_spread_arguments_array(arguments);
            self.write(")");
        }
    }

    /// The `.m` or `[k]` tail of an access expression, without its target.
    fn emit_access_tail(&mut self, callee: NodeIndex) {
        let Some(node) = self.arena.get(callee) else {
            return;
        };
        let node = *node;
        let Some(access) = self.arena.get_access_expr(&node) else {
            return;
        };
        let member = access.member;
        if node.kind == SyntaxKind::PropertyAccessExpression {
            self.write(".");
            let member_text = self.arena.identifier_text(member).to_string();
            self.write(&member_text);
        } else {
            self.write("[");
            self.emit_expression(member);
            self.write("]");
        }
    }

    /// One array expression covering an argument list with spreads:
    /// `[head].concat(tail, [more])`.
    pub(super) fn emit_spread_arguments_array(&mut self, arguments: &[NodeIndex]) {
        let segments = self.split_on_spreads(arguments);
        match segments.as_slice() {
            [SpreadSegment::Spread(spread)] => {
                let spread = *spread;
                self.emit_spread_operand(spread);
            }
            _ => self.emit_array_literal_with_spread_es5(arguments),
        }
    }

    pub(super) fn emit_new_expression(&mut self, node: &Node) {
        let Some(call) = self.arena.get_call_expr(node) else {
            return;
        };
        let callee = call.expression;
        let arguments = call.arguments.nodes.clone();
        self.write("new ");
        self.emit_expression(callee);
        self.write("(");
        self.emit_comma_separated(&arguments);
        self.write(")");
    }

    // =========================================================================
    // Wrappers and operators
    // =========================================================================

    pub(super) fn emit_type_assertion(&mut self, node: &Node) {
        // Assertions are erased; only the operand remains.
        if let Some(wrapped) = self.arena.get_wrapped_expr(node) {
            self.emit_expression(wrapped.expression);
        }
    }

    pub(super) fn emit_parenthesized_expression(&mut self, node: &Node) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        self.write("(");
        self.emit_expression(wrapped.expression);
        self.write(")");
    }

    pub(super) fn emit_unary_keyword_expression(&mut self, node: &Node, keyword: &str) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        self.write(keyword);
        self.write(" ");
        self.emit_expression(wrapped.expression);
    }

    pub(super) fn emit_prefix_unary(&mut self, node: &Node) {
        let Some(unary) = self.arena.get_unary_expr(node) else {
            return;
        };
        let (operator, operand) = (unary.operator, unary.operand);
        self.write(operator.token_text());
        // `+ +x` and `- -x` need the space to avoid token merging.
        let operand_merges = self
            .arena
            .get(operand)
            .filter(|n| n.kind == SyntaxKind::PrefixUnaryExpression)
            .and_then(|n| self.arena.get_unary_expr(n))
            .is_some_and(|inner| {
                matches!(
                    (operator, inner.operator),
                    (SyntaxKind::PlusToken, SyntaxKind::PlusToken | SyntaxKind::PlusPlusToken)
                        | (
                            SyntaxKind::MinusToken,
                            SyntaxKind::MinusToken | SyntaxKind::MinusMinusToken
                        )
                )
            });
        if operand_merges {
            self.write(" ");
        }
        self.emit_expression(operand);
    }

    pub(super) fn emit_postfix_unary(&mut self, node: &Node) {
        let Some(unary) = self.arena.get_unary_expr(node) else {
            return;
        };
        let (operator, operand) = (unary.operator, unary.operand);
        self.emit_expression(operand);
        self.write(operator.token_text());
    }

    pub(super) fn emit_binary_expression(&mut self, node: &Node, idx: NodeIndex) {
        let Some(binary) = self.arena.get_binary_expr(node) else {
            return;
        };
        let (left, operator, right) = (binary.left, binary.operator, binary.right);

        // Destructuring assignment lowers below ES6.
        if operator == SyntaxKind::EqualsToken
            && !self.options.target.supports_es2015()
            && matches!(
                self.arena.kind(left),
                SyntaxKind::ArrayLiteralExpression | SyntaxKind::ObjectLiteralExpression
            )
        {
            let parent_kind = self.arena.kind(self.arena.parent(idx));
            let standalone = parent_kind == SyntaxKind::ExpressionStatement;
            self.emit_destructuring_assignment(left, right, standalone);
            return;
        }

        self.emit_expression(left);
        if operator == SyntaxKind::CommaToken {
            self.write(", ");
        } else {
            self.write(" ");
            self.write(operator.token_text());
            self.write(" ");
        }
        self.emit_expression(right);
    }

    pub(super) fn emit_conditional_expression(&mut self, node: &Node) {
        let Some(cond) = self.arena.get_conditional_expr(node) else {
            return;
        };
        let (condition, when_true, when_false) = (cond.condition, cond.when_true, cond.when_false);
        self.emit_expression(condition);
        self.write(" ? ");
        self.emit_expression(when_true);
        self.write(" : ");
        self.emit_expression(when_false);
    }

    pub(super) fn emit_yield_expression(&mut self, node: &Node) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        self.write("yield");
        if wrapped.expression.is_some() {
            self.write(" ");
            let expression = wrapped.expression;
            self.emit_expression(expression);
        }
    }

    pub(super) fn emit_spread_element(&mut self, node: &Node) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        self.write("...");
        let expression = wrapped.expression;
        self.emit_expression(expression);
    }

    /// Whether an interpolated expression binds at least as tight as binary
    /// `+`; anything looser (or equal) is parenthesized by the template
    /// lowering.
    pub(super) fn comparison_to_binary_plus(&self, expr: NodeIndex) -> std::cmp::Ordering {
        let plus = SyntaxKind::PlusToken.binary_operator_precedence();
        let Some(node) = self.arena.get(expr) else {
            return std::cmp::Ordering::Greater;
        };
        match node.kind {
            SyntaxKind::BinaryExpression => {
                let precedence = self
                    .arena
                    .get_binary_expr(node)
                    .map_or(0, |b| b.operator.binary_operator_precedence());
                precedence.cmp(&plus)
            }
            SyntaxKind::ConditionalExpression | SyntaxKind::YieldExpression => {
                std::cmp::Ordering::Less
            }
            _ => std::cmp::Ordering::Greater,
        }
    }
}

/// Format a resolver-provided constant the way emitted JavaScript writes it.
fn format_constant_value(value: f64) -> String {
    if value == value.trunc() && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
