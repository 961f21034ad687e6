use quill_ast::node::node_flags;
use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::destructuring::DestructuringValue;
use super::{temp_flags, Printer};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(super) fn emit_block(&mut self, node: &Node, _idx: NodeIndex) {
        let Some(block) = self.arena.get_block(node) else {
            return;
        };
        let statements = block.statements.nodes.clone();

        if statements.is_empty() {
            if self.is_single_line(node) {
                self.write("{ }");
            } else {
                self.write("{");
                self.write_line();
                self.write("}");
            }
            return;
        }

        if statements.len() == 1 && self.is_single_line(node) {
            self.write("{ ");
            self.emit(statements[0]);
            self.write(" }");
            return;
        }

        let brace_pos = if node.is_synthesized() { u32::MAX } else { node.pos };
        self.emit_token("{", brace_pos);
        self.write_line();
        self.increase_indent();
        self.emit_lines(&statements);
        self.decrease_indent();
        self.emit_token("}", if brace_pos == u32::MAX { u32::MAX } else { node.end.saturating_sub(1) });
    }

    /// A statement in `if`/loop position: blocks stay on the same line,
    /// anything else moves to an indented line.
    pub(super) fn emit_embedded_statement(&mut self, stmt: NodeIndex) {
        if self.arena.kind(stmt) == SyntaxKind::Block {
            self.write_space();
            self.emit(stmt);
        } else {
            self.write_line();
            self.increase_indent();
            self.emit(stmt);
            self.decrease_indent();
        }
    }

    pub(super) fn emit_expression_statement(&mut self, node: &Node) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        let expression = wrapped.expression;
        self.emit_expression(expression);
        self.write_semicolon();
    }

    pub(super) fn emit_if_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_if_statement(node) else {
            return;
        };
        let (expression, then_statement, else_statement) =
            (data.expression, data.then_statement, data.else_statement);

        self.write("if (");
        self.emit_expression(expression);
        self.write(")");
        self.emit_embedded_statement(then_statement);

        if else_statement.is_some() {
            if self.arena.kind(then_statement) == SyntaxKind::Block {
                self.write_space();
            } else {
                self.write_line();
            }
            self.write("else");
            if self.arena.kind(else_statement) == SyntaxKind::IfStatement {
                self.write_space();
                self.emit(else_statement);
            } else {
                self.emit_embedded_statement(else_statement);
            }
        }
    }

    pub(super) fn emit_do_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_loop(node) else {
            return;
        };
        let (condition, statement) = (data.condition, data.statement);
        self.write("do");
        self.emit_embedded_statement(statement);
        if self.arena.kind(statement) == SyntaxKind::Block {
            self.write_space();
        } else {
            self.write_line();
        }
        self.write("while (");
        self.emit_expression(condition);
        self.write(");");
    }

    pub(super) fn emit_while_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_loop(node) else {
            return;
        };
        let (condition, statement) = (data.condition, data.statement);
        self.write("while (");
        self.emit_expression(condition);
        self.write(")");
        self.emit_embedded_statement(statement);
    }

    pub(super) fn emit_for_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_loop(node) else {
            return;
        };
        let (initializer, condition, incrementor, statement) = (
            data.initializer,
            data.condition,
            data.incrementor,
            data.statement,
        );
        self.write("for (");
        if initializer.is_some() {
            self.emit(initializer);
        }
        self.write("; ");
        if condition.is_some() {
            self.emit_expression(condition);
        }
        self.write("; ");
        if incrementor.is_some() {
            self.emit_expression(incrementor);
        }
        self.write(")");
        self.emit_embedded_statement(statement);
    }

    pub(super) fn emit_for_in_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_for_in_of(node) else {
            return;
        };
        let (initializer, expression, statement) =
            (data.initializer, data.expression, data.statement);
        self.write("for (");
        self.emit(initializer);
        self.write(" in ");
        self.emit_expression(expression);
        self.write(")");
        self.emit_embedded_statement(statement);
    }

    pub(super) fn emit_for_of_statement(&mut self, node: &Node, idx: NodeIndex) {
        let Some(data) = self.arena.get_for_in_of(node) else {
            return;
        };
        let (initializer, expression, statement) =
            (data.initializer, data.expression, data.statement);

        if self.options.target.supports_es2015() {
            self.write("for (");
            self.emit(initializer);
            self.write(" of ");
            self.emit_expression(expression);
            self.write(")");
            self.emit_embedded_statement(statement);
            return;
        }

        self.emit_down_level_for_of(initializer, expression, statement);
        let _ = idx;
    }

    /// `for (let v of expr) body` assumes an array-like iterable below ES6:
    ///
    /// ```text
    /// for (var _i = 0, _a = expr; _i < _a.length; _i++) {
    ///     var v = _a[_i];
    ///     body
    /// }
    /// ```
    ///
    /// A plain identifier iterable elides the `_a` temporary. The binding is
    /// re-emitted inside the body so destructuring patterns keep working.
    fn emit_down_level_for_of(
        &mut self,
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    ) {
        tracing::debug!("lowering for-of to an indexed loop");
        let counter = self.make_temp_variable_name(temp_flags::UNDERSCORE_I);

        let iterable_is_identifier = self.arena.kind(expression) == SyntaxKind::Identifier
            && self
                .resolver
                .get_expression_name_substitution(expression)
                .is_none();
        let array_temp = if iterable_is_identifier {
            None
        } else {
            Some(self.make_temp_variable_name(temp_flags::AUTO))
        };

        self.write("for (var ");
        self.write(&counter);
        self.write(" = 0");
        if let Some(temp) = &array_temp {
            let temp = temp.clone();
            self.write(", ");
            self.write(&temp);
            self.write(" = ");
            self.emit_expression(expression);
        }
        self.write("; ");
        self.write(&counter);
        self.write(" < ");
        self.emit_iterable_reference(&array_temp, expression);
        self.write(".length; ");
        self.write(&counter);
        self.write("++) {");
        self.write_line();
        self.increase_indent();

        self.emit_for_of_binding(initializer, &array_temp, expression, &counter);

        if self.arena.kind(statement) == SyntaxKind::Block {
            let statements = self
                .arena
                .get(statement)
                .and_then(|n| self.arena.get_block(n))
                .map(|b| b.statements.nodes.clone())
                .unwrap_or_default();
            self.emit_lines(&statements);
        } else {
            self.emit_statement_with_comments(statement);
        }

        self.decrease_indent();
        self.write("}");
    }

    fn emit_iterable_reference(&mut self, array_temp: &Option<String>, expression: NodeIndex) {
        if let Some(temp) = array_temp {
            let temp = temp.clone();
            self.write(&temp);
        } else {
            self.emit_expression(expression);
        }
    }

    fn emit_for_of_binding(
        &mut self,
        initializer: NodeIndex,
        array_temp: &Option<String>,
        expression: NodeIndex,
        counter: &str,
    ) {
        let element = DestructuringValue::Indexed(
            match array_temp {
                Some(temp) => Box::new(DestructuringValue::Name(temp.clone())),
                None => Box::new(DestructuringValue::Node(expression)),
            },
            counter.to_string(),
        );

        if self.arena.kind(initializer) == SyntaxKind::VariableDeclarationList {
            let first_decl = self
                .arena
                .get(initializer)
                .and_then(|n| self.arena.get_variable(n))
                .and_then(|v| v.declarations.nodes.first().copied())
                .unwrap_or(NodeIndex::NONE);
            let Some(decl) = self
                .arena
                .get(first_decl)
                .and_then(|n| self.arena.get_variable_declaration(n))
            else {
                return;
            };
            let name = decl.name;
            if matches!(
                self.arena.kind(name),
                SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
            ) {
                self.write("var ");
                self.emit_destructuring_declaration_value(name, element);
                self.write_semicolon();
            } else {
                self.maybe_rename_block_scoped_binding(name);
                self.write("var ");
                self.emit(name);
                self.write(" = ");
                self.emit_destructuring_value(&element);
                self.write_semicolon();
            }
        } else {
            // Assignment form: `for (x of xs)` or a destructuring target.
            if matches!(
                self.arena.kind(initializer),
                SyntaxKind::ArrayLiteralExpression | SyntaxKind::ObjectLiteralExpression
            ) {
                self.emit_destructuring_assignment_from_value(initializer, element);
                self.write_semicolon();
            } else {
                self.emit_expression(initializer);
                self.write(" = ");
                self.emit_destructuring_value(&element);
                self.write_semicolon();
            }
        }
        self.write_line();
    }

    pub(super) fn emit_break_or_continue(&mut self, node: &Node, keyword: &str) {
        self.write(keyword);
        if let Some(data) = self.arena.get_labeled(node) {
            let label = data.label;
            if label.is_some() {
                self.write_space();
                self.emit(label);
            }
        }
        self.write_semicolon();
    }

    pub(super) fn emit_return_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_return(node) else {
            self.write("return;");
            return;
        };
        let expression = data.expression;
        self.write("return");
        if expression.is_some() {
            self.write_space();
            self.emit_expression(expression);
        }
        self.write_semicolon();
    }

    pub(super) fn emit_throw_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_return(node) else {
            return;
        };
        let expression = data.expression;
        self.write("throw ");
        self.emit_expression(expression);
        self.write_semicolon();
    }

    pub(super) fn emit_with_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_if_statement(node) else {
            return;
        };
        let (expression, statement) = (data.expression, data.then_statement);
        self.write("with (");
        self.emit_expression(expression);
        self.write(")");
        self.emit_embedded_statement(statement);
    }

    pub(super) fn emit_switch_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_switch(node) else {
            return;
        };
        let (expression, clauses) = (data.expression, data.clauses.nodes.clone());
        self.write("switch (");
        self.emit_expression(expression);
        self.write(") {");
        self.write_line();
        self.increase_indent();
        for &clause in &clauses {
            self.emit(clause);
        }
        self.decrease_indent();
        self.write("}");
    }

    pub(super) fn emit_case_clause(&mut self, node: &Node) {
        let Some(data) = self.arena.get_case_clause(node) else {
            return;
        };
        let (expression, statements) = (data.expression, data.statements.nodes.clone());
        if expression.is_some() {
            self.write("case ");
            self.emit_expression(expression);
            self.write(":");
        } else {
            self.write("default:");
        }
        self.write_line();
        self.increase_indent();
        self.emit_lines(&statements);
        self.decrease_indent();
    }

    pub(super) fn emit_labeled_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_labeled(node) else {
            return;
        };
        let (label, statement) = (data.label, data.statement);
        self.emit(label);
        self.write(": ");
        self.emit(statement);
    }

    pub(super) fn emit_try_statement(&mut self, node: &Node) {
        let Some(data) = self.arena.get_try(node) else {
            return;
        };
        let (try_block, catch_clause, finally_block) =
            (data.try_block, data.catch_clause, data.finally_block);
        self.write("try ");
        self.emit(try_block);
        if catch_clause.is_some() {
            self.write_space();
            self.emit(catch_clause);
        }
        if finally_block.is_some() {
            self.write(" finally ");
            self.emit(finally_block);
        }
    }

    pub(super) fn emit_catch_clause(&mut self, node: &Node) {
        let Some(data) = self.arena.get_catch_clause(node) else {
            return;
        };
        let (variable_declaration, block) = (data.variable_declaration, data.block);
        self.write("catch (");
        if let Some(decl) = self
            .arena
            .get(variable_declaration)
            .and_then(|n| self.arena.get_variable_declaration(n))
        {
            let name = decl.name;
            self.emit(name);
        }
        self.write(") ");
        self.emit(block);
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn declaration_list_keyword(&self, list_node: &Node) -> &'static str {
        if !self.options.target.supports_es2015() {
            return "var";
        }
        if list_node.has_flag(node_flags::CONST) {
            "const"
        } else if list_node.has_flag(node_flags::LET) {
            "let"
        } else {
            "var"
        }
    }

    pub(super) fn emit_variable_statement(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        let Some(statement) = self.arena.get_variable(node) else {
            return;
        };
        let Some(&list_idx) = statement.declarations.nodes.first() else {
            return;
        };

        let exported = node.has_flag(node_flags::EXPORT);
        if exported && !self.namespace_stack.is_empty() {
            self.emit_namespace_exported_variables(list_idx);
            return;
        }
        if exported && self.is_commonjs_external_module() {
            self.emit_commonjs_exported_variables(list_idx);
            return;
        }

        self.emit_es6_export_prefix(node);
        self.emit(list_idx);
        self.write_semicolon();
        let _ = idx;
    }

    pub(super) fn emit_variable_declaration_list(&mut self, node: &Node) {
        let Some(list) = self.arena.get_variable(node) else {
            return;
        };
        let declarations = list.declarations.nodes.clone();

        // Below ES6 a shadowing let/const is renamed before any of its
        // identifiers print.
        if node.has_flag(node_flags::BLOCK_SCOPED) {
            for &decl_idx in &declarations {
                if let Some(decl) = self
                    .arena
                    .get(decl_idx)
                    .and_then(|n| self.arena.get_variable_declaration(n))
                {
                    self.maybe_rename_block_scoped_binding(decl.name);
                }
            }
        }

        self.write(self.declaration_list_keyword(node));
        self.write_space();
        for (i, &decl_idx) in declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit(decl_idx);
        }
    }

    pub(super) fn emit_variable_declaration(&mut self, node: &Node, _idx: NodeIndex) {
        let Some(decl) = self.arena.get_variable_declaration(node) else {
            return;
        };
        let (name, initializer) = (decl.name, decl.initializer);

        if matches!(
            self.arena.kind(name),
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
        ) && !self.options.target.supports_es2015()
        {
            self.emit_destructuring_declaration(name, initializer);
            return;
        }

        self.emit(name);
        if initializer.is_some() {
            self.write(" = ");
            self.emit_expression(initializer);
        }
    }

    fn emit_namespace_exported_variables(&mut self, list_idx: NodeIndex) {
        let namespace = self.namespace_stack.last().cloned().unwrap_or_default();
        let declarations = self
            .arena
            .get(list_idx)
            .and_then(|n| self.arena.get_variable(n))
            .map(|l| l.declarations.nodes.clone())
            .unwrap_or_default();
        let mut emitted = false;
        for &decl_idx in &declarations {
            let Some(decl) = self
                .arena
                .get(decl_idx)
                .and_then(|n| self.arena.get_variable_declaration(n))
            else {
                continue;
            };
            let (name, initializer) = (decl.name, decl.initializer);
            if initializer.is_none() {
                continue;
            }
            if emitted {
                self.write_line();
            }
            let name_text = self.arena.identifier_text(name).to_string();
            self.write(&namespace);
            self.write(".");
            self.write(&name_text);
            self.write(" = ");
            self.emit_expression(initializer);
            self.write_semicolon();
            emitted = true;
        }
    }

    fn emit_commonjs_exported_variables(&mut self, list_idx: NodeIndex) {
        let declarations = self
            .arena
            .get(list_idx)
            .and_then(|n| self.arena.get_variable(n))
            .map(|l| l.declarations.nodes.clone())
            .unwrap_or_default();
        let mut emitted = false;
        for &decl_idx in &declarations {
            let Some(decl) = self
                .arena
                .get(decl_idx)
                .and_then(|n| self.arena.get_variable_declaration(n))
            else {
                continue;
            };
            let (name, initializer) = (decl.name, decl.initializer);
            if matches!(
                self.arena.kind(name),
                SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
            ) {
                // Destructure into locals first, then export each binding.
                if emitted {
                    self.write_line();
                }
                self.write("var ");
                self.emit_destructuring_declaration(name, initializer);
                self.write_semicolon();
                let mut names = Vec::new();
                self.collect_binding_names(name, &mut names);
                for binding in names {
                    self.write_line();
                    self.write("exports.");
                    self.write(&binding);
                    self.write(" = ");
                    self.write(&binding);
                    self.write_semicolon();
                }
                emitted = true;
                continue;
            }
            if initializer.is_none() {
                continue;
            }
            if emitted {
                self.write_line();
            }
            let name_text = self.arena.identifier_text(name).to_string();
            self.write("exports.");
            self.write(&name_text);
            self.write(" = ");
            self.emit_expression(initializer);
            self.write_semicolon();
            emitted = true;
        }
    }

    /// All identifier names bound by a name node (identifier or pattern).
    pub(crate) fn collect_binding_names(&self, name: NodeIndex, out: &mut Vec<String>) {
        match self.arena.kind(name) {
            SyntaxKind::Identifier => {
                let text = self.arena.identifier_text(name).to_string();
                if !text.is_empty() {
                    out.push(text);
                }
            }
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
                let elements = self
                    .arena
                    .get(name)
                    .and_then(|n| self.arena.get_binding_pattern(n))
                    .map(|p| p.elements.nodes.clone())
                    .unwrap_or_default();
                for element in elements {
                    if let Some(binding) = self
                        .arena
                        .get(element)
                        .and_then(|n| self.arena.get_binding_element(n))
                    {
                        self.collect_binding_names(binding.name, out);
                    }
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Binding patterns at ES6 (verbatim)
    // =========================================================================

    pub(super) fn emit_binding_pattern_verbatim(&mut self, node: &Node) {
        let Some(pattern) = self.arena.get_binding_pattern(node) else {
            return;
        };
        let elements = pattern.elements.nodes.clone();
        let (open, close) = if node.kind == SyntaxKind::ObjectBindingPattern {
            ("{ ", " }")
        } else {
            ("[", "]")
        };
        self.write(open);
        self.emit_comma_separated(&elements);
        self.write(close);
    }

    pub(super) fn emit_binding_element_verbatim(&mut self, node: &Node) {
        let Some(element) = self.arena.get_binding_element(node) else {
            return;
        };
        let (property_name, name, initializer) =
            (element.property_name, element.name, element.initializer);
        if node.has_flag(node_flags::REST) {
            self.write("...");
        }
        if property_name.is_some() {
            self.emit(property_name);
            self.write(": ");
        }
        self.emit(name);
        if initializer.is_some() {
            self.write(" = ");
            self.emit_expression(initializer);
        }
    }
}
