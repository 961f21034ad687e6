use quill_ast::node::node_flags;
use quill_ast::{Node, NodeIndex, SyntaxKind};

use quill_common::diagnostics::codes;

use super::destructuring::DestructuringValue;
use super::{temp_flags, Printer};

/// Parameter lowerings accumulated while the signature prints, replayed as
/// the body prologue.
#[derive(Default)]
pub(super) struct ParamPrologue {
    defaults: Vec<(NodeIndex, NodeIndex)>,
    patterns: Vec<(NodeIndex, String)>,
    rest: Option<(NodeIndex, usize)>,
}

/// Constructor-only insertions: parameter-property assignments and instance
/// property initializers go after the initial `super(...)` call and before
/// the user body.
#[derive(Default)]
pub(super) struct CtorContext {
    pub param_property_names: Vec<String>,
    pub instance_initializers: Vec<NodeIndex>,
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Functions
    // =========================================================================

    pub(super) fn emit_function_declaration(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        let Some(func) = self.arena.get_function(node) else {
            return;
        };
        let (name, body) = (func.name, func.body);

        if body.is_none() {
            // Overload signatures emit nothing; a missing implementation is
            // the checker's to flag, but the gap is still recorded here.
            self.error_on_node(
                node,
                codes::FUNCTION_IMPLEMENTATION_MISSING,
                "Function implementation is missing or not immediately following the declaration.",
            );
            return;
        }

        let name_text = if name.is_some() {
            self.arena.identifier_text(name).to_string()
        } else {
            self.generate_name_for_node(idx)
        };

        self.emit_es6_export_prefix(node);
        self.write("function ");
        self.write(&name_text);
        self.emit_signature_and_body(idx, Some(&name_text), false, None);
        self.emit_export_assignments_for_declaration(idx, &name_text);
    }

    pub(super) fn emit_function_expression(&mut self, node: &Node, idx: NodeIndex) {
        let Some(func) = self.arena.get_function(node) else {
            return;
        };
        let name = func.name;
        self.write("function ");
        let scope_name;
        if name.is_some() {
            let text = self.arena.identifier_text(name).to_string();
            self.write(&text);
            scope_name = Some(text);
        } else {
            scope_name = None;
        }
        self.emit_signature_and_body(idx, scope_name.as_deref(), false, None);
    }

    pub(super) fn emit_arrow_function(&mut self, node: &Node, idx: NodeIndex) {
        let Some(func) = self.arena.get_function(node) else {
            return;
        };
        let (parameters, body) = (func.parameters.nodes.clone(), func.body);

        if !self.options.target.supports_es2015() {
            // Arrow-to-function conversion. `this` inside the converted body
            // reads the captured `_this` of the enclosing function.
            let prev = self.this_substitution.clone();
            let lexical_this = self.resolver.get_node_check_flags(idx)
                & crate::resolver::check_flags::LEXICAL_THIS
                != 0;
            if lexical_this || prev.is_none() {
                self.this_substitution = Some("_this".to_string());
            }
            self.write("function ");
            self.emit_signature_and_body(idx, None, true, None);
            self.this_substitution = prev;
            return;
        }

        if parameters.len() == 1
            && self.is_simple_parameter(parameters[0])
        {
            self.emit_parameter_name_only(parameters[0]);
        } else {
            self.write("(");
            self.emit_parameters_es6(&parameters);
            self.write(")");
        }
        self.write(" => ");
        if self.arena.kind(body) == SyntaxKind::Block {
            self.emit(body);
        } else {
            self.emit_expression(body);
        }
    }

    fn is_simple_parameter(&self, param_idx: NodeIndex) -> bool {
        let Some(param) = self
            .arena
            .get(param_idx)
            .and_then(|n| self.arena.get_parameter(n))
        else {
            return false;
        };
        param.initializer.is_none()
            && !self.arena.has_flag(param_idx, node_flags::REST)
            && self.arena.kind(param.name) == SyntaxKind::Identifier
    }

    fn emit_parameter_name_only(&mut self, param_idx: NodeIndex) {
        if let Some(param) = self
            .arena
            .get(param_idx)
            .and_then(|n| self.arena.get_parameter(n))
        {
            let name = param.name;
            self.emit(name);
        }
    }

    pub(super) fn emit_parameter(&mut self, node: &Node) {
        let Some(param) = self.arena.get_parameter(node) else {
            return;
        };
        let (name, initializer) = (param.name, param.initializer);
        if node.has_flag(node_flags::REST) {
            self.write("...");
        }
        self.emit(name);
        if initializer.is_some() && self.options.target.supports_es2015() {
            self.write(" = ");
            self.emit_expression(initializer);
        }
    }

    fn emit_parameters_es6(&mut self, parameters: &[NodeIndex]) {
        self.emit_comma_separated(parameters);
    }

    /// Print the parameter list, collecting the lowerings the body prologue
    /// must replay. Below ES6: defaults move into `if (x === void 0)`
    /// checks, rest parameters leave the list, destructuring parameters are
    /// replaced by a temporary.
    fn emit_parameter_list(&mut self, parameters: &[NodeIndex]) -> ParamPrologue {
        let mut prologue = ParamPrologue::default();
        let lowering = !self.options.target.supports_es2015();
        let mut first = true;
        for (index, &param_idx) in parameters.iter().enumerate() {
            let Some(param) = self
                .arena
                .get(param_idx)
                .and_then(|n| self.arena.get_parameter(n))
            else {
                continue;
            };
            let (name, initializer) = (param.name, param.initializer);
            let is_rest = self.arena.has_flag(param_idx, node_flags::REST);
            let is_pattern = matches!(
                self.arena.kind(name),
                SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
            );

            if lowering && is_rest {
                prologue.rest = Some((name, index));
                continue;
            }

            if !first {
                self.write(", ");
            }
            first = false;

            if !lowering {
                self.emit(param_idx);
                continue;
            }

            if is_pattern {
                let temp = self.make_temp_variable_name(temp_flags::AUTO);
                self.temp_parameters.push(temp.clone());
                prologue.patterns.push((name, temp.clone()));
                self.write(&temp);
            } else {
                self.emit(name);
            }
            if initializer.is_some() {
                prologue.defaults.push((name, initializer));
            }
        }
        prologue
    }

    fn emit_param_prologue(&mut self, prologue: &ParamPrologue) {
        for &(name, initializer) in &prologue.defaults {
            self.write("if (");
            self.emit(name);
            self.write(" === void 0) { ");
            self.emit(name);
            self.write(" = ");
            self.emit_expression(initializer);
            self.write("; }");
            self.write_line();
        }
        for (pattern, temp) in &prologue.patterns {
            let (pattern, temp) = (*pattern, temp.clone());
            self.write("var ");
            self.emit_destructuring_declaration_value(
                pattern,
                DestructuringValue::Name(temp),
            );
            self.write_semicolon();
            self.write_line();
        }
        if let Some((name, index)) = prologue.rest {
            let counter = self.make_temp_variable_name(temp_flags::UNDERSCORE_I);
            self.write("var ");
            self.emit(name);
            self.write(" = [];");
            self.write_line();
            self.write("for (var ");
            self.write(&counter);
            self.write(" = ");
            self.write(&index.to_string());
            self.write("; ");
            self.write(&counter);
            self.write(" < arguments.length; ");
            self.write(&counter);
            self.write("++) {");
            self.write_line();
            self.increase_indent();
            self.emit(name);
            self.write("[");
            self.write(&counter);
            if index > 0 {
                self.write(" - ");
                self.write(&index.to_string());
            }
            self.write("] = arguments[");
            self.write(&counter);
            self.write("];");
            self.write_line();
            self.decrease_indent();
            self.write("}");
            self.write_line();
        }
    }

    /// Parameter list plus body, inside a fresh lexical environment frame.
    /// Handles `_this` capture, parameter prologues, constructor insertions,
    /// and the temporary flush at body exit.
    pub(super) fn emit_signature_and_body(
        &mut self,
        func_idx: NodeIndex,
        scope_name: Option<&str>,
        lowered_arrow: bool,
        ctor: Option<&CtorContext>,
    ) {
        let Some(func) = self
            .arena
            .get(func_idx)
            .and_then(|n| self.arena.get_function(n))
        else {
            return;
        };
        let (parameters, body) = (func.parameters.nodes.clone(), func.body);

        let saved = self.save_temp_state();
        let prev_this = if lowered_arrow {
            None
        } else {
            self.this_substitution.take()
        };
        if let Some(name) = scope_name {
            self.record_scope_name_start(name);
        }

        self.write("(");
        let prologue = self.emit_parameter_list(&parameters);
        self.write(") ");

        self.write("{");
        self.write_line();
        self.increase_indent();

        let captures_this = self.resolver.get_node_check_flags(func_idx)
            & crate::resolver::check_flags::CAPTURE_THIS
            != 0;
        if captures_this {
            self.write("var _this = this;");
            self.write_line();
        }

        self.emit_param_prologue(&prologue);

        if let Some(ctor) = ctor {
            self.emit_constructor_statements(body, ctor);
        } else if self.arena.kind(body) == SyntaxKind::Block {
            let statements = self
                .arena
                .get(body)
                .and_then(|n| self.arena.get_block(n))
                .map(|b| b.statements.nodes.clone())
                .unwrap_or_default();
            self.emit_lines(&statements);
        } else if body.is_some() {
            // Concise arrow body: the expression becomes the return value.
            self.write("return ");
            self.emit_expression(body);
            self.write_semicolon();
            self.write_line();
        }

        self.emit_temp_declarations();
        self.decrease_indent();
        self.write("}");

        if scope_name.is_some() {
            self.record_scope_name_end();
        }
        if !lowered_arrow {
            self.this_substitution = prev_this;
        }
        self.restore_temp_state(saved);
    }

    /// Constructor bodies interleave three sources: an initial `super(...)`
    /// call (stays first), parameter-property assignments, instance property
    /// initializers, then the rest of the user body.
    fn emit_constructor_statements(&mut self, body: NodeIndex, ctor: &CtorContext) {
        let statements = if self.arena.kind(body) == SyntaxKind::Block {
            self.arena
                .get(body)
                .and_then(|n| self.arena.get_block(n))
                .map(|b| b.statements.nodes.clone())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut rest_start = 0;
        if let Some(&first) = statements.first() {
            if self.is_super_call_statement(first) {
                self.emit_statement_with_comments(first);
                rest_start = 1;
            }
        }

        for name in &ctor.param_property_names.clone() {
            self.write("this.");
            self.write(name);
            self.write(" = ");
            self.write(name);
            self.write_semicolon();
            self.write_line();
        }

        for &prop_idx in &ctor.instance_initializers.clone() {
            self.emit_instance_property_initializer(prop_idx);
        }

        self.emit_lines(&statements[rest_start..]);
    }

    pub(super) fn is_super_call_statement(&self, stmt: NodeIndex) -> bool {
        let Some(stmt_node) = self.arena.get(stmt) else {
            return false;
        };
        if stmt_node.kind != SyntaxKind::ExpressionStatement {
            return false;
        }
        let Some(wrapped) = self.arena.get_wrapped_expr(stmt_node) else {
            return false;
        };
        let Some(call_node) = self.arena.get(wrapped.expression) else {
            return false;
        };
        call_node.kind == SyntaxKind::CallExpression
            && self
                .arena
                .get_call_expr(call_node)
                .is_some_and(|c| self.arena.kind(c.expression) == SyntaxKind::SuperKeyword)
    }

    pub(super) fn emit_instance_property_initializer(&mut self, prop_idx: NodeIndex) {
        let Some(prop) = self
            .arena
            .get(prop_idx)
            .and_then(|n| self.arena.get_property_decl(n))
        else {
            return;
        };
        let (name, initializer) = (prop.name, prop.initializer);
        if initializer.is_none() {
            return;
        }
        self.write("this");
        if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
            self.emit(name);
        } else {
            self.write(".");
            let text = self.declaration_name_text(name);
            self.write(&text);
        }
        self.write(" = ");
        self.emit_expression(initializer);
        self.write_semicolon();
        self.write_line();
    }
}
