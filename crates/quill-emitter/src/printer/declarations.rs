use quill_ast::node::node_flags;
use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Enums
    // =========================================================================

    pub(super) fn emit_enum_declaration(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        // Const enum bodies are erased unless preserved; their members were
        // inlined at use sites from resolver constant values.
        if node.has_flag(node_flags::CONST_ENUM)
            && !self.options.preserve_const_enums
            && !self.options.separate_compilation
        {
            return;
        }
        let Some(enum_data) = self.arena.get_enum(node) else {
            return;
        };
        let (name, members) = (enum_data.name, enum_data.members.nodes.clone());
        let name_text = self.arena.identifier_text(name).to_string();
        let enclosing_namespace = self.namespace_stack.last().cloned();
        let exported = node.has_flag(node_flags::EXPORT);

        self.emit_es6_export_prefix(node);
        self.write("var ");
        self.write(&name_text);
        self.write_semicolon();
        self.write_line();

        self.record_scope_name_start(&name_text);
        self.write("(function (");
        self.write(&name_text);
        self.write(") {");
        self.write_line();
        self.increase_indent();

        let mut auto_value = 0i64;
        for &member_idx in &members {
            let Some(member) = self
                .arena
                .get(member_idx)
                .and_then(|n| self.arena.get_enum_member(n))
            else {
                continue;
            };
            let (member_name, initializer) = (member.name, member.initializer);
            let member_text = self.declaration_name_text(member_name);

            self.write(&name_text);
            self.write("[");
            self.write(&name_text);
            self.write("[\"");
            self.write(&member_text);
            self.write("\"] = ");
            if let Some(value) = self.resolver.get_constant_value(member_idx) {
                self.write(&format_enum_value(value));
                auto_value = value as i64 + 1;
            } else if initializer.is_some() {
                self.emit_expression(initializer);
                // Literal initializers keep the auto-numbering in step even
                // without resolver constants.
                if let Some(value) = self
                    .arena
                    .get(initializer)
                    .filter(|n| n.kind == SyntaxKind::NumericLiteral)
                    .and_then(|n| self.arena.get_literal(n))
                    .and_then(|l| l.text.parse::<f64>().ok())
                {
                    auto_value = value as i64 + 1;
                }
            } else {
                self.write(&auto_value.to_string());
                auto_value += 1;
            }
            self.write("] = \"");
            self.write(&member_text);
            self.write("\";");
            self.write_line();
        }

        self.decrease_indent();
        self.write("})(");
        if exported {
            if let Some(namespace) = &enclosing_namespace {
                let namespace = namespace.clone();
                self.write(&name_text);
                self.write(" = ");
                self.write(&namespace);
                self.write(".");
                self.write(&name_text);
                self.write(" || (");
                self.write(&namespace);
                self.write(".");
                self.write(&name_text);
                self.write(" = {})");
                self.write(");");
                self.record_scope_name_end();
                self.emit_commonjs_export_if_needed(idx, &name_text);
                return;
            }
        }
        self.write(&name_text);
        self.write(" || (");
        self.write(&name_text);
        self.write(" = {}));");
        self.record_scope_name_end();
        self.emit_commonjs_export_if_needed(idx, &name_text);
    }

    // =========================================================================
    // Namespaces (internal modules)
    // =========================================================================

    /// A namespace whose body holds only types never reaches the runtime.
    fn is_instantiated_module(&self, body: NodeIndex) -> bool {
        match self.arena.kind(body) {
            SyntaxKind::ModuleBlock => {
                let statements = self
                    .arena
                    .get(body)
                    .and_then(|n| self.arena.get_block(n))
                    .map(|b| b.statements.nodes.clone())
                    .unwrap_or_default();
                statements.iter().any(|&stmt| match self.arena.kind(stmt) {
                    SyntaxKind::InterfaceDeclaration | SyntaxKind::TypeAliasDeclaration => false,
                    SyntaxKind::ModuleDeclaration => {
                        let inner = self
                            .arena
                            .get(stmt)
                            .and_then(|n| self.arena.get_module(n))
                            .map_or(NodeIndex::NONE, |m| m.body);
                        self.is_instantiated_module(inner)
                    }
                    _ => true,
                })
            }
            SyntaxKind::ModuleDeclaration => {
                let inner = self
                    .arena
                    .get(body)
                    .and_then(|n| self.arena.get_module(n))
                    .map_or(NodeIndex::NONE, |m| m.body);
                self.is_instantiated_module(inner)
            }
            _ => false,
        }
    }

    pub(super) fn emit_module_declaration(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        let Some(module) = self.arena.get_module(node) else {
            return;
        };
        let (name, body) = (module.name, module.body);
        if !self.is_instantiated_module(body) {
            return;
        }

        let name_text = self.generate_name_for_node(idx);
        let enclosing_namespace = self.namespace_stack.last().cloned();
        let exported = node.has_flag(node_flags::EXPORT);
        tracing::debug!(namespace = %name_text, "emitting namespace IIFE");

        self.emit_es6_export_prefix(node);
        self.write("var ");
        self.write(&name_text);
        self.write_semicolon();
        self.write_line();

        self.record_scope_name_start(&name_text);
        self.write("(function (");
        self.write(&name_text);
        self.write(") {");
        self.write_line();
        self.increase_indent();

        self.namespace_stack.push(name_text.clone());
        match self.arena.kind(body) {
            SyntaxKind::ModuleBlock => {
                let statements = self
                    .arena
                    .get(body)
                    .and_then(|n| self.arena.get_block(n))
                    .map(|b| b.statements.nodes.clone())
                    .unwrap_or_default();
                self.emit_lines(&statements);
            }
            // Dotted names parse as nested declarations.
            SyntaxKind::ModuleDeclaration => {
                self.emit_statement_with_comments(body);
            }
            _ => {}
        }
        self.namespace_stack.pop();

        self.emit_temp_declarations();
        self.decrease_indent();
        self.write("})(");
        if exported && enclosing_namespace.is_some() {
            let namespace = enclosing_namespace.clone().unwrap_or_default();
            self.write(&name_text);
            self.write(" = ");
            self.write(&namespace);
            self.write(".");
            self.write(&name_text);
            self.write(" || (");
            self.write(&namespace);
            self.write(".");
            self.write(&name_text);
            self.write(" = {})");
        } else {
            self.write(&name_text);
            self.write(" || (");
            self.write(&name_text);
            self.write(" = {})");
        }
        self.write(");");
        self.record_scope_name_end();
        let _ = name;

        self.emit_commonjs_export_if_needed(idx, &name_text);
    }

    // =========================================================================
    // Import-equals declarations
    // =========================================================================

    pub(super) fn emit_import_equals_declaration(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        if !self.resolver.is_referenced_alias_declaration(idx) {
            return;
        }
        let Some(import) = self.arena.get_import_equals(node) else {
            return;
        };
        let (name, module_reference) = (import.name, import.module_reference);
        let name_text = self.arena.identifier_text(name).to_string();

        self.write("var ");
        self.write(&name_text);
        self.write(" = ");
        if self.arena.kind(module_reference) == SyntaxKind::ExternalModuleReference {
            let specifier = self
                .arena
                .get(module_reference)
                .and_then(|n| self.arena.get_wrapped_expr(n))
                .map_or(NodeIndex::NONE, |w| w.expression);
            self.write("require(");
            self.emit_expression(specifier);
            self.write(")");
        } else {
            self.emit(module_reference);
        }
        self.write_semicolon();

        self.emit_export_assignments_for_declaration(idx, &name_text);
    }
}

fn format_enum_value(value: f64) -> String {
    if value == value.trunc() && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
