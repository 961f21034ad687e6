use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};
use quill_common::ModuleKind;

use crate::helpers::{
    HelperNeeds, DECORATE_HELPER, EXPORT_STAR_HELPER, EXTENDS_HELPER, METADATA_HELPER,
    PARAM_HELPER,
};

use super::module_emission::collect_external_module_info;
use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Source files and module envelopes
    // =========================================================================

    pub(super) fn emit_source_file_node(&mut self, idx: NodeIndex) {
        let Some(file) = self.arena.get(idx).and_then(|n| self.arena.get_source_file(n)) else {
            return;
        };
        let statements = file.statements.nodes.clone();
        let file_name = file.file_name.clone();
        let is_external = file.is_external_module;

        self.current_source_file = idx;
        self.source_text = Some(file.text.as_str());
        self.line_starts = Some(file.line_starts.as_slice());
        self.detached_comment_end = None;
        self.source_file_count += 1;
        if let Some(map) = self.source_map.as_mut() {
            map.add_source(&file_name);
        }
        tracing::debug!(file = %file_name, external = is_external, "emitting source file");

        self.emit_detached_comments(0);

        let mut needs = HelperNeeds::scan(self.arena, idx, self.options);
        let envelope = if is_external {
            self.options.module
        } else {
            ModuleKind::None
        };

        match envelope {
            ModuleKind::CommonJS => {
                let info = collect_external_module_info(self.arena, &statements);
                needs.export_star = info.has_export_stars;
                self.module_info = Some(info);
                self.emit_helpers(&needs);
                self.emit_lines(&statements);
                self.emit_export_equals_tail();
                self.module_info = None;
            }
            ModuleKind::AMD => self.emit_amd_wrapper(idx, &statements, &needs),
            ModuleKind::UMD => self.emit_umd_wrapper(idx, &statements, &needs),
            ModuleKind::System => self.emit_system_wrapper(idx, &statements, &needs),
            _ => {
                // Script files and ES2015 modules: no envelope.
                if is_external {
                    let info = collect_external_module_info(self.arena, &statements);
                    self.module_info = Some(info);
                }
                self.emit_helpers(&needs);
                self.emit_lines(&statements);
                self.module_info = None;
            }
        }

        self.emit_temp_declarations();
    }

    pub(super) fn emit_helpers(&mut self, needs: &HelperNeeds) {
        if needs.extends {
            self.emit_helper_text(EXTENDS_HELPER);
        }
        if needs.decorate {
            self.emit_helper_text(DECORATE_HELPER);
        }
        if needs.metadata {
            self.emit_helper_text(METADATA_HELPER);
        }
        if needs.param {
            self.emit_helper_text(PARAM_HELPER);
        }
        if needs.export_star {
            self.emit_helper_text(EXPORT_STAR_HELPER);
        }
    }

    fn emit_helper_text(&mut self, text: &str) {
        for line in text.lines() {
            self.write(line);
            self.write_line();
        }
    }

    /// Module names and factory-parameter names for an envelope's
    /// dependency list, in first-mention order.
    fn collect_dependencies(&mut self, statements: &[NodeIndex]) -> Vec<(String, String)> {
        let info = collect_external_module_info(self.arena, statements);
        let mut deps = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        for &import_idx in &info.external_imports {
            let specifier = match self.arena.kind(import_idx) {
                SyntaxKind::ImportDeclaration => self
                    .arena
                    .get(import_idx)
                    .and_then(|n| self.arena.get_import_decl(n))
                    .map_or(NodeIndex::NONE, |i| i.module_specifier),
                SyntaxKind::ExportDeclaration => self
                    .arena
                    .get(import_idx)
                    .and_then(|n| self.arena.get_export_decl(n))
                    .map_or(NodeIndex::NONE, |e| e.module_specifier),
                SyntaxKind::ImportEqualsDeclaration => self
                    .arena
                    .get(import_idx)
                    .and_then(|n| self.arena.get_import_equals(n))
                    .and_then(|i| {
                        self.arena
                            .get(i.module_reference)
                            .and_then(|n| self.arena.get_wrapped_expr(n))
                    })
                    .map_or(NodeIndex::NONE, |w| w.expression),
                _ => NodeIndex::NONE,
            };
            let path = self.arena.literal_text(specifier).to_string();
            if path.is_empty() || !seen.insert(path.clone()) {
                continue;
            }
            let local = if self.arena.kind(import_idx) == SyntaxKind::ImportDeclaration {
                self.import_local_name(import_idx)
            } else {
                self.generate_name_for_node(import_idx)
            };
            deps.push((path, local));
        }
        self.module_info = Some(info);
        deps
    }

    pub(super) fn emit_amd_wrapper(
        &mut self,
        _idx: NodeIndex,
        statements: &[NodeIndex],
        needs: &HelperNeeds,
    ) {
        let deps = self.collect_dependencies(statements);
        let mut needs = *needs;
        needs.export_star = self
            .module_info
            .as_ref()
            .is_some_and(|i| i.has_export_stars);

        self.write("define([\"require\", \"exports\"");
        for (path, _) in &deps {
            self.write(", \"");
            self.write(path);
            self.write("\"");
        }
        self.write("], function (require, exports");
        for (_, local) in &deps {
            self.write(", ");
            self.write(local);
        }
        self.write(") {");
        self.write_line();
        self.increase_indent();

        self.emit_wrapped_module_body(statements, &needs, ModuleKind::AMD);

        self.decrease_indent();
        self.write("});");
    }

    pub(super) fn emit_umd_wrapper(
        &mut self,
        _idx: NodeIndex,
        statements: &[NodeIndex],
        needs: &HelperNeeds,
    ) {
        let mut needs = *needs;
        self.write("(function (factory) {");
        self.write_line();
        self.increase_indent();
        self.write("if (typeof module === \"object\" && typeof module.exports === \"object\") {");
        self.write_line();
        self.increase_indent();
        self.write("var v = factory(require, exports);");
        self.write_line();
        self.write("if (v !== undefined) module.exports = v;");
        self.write_line();
        self.decrease_indent();
        self.write("}");
        self.write_line();
        self.write("else if (typeof define === \"function\" && define.amd) {");
        self.write_line();
        self.increase_indent();
        self.write("define([\"require\", \"exports\"], factory);");
        self.write_line();
        self.decrease_indent();
        self.write("}");
        self.write_line();
        self.decrease_indent();
        self.write("})(function (require, exports) {");
        self.write_line();
        self.increase_indent();

        let info = collect_external_module_info(self.arena, statements);
        needs.export_star = info.has_export_stars;
        self.module_info = Some(info);
        self.emit_wrapped_module_body(statements, &needs, ModuleKind::UMD);

        self.decrease_indent();
        self.write("});");
    }

    /// The body of an AMD/UMD envelope is CommonJS emission with the actual
    /// kind remembered for `export =`.
    fn emit_wrapped_module_body(
        &mut self,
        statements: &[NodeIndex],
        needs: &HelperNeeds,
        actual_kind: ModuleKind,
    ) {
        let prev_kind = self.module_kind;
        let prev_original = self.original_module_kind;
        self.original_module_kind = Some(actual_kind);
        self.module_kind = ModuleKind::CommonJS;

        self.emit_helpers(needs);
        self.emit_lines(statements);
        self.emit_export_equals_tail();
        self.emit_temp_declarations();

        self.module_kind = prev_kind;
        self.original_module_kind = prev_original;
        self.module_info = None;
    }

    // =========================================================================
    // System.register
    // =========================================================================

    pub(super) fn emit_system_wrapper(
        &mut self,
        _idx: NodeIndex,
        statements: &[NodeIndex],
        needs: &HelperNeeds,
    ) {
        let deps = self.collect_dependencies(statements);
        let exports_name = format!("exports_{}", self.source_file_count);

        self.write("System.register([");
        for (i, (path, _)) in deps.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write("\"");
            self.write(path);
            self.write("\"");
        }
        self.write("], function (");
        self.write(&exports_name);
        self.write(") {");
        self.write_line();
        self.increase_indent();

        self.emit_helpers(needs);

        // Hoisted prologue: imported bindings and top-level var names become
        // registrar-local variables; function declarations hoist whole.
        let hoisted = self.collect_system_hoisted_names(statements);
        if !hoisted.is_empty() {
            self.write("var ");
            self.write(&hoisted.join(", "));
            self.write_semicolon();
            self.write_line();
        }
        for &stmt in statements {
            if self.arena.kind(stmt) == SyntaxKind::FunctionDeclaration {
                self.emit_system_hoisted_function(stmt);
            }
        }

        self.write("return {");
        self.write_line();
        self.increase_indent();

        self.write("setters: [");
        self.write_line();
        self.increase_indent();
        let setter_imports: Vec<NodeIndex> = self
            .module_info
            .as_ref()
            .map(|info| info.external_imports.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|&i| self.arena.kind(i) == SyntaxKind::ImportDeclaration)
            .collect();
        for (i, &import_idx) in setter_imports.iter().enumerate() {
            if i > 0 {
                self.write(",");
                self.write_line();
            }
            self.emit_system_setter(import_idx);
        }
        self.write_line();
        self.decrease_indent();
        self.write("],");
        self.write_line();

        self.write("execute: function () {");
        self.write_line();
        self.increase_indent();
        self.emit_system_execute_body(statements, &exports_name);
        self.decrease_indent();
        self.write("}");
        self.write_line();
        self.decrease_indent();
        self.write("};");
        self.write_line();
        self.decrease_indent();
        self.write("});");

        self.module_info = None;
    }

    fn collect_system_hoisted_names(&self, statements: &[NodeIndex]) -> Vec<String> {
        let mut names = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        for &stmt in statements {
            match self.arena.kind(stmt) {
                SyntaxKind::VariableStatement => {
                    let lists = self
                        .arena
                        .get(stmt)
                        .and_then(|n| self.arena.get_variable(n))
                        .map(|v| v.declarations.nodes.clone())
                        .unwrap_or_default();
                    for list in lists {
                        let decls = self
                            .arena
                            .get(list)
                            .and_then(|n| self.arena.get_variable(n))
                            .map(|v| v.declarations.nodes.clone())
                            .unwrap_or_default();
                        for decl in decls {
                            if let Some(data) = self
                                .arena
                                .get(decl)
                                .and_then(|n| self.arena.get_variable_declaration(n))
                            {
                                let mut binding_names = Vec::new();
                                self.collect_binding_names(data.name, &mut binding_names);
                                for name in binding_names {
                                    if seen.insert(name.clone()) {
                                        names.push(name);
                                    }
                                }
                            }
                        }
                    }
                }
                SyntaxKind::ImportDeclaration => {
                    for name in self.import_binding_names(stmt) {
                        if seen.insert(name.clone()) {
                            names.push(name);
                        }
                    }
                }
                _ => {}
            }
        }
        names
    }

    fn import_binding_names(&self, import_idx: NodeIndex) -> Vec<String> {
        let mut names = Vec::new();
        let Some(import) = self
            .arena
            .get(import_idx)
            .and_then(|n| self.arena.get_import_decl(n))
        else {
            return names;
        };
        let Some(clause) = self
            .arena
            .get(import.import_clause)
            .and_then(|n| self.arena.get_import_clause(n))
        else {
            return names;
        };
        if clause.name.is_some() {
            names.push(self.arena.identifier_text(clause.name).to_string());
        }
        match self.arena.kind(clause.named_bindings) {
            SyntaxKind::NamespaceImport => {
                if let Some(data) = self
                    .arena
                    .get(clause.named_bindings)
                    .and_then(|n| self.arena.get_name_data(n))
                {
                    names.push(self.arena.identifier_text(data.name).to_string());
                }
            }
            SyntaxKind::NamedImports => {
                let elements = self
                    .arena
                    .get(clause.named_bindings)
                    .and_then(|n| self.arena.get_named_bindings(n))
                    .map(|b| b.elements.nodes.clone())
                    .unwrap_or_default();
                for spec_idx in elements {
                    if let Some(spec) = self
                        .arena
                        .get(spec_idx)
                        .and_then(|n| self.arena.get_specifier(n))
                    {
                        names.push(self.arena.identifier_text(spec.name).to_string());
                    }
                }
            }
            _ => {}
        }
        names.retain(|n| !n.is_empty());
        names
    }

    /// One setter per external import: the loader hands over the module
    /// object and the setter copies each imported binding into its hoisted
    /// local.
    fn emit_system_setter(&mut self, import_idx: NodeIndex) {
        let param = self.import_local_name(import_idx);
        self.write("function (");
        self.write(&param);
        self.write(") {");
        self.write_line();
        self.increase_indent();

        let Some(import) = self
            .arena
            .get(import_idx)
            .and_then(|n| self.arena.get_import_decl(n))
        else {
            self.decrease_indent();
            self.write("}");
            return;
        };
        let clause_idx = import.import_clause;
        if let Some(clause) = self
            .arena
            .get(clause_idx)
            .and_then(|n| self.arena.get_import_clause(n))
        {
            let (default_name, named_bindings) = (clause.name, clause.named_bindings);
            if default_name.is_some() {
                let local = self.arena.identifier_text(default_name).to_string();
                self.write(&local);
                self.write(" = ");
                self.write(&param);
                self.write(".default;");
                self.write_line();
            }
            match self.arena.kind(named_bindings) {
                SyntaxKind::NamespaceImport => {
                    let name = self
                        .arena
                        .get(named_bindings)
                        .and_then(|n| self.arena.get_name_data(n))
                        .map_or(NodeIndex::NONE, |d| d.name);
                    let local = self.arena.identifier_text(name).to_string();
                    self.write(&local);
                    self.write(" = ");
                    self.write(&param);
                    self.write_semicolon();
                    self.write_line();
                }
                SyntaxKind::NamedImports => {
                    let elements = self
                        .arena
                        .get(named_bindings)
                        .and_then(|n| self.arena.get_named_bindings(n))
                        .map(|b| b.elements.nodes.clone())
                        .unwrap_or_default();
                    for spec_idx in elements {
                        let Some(spec) = self
                            .arena
                            .get(spec_idx)
                            .and_then(|n| self.arena.get_specifier(n))
                        else {
                            continue;
                        };
                        let (property_name, name) = (spec.property_name, spec.name);
                        let local = self.arena.identifier_text(name).to_string();
                        let property = if property_name.is_some() {
                            self.arena.identifier_text(property_name).to_string()
                        } else {
                            local.clone()
                        };
                        self.write(&local);
                        self.write(" = ");
                        self.write(&param);
                        self.write(".");
                        self.write(&property);
                        self.write_semicolon();
                        self.write_line();
                    }
                }
                _ => {}
            }
        }

        self.decrease_indent();
        self.write("}");
    }

    fn emit_system_hoisted_function(&mut self, stmt: NodeIndex) {
        let Some(node) = self.arena.get(stmt) else {
            return;
        };
        let node = *node;
        self.emit_function_declaration_plain(&node, stmt);
        self.write_line();
    }

    /// Function emission without export-assignment tails; System handles
    /// exports in the execute prologue.
    fn emit_function_declaration_plain(&mut self, node: &quill_ast::Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        let Some(func) = self.arena.get_function(node) else {
            return;
        };
        let (name, body) = (func.name, func.body);
        if body.is_none() {
            return;
        }
        let name_text = self.arena.identifier_text(name).to_string();
        self.write("function ");
        self.write(&name_text);
        self.emit_signature_and_body(idx, Some(&name_text), false, None);
    }

    /// Execute body: assignments for hoisted vars (wrapping exported ones in
    /// `exports_N("x", x = …)`), exported-function registrations, and every
    /// remaining statement in CommonJS mode.
    fn emit_system_execute_body(&mut self, statements: &[NodeIndex], exports_name: &str) {
        let prev_kind = self.module_kind;
        let prev_original = self.original_module_kind;
        self.original_module_kind = Some(ModuleKind::System);
        self.module_kind = ModuleKind::CommonJS;
        self.system_exports_name = Some(exports_name.to_string());

        let exported_names = self
            .module_info
            .as_ref()
            .map(|info| info.exported_names.clone())
            .unwrap_or_default();

        for &stmt in statements {
            let Some(node) = self.arena.get(stmt) else {
                continue;
            };
            let node = *node;
            match node.kind {
                SyntaxKind::ImportDeclaration
                | SyntaxKind::ImportEqualsDeclaration
                | SyntaxKind::ExportDeclaration => {}
                SyntaxKind::FunctionDeclaration => {
                    if node.has_flag(node_flags::EXPORT) {
                        let name = self
                            .arena
                            .get_function(&node)
                            .map(|f| self.arena.identifier_text(f.name).to_string())
                            .unwrap_or_default();
                        self.write(exports_name);
                        self.write("(\"");
                        self.write(&name);
                        self.write("\", ");
                        self.write(&name);
                        self.write(");");
                        self.write_line();
                    }
                }
                SyntaxKind::VariableStatement => {
                    self.emit_system_variable_initializers(&node, exports_name, &exported_names);
                }
                SyntaxKind::ExpressionStatement => {
                    self.emit_system_expression_statement(
                        &node,
                        stmt,
                        exports_name,
                        &exported_names,
                    );
                }
                _ => {
                    self.emit_statement_with_comments(stmt);
                }
            }
        }
        self.emit_temp_declarations();

        self.system_exports_name = None;
        self.module_kind = prev_kind;
        self.original_module_kind = prev_original;
    }

    fn emit_system_variable_initializers(
        &mut self,
        node: &quill_ast::Node,
        exports_name: &str,
        exported_names: &rustc_hash::FxHashSet<String>,
    ) {
        let is_export = node.has_flag(node_flags::EXPORT);
        let lists = self
            .arena
            .get_variable(node)
            .map(|v| v.declarations.nodes.clone())
            .unwrap_or_default();
        for list in lists {
            let decls = self
                .arena
                .get(list)
                .and_then(|n| self.arena.get_variable(n))
                .map(|v| v.declarations.nodes.clone())
                .unwrap_or_default();
            for decl in decls {
                let Some(data) = self
                    .arena
                    .get(decl)
                    .and_then(|n| self.arena.get_variable_declaration(n))
                else {
                    continue;
                };
                let (name, initializer) = (data.name, data.initializer);
                if initializer.is_none() {
                    continue;
                }
                let name_text = self.arena.identifier_text(name).to_string();
                let wrap = is_export || exported_names.contains(&name_text);
                if wrap && !name_text.is_empty() {
                    self.write(exports_name);
                    self.write("(\"");
                    self.write(&name_text);
                    self.write("\", ");
                    self.write(&name_text);
                    self.write(" = ");
                    self.emit_expression(initializer);
                    self.write(");");
                } else {
                    self.emit(name);
                    self.write(" = ");
                    self.emit_expression(initializer);
                    self.write_semicolon();
                }
                self.write_line();
            }
        }
    }

    /// `x = expr;` where `x` is exported becomes
    /// `exports_N("x", x = expr);`.
    fn emit_system_expression_statement(
        &mut self,
        node: &quill_ast::Node,
        stmt: NodeIndex,
        exports_name: &str,
        exported_names: &rustc_hash::FxHashSet<String>,
    ) {
        let assignment = self
            .arena
            .get_wrapped_expr(node)
            .map(|w| w.expression)
            .filter(|&expr| self.arena.kind(expr) == SyntaxKind::BinaryExpression)
            .and_then(|expr| {
                self.arena
                    .get(expr)
                    .and_then(|n| self.arena.get_binary_expr(n))
                    .filter(|b| {
                        b.operator == SyntaxKind::EqualsToken
                            && self.arena.kind(b.left) == SyntaxKind::Identifier
                    })
                    .map(|b| (b.left, b.right))
            });

        if let Some((left, right)) = assignment {
            let name_text = self.arena.identifier_text(left).to_string();
            if exported_names.contains(&name_text) {
                self.write(exports_name);
                self.write("(\"");
                self.write(&name_text);
                self.write("\", ");
                self.write(&name_text);
                self.write(" = ");
                self.emit_expression(right);
                self.write(");");
                self.write_line();
                return;
            }
        }
        self.emit_statement_with_comments(stmt);
    }
}
