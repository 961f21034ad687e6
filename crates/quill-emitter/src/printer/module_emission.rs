use rustc_hash::{FxHashMap, FxHashSet};

use quill_ast::node::node_flags;
use quill_ast::{Node, NodeArena, NodeIndex, SyntaxKind};
use quill_common::ModuleKind;

use super::Printer;

/// Pre-pass classification of a module's top-level statements: which imports
/// must survive, which names re-export under aliases, whether an
/// `export =` or an `export *` appears.
#[derive(Default)]
pub(crate) struct ExternalModuleInfo {
    pub external_imports: Vec<NodeIndex>,
    pub export_specifiers: FxHashMap<String, Vec<String>>,
    pub exported_names: FxHashSet<String>,
    pub export_equals: Option<NodeIndex>,
    pub has_export_stars: bool,
}

pub(crate) fn collect_external_module_info(
    arena: &NodeArena,
    statements: &[NodeIndex],
) -> ExternalModuleInfo {
    let mut info = ExternalModuleInfo::default();
    for &stmt in statements {
        let Some(node) = arena.get(stmt) else {
            continue;
        };
        match node.kind {
            SyntaxKind::ImportDeclaration => info.external_imports.push(stmt),
            SyntaxKind::ImportEqualsDeclaration => {
                let is_require = arena
                    .get_import_equals(node)
                    .is_some_and(|i| {
                        arena.kind(i.module_reference) == SyntaxKind::ExternalModuleReference
                    });
                if is_require {
                    info.external_imports.push(stmt);
                }
            }
            SyntaxKind::ExportDeclaration => {
                let Some(export) = arena.get_export_decl(node) else {
                    continue;
                };
                if export.module_specifier.is_some() {
                    info.external_imports.push(stmt);
                    if export.export_clause.is_none() {
                        info.has_export_stars = true;
                    }
                } else if export.export_clause.is_some() {
                    let specifiers = arena
                        .get(export.export_clause)
                        .and_then(|n| arena.get_named_bindings(n))
                        .map(|b| b.elements.nodes.clone())
                        .unwrap_or_default();
                    for spec_idx in specifiers {
                        let Some(spec) = arena
                            .get(spec_idx)
                            .and_then(|n| arena.get_specifier(n))
                        else {
                            continue;
                        };
                        let local = if spec.property_name.is_some() {
                            arena.identifier_text(spec.property_name).to_string()
                        } else {
                            arena.identifier_text(spec.name).to_string()
                        };
                        let alias = arena.identifier_text(spec.name).to_string();
                        info.exported_names.insert(alias.clone());
                        info.export_specifiers.entry(local).or_default().push(alias);
                    }
                }
            }
            SyntaxKind::ExportAssignment => {
                if node.has_flag(node_flags::EXPORT_EQUALS) {
                    info.export_equals = Some(stmt);
                }
            }
            _ => {
                if node.has_flag(node_flags::EXPORT) {
                    for name in declared_names(arena, stmt, node) {
                        info.exported_names.insert(name);
                    }
                }
            }
        }
    }
    info
}

fn declared_names(arena: &NodeArena, stmt: NodeIndex, node: &Node) -> Vec<String> {
    let mut names = Vec::new();
    match node.kind {
        SyntaxKind::FunctionDeclaration => {
            if let Some(func) = arena.get_function(node) {
                names.push(arena.identifier_text(func.name).to_string());
            }
        }
        SyntaxKind::ClassDeclaration => {
            if let Some(class) = arena.get_class(node) {
                names.push(arena.identifier_text(class.name).to_string());
            }
        }
        SyntaxKind::EnumDeclaration => {
            if let Some(data) = arena.get_enum(node) {
                names.push(arena.identifier_text(data.name).to_string());
            }
        }
        SyntaxKind::ModuleDeclaration => {
            if let Some(data) = arena.get_module(node) {
                names.push(arena.identifier_text(data.name).to_string());
            }
        }
        SyntaxKind::VariableStatement => {
            let lists = arena
                .get_variable(node)
                .map(|v| v.declarations.nodes.clone())
                .unwrap_or_default();
            for list in lists {
                let decls = arena
                    .get(list)
                    .and_then(|n| arena.get_variable(n))
                    .map(|v| v.declarations.nodes.clone())
                    .unwrap_or_default();
                for decl in decls {
                    if let Some(data) = arena
                        .get(decl)
                        .and_then(|n| arena.get_variable_declaration(n))
                    {
                        collect_names(arena, data.name, &mut names);
                    }
                }
            }
        }
        _ => {}
    }
    let _ = stmt;
    names.retain(|n| !n.is_empty());
    names
}

fn collect_names(arena: &NodeArena, name: NodeIndex, out: &mut Vec<String>) {
    match arena.kind(name) {
        SyntaxKind::Identifier => out.push(arena.identifier_text(name).to_string()),
        SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
            let elements = arena
                .get(name)
                .and_then(|n| arena.get_binding_pattern(n))
                .map(|p| p.elements.nodes.clone())
                .unwrap_or_default();
            for element in elements {
                if let Some(binding) =
                    arena.get(element).and_then(|n| arena.get_binding_element(n))
                {
                    collect_names(arena, binding.name, out);
                }
            }
        }
        _ => {}
    }
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Module context queries
    // =========================================================================

    pub(crate) fn current_file_is_external_module(&self) -> bool {
        self.arena
            .get(self.current_source_file)
            .and_then(|n| self.arena.get_source_file(n))
            .is_some_and(|f| f.is_external_module)
    }

    pub(crate) fn is_commonjs_external_module(&self) -> bool {
        self.module_kind.is_commonjs()
            && self.current_file_is_external_module()
            && self.system_exports_name.is_none()
    }

    /// In an ES2015-module output, exported declarations keep their
    /// `export` / `export default` keywords instead of lowering.
    pub(crate) fn emit_es6_export_prefix(&mut self, node: &Node) {
        if node.has_flag(node_flags::EXPORT)
            && self.module_kind.is_es_module()
            && self.current_file_is_external_module()
        {
            self.write("export ");
            if node.has_flag(node_flags::DEFAULT) {
                self.write("default ");
            }
        }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    pub(super) fn emit_import_declaration(&mut self, node: &Node, idx: NodeIndex) {
        let Some(import) = self.arena.get_import_decl(node) else {
            return;
        };
        let (import_clause, module_specifier) = (import.import_clause, import.module_specifier);

        match self.module_kind {
            ModuleKind::CommonJS | ModuleKind::UMD => {
                self.emit_import_declaration_commonjs(idx, import_clause, module_specifier);
            }
            ModuleKind::AMD | ModuleKind::System => {
                // Bindings arrive through factory parameters or setters.
            }
            _ => self.emit_import_declaration_es6(import_clause, module_specifier),
        }
    }

    fn emit_import_declaration_es6(
        &mut self,
        import_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) {
        self.write("import ");
        if import_clause.is_some() {
            let Some(clause) = self
                .arena
                .get(import_clause)
                .and_then(|n| self.arena.get_import_clause(n))
            else {
                return;
            };
            let (default_name, named_bindings) = (clause.name, clause.named_bindings);
            let mut wrote = false;
            if default_name.is_some() {
                self.emit(default_name);
                wrote = true;
            }
            if named_bindings.is_some() {
                if wrote {
                    self.write(", ");
                }
                match self.arena.kind(named_bindings) {
                    SyntaxKind::NamespaceImport => {
                        let name = self
                            .arena
                            .get(named_bindings)
                            .and_then(|n| self.arena.get_name_data(n))
                            .map_or(NodeIndex::NONE, |d| d.name);
                        self.write("* as ");
                        self.emit(name);
                    }
                    _ => self.emit_named_bindings_list(named_bindings),
                }
            }
            self.write(" from ");
        }
        self.emit(module_specifier);
        self.write_semicolon();
    }

    fn emit_named_bindings_list(&mut self, named_bindings: NodeIndex) {
        let elements = self
            .arena
            .get(named_bindings)
            .and_then(|n| self.arena.get_named_bindings(n))
            .map(|b| b.elements.nodes.clone())
            .unwrap_or_default();
        self.write("{ ");
        for (i, &spec_idx) in elements.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let Some(spec) = self
                .arena
                .get(spec_idx)
                .and_then(|n| self.arena.get_specifier(n))
            else {
                continue;
            };
            let (property_name, name) = (spec.property_name, spec.name);
            if property_name.is_some() {
                self.emit(property_name);
                self.write(" as ");
            }
            self.emit(name);
        }
        self.write(" }");
    }

    fn emit_import_declaration_commonjs(
        &mut self,
        idx: NodeIndex,
        import_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) {
        if import_clause.is_none() {
            self.write("require(");
            self.emit(module_specifier);
            self.write(");");
            return;
        }
        if !self.resolver.is_referenced_alias_declaration(idx) {
            // Type-only imports vanish.
            return;
        }

        let local_name = self.import_local_name(idx);
        self.write("var ");
        self.write(&local_name);
        self.write(" = require(");
        self.emit(module_specifier);
        self.write(");");
    }

    /// The file-local binding an import lowers to: a namespace import keeps
    /// its own name, everything else gets a path-derived generated name.
    pub(crate) fn import_local_name(&mut self, import_idx: NodeIndex) -> String {
        let clause_and_specifier = self
            .arena
            .get(import_idx)
            .and_then(|n| self.arena.get_import_decl(n))
            .map(|i| (i.import_clause, i.module_specifier));
        if let Some((clause, _)) = clause_and_specifier {
            let named = self
                .arena
                .get(clause)
                .and_then(|n| self.arena.get_import_clause(n))
                .map_or(NodeIndex::NONE, |c| c.named_bindings);
            if self.arena.kind(named) == SyntaxKind::NamespaceImport {
                let name = self
                    .arena
                    .get(named)
                    .and_then(|n| self.arena.get_name_data(n))
                    .map_or(NodeIndex::NONE, |d| d.name);
                let text = self.arena.identifier_text(name).to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }
        self.generate_name_for_node(import_idx)
    }

    // =========================================================================
    // Exports
    // =========================================================================

    pub(super) fn emit_export_declaration(&mut self, node: &Node, idx: NodeIndex) {
        let Some(export) = self.arena.get_export_decl(node) else {
            return;
        };
        let (export_clause, module_specifier) = (export.export_clause, export.module_specifier);

        match self.module_kind {
            ModuleKind::CommonJS | ModuleKind::UMD | ModuleKind::AMD => {
                self.emit_export_declaration_commonjs(idx, export_clause, module_specifier);
            }
            ModuleKind::System => {}
            _ => self.emit_export_declaration_es6(export_clause, module_specifier),
        }
    }

    fn emit_export_declaration_es6(
        &mut self,
        export_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) {
        self.write("export ");
        if export_clause.is_some() {
            self.emit_named_bindings_list(export_clause);
        } else {
            self.write("*");
        }
        if module_specifier.is_some() {
            self.write(" from ");
            self.emit(module_specifier);
        }
        self.write_semicolon();
    }

    fn emit_export_declaration_commonjs(
        &mut self,
        idx: NodeIndex,
        export_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) {
        if module_specifier.is_none() {
            // Aliases for local declarations are emitted where the
            // declarations are.
            return;
        }

        if export_clause.is_none() {
            self.write("__export(require(");
            self.emit(module_specifier);
            self.write("));");
            return;
        }

        // Re-export: bind the module, then assign each specifier. In AMD
        // the `require` parameter makes this work unchanged.
        let local = self.generate_name_for_node(idx);
        self.write("var ");
        self.write(&local);
        self.write(" = require(");
        self.emit(module_specifier);
        self.write(");");
        self.write_line();
        let specifiers = self
            .arena
            .get(export_clause)
            .and_then(|n| self.arena.get_named_bindings(n))
            .map(|b| b.elements.nodes.clone())
            .unwrap_or_default();
        let mut first = true;
        for spec_idx in specifiers {
            let Some(spec) = self
                .arena
                .get(spec_idx)
                .and_then(|n| self.arena.get_specifier(n))
            else {
                continue;
            };
            if !self.resolver.is_value_alias_declaration(spec_idx) {
                continue;
            }
            let (property_name, name) = (spec.property_name, spec.name);
            let alias = self.arena.identifier_text(name).to_string();
            let property = if property_name.is_some() {
                self.arena.identifier_text(property_name).to_string()
            } else {
                alias.clone()
            };
            if !first {
                self.write_line();
            }
            first = false;
            self.write("exports.");
            self.write(&alias);
            self.write(" = ");
            self.write(&local);
            self.write(".");
            self.write(&property);
            self.write_semicolon();
        }
    }

    pub(super) fn emit_export_assignment(&mut self, node: &Node, idx: NodeIndex) {
        let Some(wrapped) = self.arena.get_wrapped_expr(node) else {
            return;
        };
        let expression = wrapped.expression;
        let is_export_equals = node.has_flag(node_flags::EXPORT_EQUALS);

        if is_export_equals {
            // Emitted at the end of the module body from the collected
            // `export_equals`, not at its source position.
            return;
        }

        if let Some(exports_name) = self.system_exports_name.clone() {
            self.write(&exports_name);
            self.write("(\"default\", ");
            self.emit_expression(expression);
            self.write(");");
            return;
        }
        match self.module_kind {
            ModuleKind::CommonJS | ModuleKind::UMD | ModuleKind::AMD => {
                self.write("exports.default = ");
                self.emit_expression(expression);
                self.write_semicolon();
            }
            _ => {
                self.write("export default ");
                self.emit_expression(expression);
                self.write_semicolon();
            }
        }
        let _ = idx;
    }

    /// The collected `export =` value closes the module body: `return X` in
    /// an AMD factory, `module.exports = X` otherwise.
    pub(crate) fn emit_export_equals_tail(&mut self) {
        let Some(export_idx) = self.module_info.as_ref().and_then(|info| info.export_equals)
        else {
            return;
        };
        let Some(node) = self.arena.get(export_idx) else {
            return;
        };
        let node = *node;
        let Some(wrapped) = self.arena.get_wrapped_expr(&node) else {
            return;
        };
        let expression = wrapped.expression;

        let actual = self.original_module_kind.unwrap_or(self.module_kind);
        match actual {
            ModuleKind::AMD => {
                self.write("return ");
                self.emit_expression(expression);
                self.write_semicolon();
            }
            ModuleKind::CommonJS | ModuleKind::UMD => {
                self.write("module.exports = ");
                self.emit_expression(expression);
                self.write_semicolon();
            }
            _ => {}
        }
        self.write_line();
    }

    // =========================================================================
    // Post-declaration export assignments
    // =========================================================================

    /// After an exported declaration's own text: namespace members attach to
    /// the namespace object, external-module members to `exports` (or the
    /// System export function), and export-specifier aliases follow.
    pub(crate) fn emit_export_assignments_for_declaration(
        &mut self,
        idx: NodeIndex,
        name: &str,
    ) {
        if name.is_empty() {
            return;
        }
        let exported = self.arena.has_flag(idx, node_flags::EXPORT);
        if exported && !self.namespace_stack.is_empty() {
            let namespace = self.namespace_stack.last().cloned().unwrap_or_default();
            self.write_line();
            self.write(&namespace);
            self.write(".");
            self.write(name);
            self.write(" = ");
            self.write(name);
            self.write_semicolon();
        }
        self.emit_commonjs_export_if_needed(idx, name);
    }

    /// The `exports.x = x;` / `exports_1("x", x);` tail shared by every
    /// exported declaration form.
    pub(crate) fn emit_commonjs_export_if_needed(&mut self, idx: NodeIndex, name: &str) {
        if name.is_empty() {
            return;
        }
        let exported = self.arena.has_flag(idx, node_flags::EXPORT);
        let default = self.arena.has_flag(idx, node_flags::DEFAULT);

        if let Some(exports_name) = self.system_exports_name.clone() {
            if exported {
                self.write_line();
                self.write(&exports_name);
                self.write("(\"");
                self.write(if default { "default" } else { name });
                self.write("\", ");
                self.write(name);
                self.write(");");
            }
            return;
        }

        if self.is_commonjs_external_module() {
            if exported {
                self.write_line();
                self.write("exports.");
                self.write(if default { "default" } else { name });
                self.write(" = ");
                self.write(name);
                self.write_semicolon();
            }
            let aliases = self
                .module_info
                .as_ref()
                .and_then(|info| info.export_specifiers.get(name))
                .cloned()
                .unwrap_or_default();
            for alias in aliases {
                self.write_line();
                self.write("exports.");
                self.write(&alias);
                self.write(" = ");
                self.write(name);
                self.write_semicolon();
            }
        }
    }
}
