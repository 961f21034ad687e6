use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::{temp_flags, Printer};

impl<'a> Printer<'a> {
    // =========================================================================
    // Name generation
    // =========================================================================

    /// A name is usable only if the resolver knows no global by that name,
    /// the source file never mentions it, and this printer has not already
    /// manufactured it.
    pub(crate) fn is_unique_name(&self, name: &str) -> bool {
        !self.resolver.has_global_name(name)
            && !self.arena.identifier_names.contains(name)
            && !self.generated_names.contains(name)
    }

    /// Next temporary in the `_a … _z, _0, _1 …` cycle. The positions that
    /// would produce `_i` and `_n` are skipped; passing `UNDERSCORE_I` or
    /// `UNDERSCORE_N` claims those names directly while their reserved bit is
    /// free. Temporaries are not recorded permanently, so sibling scopes can
    /// reuse them after state restoration.
    pub(crate) fn make_temp_variable_name(&mut self, flags: u32) -> String {
        if flags != 0 && self.temp_flags_state & flags == 0 {
            let name = if flags == temp_flags::UNDERSCORE_I {
                "_i"
            } else {
                "_n"
            };
            if self.is_unique_name(name) {
                self.temp_flags_state |= flags;
                return name.to_string();
            }
        }
        loop {
            let count = self.temp_flags_state & temp_flags::COUNT_MASK;
            self.temp_flags_state += 1;
            // 8 and 13 would produce `_i` and `_n`.
            if count != 8 && count != 13 {
                let name = if count < 26 {
                    format!("_{}", (b'a' + count as u8) as char)
                } else {
                    format!("_{}", count - 26)
                };
                if self.is_unique_name(&name) {
                    return name;
                }
            }
        }
    }

    /// Queue a temporary for the `var t1, t2;` flush at the end of the
    /// current function body.
    pub(crate) fn record_temp_declaration(&mut self, name: String) {
        self.temp_variables.push(name);
    }

    /// `base_1`, `base_2`, … — first unique wins and is recorded for the
    /// rest of the file.
    pub(crate) fn make_unique_name(&mut self, base: &str) -> String {
        let mut i = 1;
        loop {
            let candidate = format!("{base}_{i}");
            if self.is_unique_name(&candidate) {
                self.generated_names.insert(candidate.clone());
                return candidate;
            }
            i += 1;
        }
    }

    /// Deterministic per-node alias, keyed by node kind: anonymous
    /// default-exported functions and classes get `default`, modules and
    /// enums their own name, imports a name derived from the module path.
    /// The result is memoized per node.
    pub(crate) fn generate_name_for_node(&mut self, idx: NodeIndex) -> String {
        if let Some(existing) = self.node_generated_names.get(&idx) {
            return existing.clone();
        }
        let Some(node) = self.arena.get(idx) else {
            return String::new();
        };
        let node = *node;
        let name = match node.kind {
            SyntaxKind::FunctionDeclaration
            | SyntaxKind::ClassDeclaration
            | SyntaxKind::ClassExpression => self.make_unique_name("default"),
            SyntaxKind::ModuleDeclaration | SyntaxKind::EnumDeclaration => {
                self.generate_name_for_module_or_enum(&node)
            }
            SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration => {
                self.generate_name_for_import_or_export(&node)
            }
            SyntaxKind::ExportAssignment => self.make_unique_name("default"),
            _ => self.make_unique_name("_a"),
        };
        self.node_generated_names.insert(idx, name.clone());
        name
    }

    fn generate_name_for_module_or_enum(&mut self, node: &Node) -> String {
        let name_idx = match node.kind {
            SyntaxKind::ModuleDeclaration => {
                self.arena.get_module(node).map(|m| m.name)
            }
            _ => self.arena.get_enum(node).map(|e| e.name),
        };
        let text = name_idx
            .map(|n| self.arena.identifier_text(n).to_string())
            .unwrap_or_default();
        // The declaration's own name serves when it is the only thing in
        // scope with that name; otherwise suffix to uniqueness.
        if self.is_unique_local_name(&text) {
            text
        } else {
            self.make_unique_name(&text)
        }
    }

    fn is_unique_local_name(&self, name: &str) -> bool {
        !name.is_empty() && !self.generated_names.contains(name)
    }

    fn generate_name_for_import_or_export(&mut self, node: &Node) -> String {
        let specifier = match node.kind {
            SyntaxKind::ImportDeclaration => {
                self.arena.get_import_decl(node).map(|i| i.module_specifier)
            }
            _ => self.arena.get_export_decl(node).map(|e| e.module_specifier),
        }
        .unwrap_or(NodeIndex::NONE);
        let path = self.arena.literal_text(specifier).to_string();
        let base = sanitize_module_name(&path);
        self.make_unique_name(&base)
    }

    // =========================================================================
    // Block-scope renaming
    // =========================================================================

    /// Below ES6, a `let`/`const` binding that shadows a value visible in its
    /// enclosing scope cannot simply become `var`; it is renamed, and every
    /// identifier carrying the binding's id substitutes the new name.
    pub(crate) fn maybe_rename_block_scoped_binding(&mut self, name_idx: NodeIndex) {
        if self.options.target.supports_es2015() {
            return;
        }
        let Some(name_node) = self.arena.get(name_idx) else {
            return;
        };
        if name_node.kind != SyntaxKind::Identifier {
            return;
        }
        let Some(id) = self.resolver.get_block_scoped_variable_id(name_idx) else {
            return;
        };
        if self.block_scoped_renames.contains_key(&id) {
            return;
        }
        if self.is_declared_at_top_level(name_idx) {
            return;
        }
        if !self.resolver.resolves_to_some_value(name_idx) {
            return;
        }
        let original = self.arena.identifier_text(name_idx).to_string();
        let renamed = self.make_unique_name(&original);
        self.block_scoped_renames.insert(id, renamed);
    }

    /// File, module, and function bodies are renaming-exempt: their `var`
    /// never collides after hoisting.
    fn is_declared_at_top_level(&self, mut idx: NodeIndex) -> bool {
        loop {
            idx = self.arena.parent(idx);
            if idx.is_none() {
                return true;
            }
            match self.arena.kind(idx) {
                SyntaxKind::SourceFile | SyntaxKind::ModuleBlock => return true,
                SyntaxKind::Block => {
                    let parent = self.arena.parent(idx);
                    return matches!(
                        self.arena.kind(parent),
                        SyntaxKind::FunctionDeclaration
                            | SyntaxKind::FunctionExpression
                            | SyntaxKind::ArrowFunction
                            | SyntaxKind::MethodDeclaration
                            | SyntaxKind::Constructor
                            | SyntaxKind::GetAccessor
                            | SyntaxKind::SetAccessor
                    );
                }
                SyntaxKind::VariableDeclaration
                | SyntaxKind::VariableDeclarationList
                | SyntaxKind::VariableStatement
                | SyntaxKind::ObjectBindingPattern
                | SyntaxKind::ArrayBindingPattern
                | SyntaxKind::BindingElement => continue,
                _ => return false,
            }
        }
    }

    /// Text of a declaration-name node: identifier, string, or number.
    pub(crate) fn declaration_name_text(&self, idx: NodeIndex) -> String {
        let Some(node) = self.arena.get(idx) else {
            return String::new();
        };
        match node.kind {
            SyntaxKind::Identifier => self.arena.identifier_text(idx).to_string(),
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                self.arena.literal_text(idx).to_string()
            }
            _ => String::new(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/names.rs"]
mod tests;

/// Derive an identifier base from a module path: `"./a/b-c"` becomes `b_c`.
pub(crate) fn sanitize_module_name(path: &str) -> String {
    let last = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path);
    let stem = last.strip_suffix(".js").unwrap_or(last);
    let mut name = String::new();
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            name.push(ch);
        } else {
            name.push('_');
        }
    }
    if name.is_empty() || name.as_bytes()[0].is_ascii_digit() {
        name.insert(0, '_');
    }
    name
}
