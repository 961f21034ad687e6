use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, NodeList, SyntaxKind};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Decorators
    // =========================================================================

    pub(super) fn member_decorators(&self, member_idx: NodeIndex) -> Option<NodeList> {
        let node = self.arena.get(member_idx)?;
        match node.kind {
            SyntaxKind::MethodDeclaration
            | SyntaxKind::Constructor
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor => self
                .arena
                .get_function(node)
                .and_then(|f| f.decorators.clone()),
            SyntaxKind::PropertyDeclaration => self
                .arena
                .get_property_decl(node)
                .and_then(|p| p.decorators.clone()),
            _ => None,
        }
        .filter(|d| !d.is_empty())
    }

    fn decorator_expression(&self, decorator_idx: NodeIndex) -> NodeIndex {
        self.arena
            .get(decorator_idx)
            .and_then(|n| self.arena.get_wrapped_expr(n))
            .map_or(NodeIndex::NONE, |w| w.expression)
    }

    /// `C = __decorate([dec, __metadata("design:paramtypes", […])], C);`
    pub(super) fn emit_class_decorate_call(&mut self, class_idx: NodeIndex, class_ref: &str) {
        let decorators = self
            .arena
            .get(class_idx)
            .and_then(|n| self.arena.get_class(n))
            .and_then(|c| c.decorators.clone())
            .unwrap_or_default();

        self.write(class_ref);
        self.write(" = __decorate([");
        let mut first = true;
        for &decorator in &decorators.nodes {
            if !first {
                self.write(", ");
            }
            first = false;
            let expr = self.decorator_expression(decorator);
            self.emit_expression(expr);
        }
        // Constructor parameter decorators ride on the class decorate call.
        if let Some(ctor_idx) = self.class_constructor(class_idx) {
            self.emit_param_decorator_entries(ctor_idx, &mut first);
        }
        if self.options.emit_decorator_metadata {
            let params = self.resolver.serialize_parameter_types_of_node(class_idx);
            if !first {
                self.write(", ");
            }
            self.write("__metadata(\"design:paramtypes\", [");
            self.write(&params.join(", "));
            self.write("])");
        }
        self.write("], ");
        self.write(class_ref);
        self.write(");");
    }

    pub(super) fn class_constructor(&self, class_idx: NodeIndex) -> Option<NodeIndex> {
        let members = self
            .arena
            .get(class_idx)
            .and_then(|n| self.arena.get_class(n))
            .map(|c| c.members.nodes.clone())?;
        self.find_constructor(&members)
    }

    /// Trailing `__decorate` calls for every decorated member. Accessors
    /// decorate only at the first accessor of a pair; parameter decorators
    /// apply only through the set accessor.
    pub(super) fn emit_member_decorate_calls(&mut self, class_idx: NodeIndex, class_ref: &str) {
        let members = self
            .arena
            .get(class_idx)
            .and_then(|n| self.arena.get_class(n))
            .map(|c| c.members.nodes.clone())
            .unwrap_or_default();

        for &member_idx in &members {
            let Some(member) = self.arena.get(member_idx) else {
                continue;
            };
            let member = *member;
            let kind = member.kind;

            let is_accessor =
                matches!(kind, SyntaxKind::GetAccessor | SyntaxKind::SetAccessor);
            let (decorators, param_source) = if is_accessor {
                let key = self
                    .arena
                    .get_function(&member)
                    .map(|f| self.declaration_name_text(f.name))
                    .unwrap_or_default();
                let is_static = member.has_flag(node_flags::STATIC);
                let (first, _getter, setter) = self.accessor_pair(&members, &key, is_static);
                if first != member_idx {
                    continue;
                }
                (self.member_decorators(first), setter)
            } else {
                let params = if matches!(kind, SyntaxKind::MethodDeclaration) {
                    Some(member_idx)
                } else {
                    None
                };
                (self.member_decorators(member_idx), params)
            };

            let has_param_decorators = param_source
                .map(|f| self.has_param_decorators(f))
                .unwrap_or(false);
            let Some(decorators) = decorators.or_else(|| {
                if has_param_decorators {
                    Some(NodeList::default())
                } else {
                    None
                }
            }) else {
                continue;
            };

            if kind == SyntaxKind::Constructor {
                // Constructor decorators are not valid; parameter decorators
                // are folded into the class decorate call.
                if !decorators.is_empty() {
                    self.error_on_node(
                        &member,
                        quill_common::diagnostics::codes::DECORATOR_NOT_VALID_HERE,
                        "Decorators are not valid here.",
                    );
                }
                continue;
            }

            self.write("__decorate([");
            let mut first_entry = true;
            for &decorator in &decorators.nodes {
                if !first_entry {
                    self.write(", ");
                }
                first_entry = false;
                let expr = self.decorator_expression(decorator);
                self.emit_expression(expr);
            }
            if let Some(param_func) = param_source {
                self.emit_param_decorator_entries(param_func, &mut first_entry);
            }
            if self.options.emit_decorator_metadata {
                self.emit_member_metadata_entries(member_idx, kind, &mut first_entry);
            }
            self.write("], ");
            self.write(class_ref);
            if !member.has_flag(node_flags::STATIC) {
                self.write(".prototype");
            }
            self.write(", ");
            self.emit_member_key(member_idx);
            self.write(", ");
            if kind == SyntaxKind::PropertyDeclaration {
                self.write("void 0");
            } else {
                self.write("Object.getOwnPropertyDescriptor(");
                self.write(class_ref);
                if !member.has_flag(node_flags::STATIC) {
                    self.write(".prototype");
                }
                self.write(", ");
                self.emit_member_key(member_idx);
                self.write(")");
            }
            self.write(");");
            self.write_line();
        }
    }

    pub(super) fn has_param_decorators(&self, func_idx: NodeIndex) -> bool {
        let params = self
            .arena
            .get(func_idx)
            .and_then(|n| self.arena.get_function(n))
            .map(|f| f.parameters.nodes.clone())
            .unwrap_or_default();
        params.iter().any(|&p| {
            self.arena
                .get(p)
                .and_then(|n| self.arena.get_parameter(n))
                .and_then(|param| param.decorators.as_ref())
                .is_some_and(|d| !d.is_empty())
        })
    }

    /// `__param(index, decorator)` entries for a function's parameters.
    fn emit_param_decorator_entries(&mut self, func_idx: NodeIndex, first: &mut bool) {
        let params = self
            .arena
            .get(func_idx)
            .and_then(|n| self.arena.get_function(n))
            .map(|f| f.parameters.nodes.clone())
            .unwrap_or_default();
        for (index, &param_idx) in params.iter().enumerate() {
            let decorators = self
                .arena
                .get(param_idx)
                .and_then(|n| self.arena.get_parameter(n))
                .and_then(|p| p.decorators.clone())
                .unwrap_or_default();
            for &decorator in &decorators.nodes {
                if !*first {
                    self.write(", ");
                }
                *first = false;
                self.write("__param(");
                self.write(&index.to_string());
                self.write(", ");
                let expr = self.decorator_expression(decorator);
                self.emit_expression(expr);
                self.write(")");
            }
        }
    }

    fn emit_member_metadata_entries(
        &mut self,
        member_idx: NodeIndex,
        kind: SyntaxKind,
        first: &mut bool,
    ) {
        let mut entry = |this: &mut Self, key: &str, value: String| {
            if !*first {
                this.write(", ");
            }
            *first = false;
            this.write("__metadata(\"");
            this.write(key);
            this.write("\", ");
            this.write(&value);
            this.write(")");
        };

        let design_type = self.resolver.serialize_type_of_node(member_idx);
        entry(self, "design:type", design_type);

        if kind == SyntaxKind::MethodDeclaration {
            let params = self.resolver.serialize_parameter_types_of_node(member_idx);
            entry(self, "design:paramtypes", format!("[{}]", params.join(", ")));
            let ret = self.resolver.serialize_return_type_of_node(member_idx);
            entry(self, "design:returntype", ret);
        }
    }

    /// The member's key argument: a string literal, or the captured
    /// temporary for a decorated computed name.
    fn emit_member_key(&mut self, member_idx: NodeIndex) {
        let Some(member) = self.arena.get(member_idx) else {
            return;
        };
        let member = *member;
        let name = match member.kind {
            SyntaxKind::PropertyDeclaration => {
                self.arena.get_property_decl(&member).map(|p| p.name)
            }
            _ => self.arena.get_function(&member).map(|f| f.name),
        }
        .unwrap_or(NodeIndex::NONE);

        if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
            if let Some(temp) = self.computed_property_temps.get(&name).cloned() {
                self.write(&temp);
            } else {
                self.emit(name);
            }
            return;
        }
        self.emit_property_name_as_string(name);
    }
}
