use quill_ast::node::node_flags;
use quill_ast::{Node, NodeIndex, SyntaxKind};

use super::functions::CtorContext;
use super::{temp_flags, Printer};

impl<'a> Printer<'a> {
    // =========================================================================
    // Classes
    // =========================================================================

    pub(super) fn emit_class_declaration(&mut self, node: &Node, idx: NodeIndex) {
        if node.has_flag(node_flags::AMBIENT) {
            return;
        }
        let Some(class) = self.arena.get_class(node) else {
            return;
        };
        let name = class.name;
        let has_decorators = class.decorators.as_ref().is_some_and(|d| !d.is_empty());
        let name_text = if name.is_some() {
            self.arena.identifier_text(name).to_string()
        } else {
            self.generate_name_for_node(idx)
        };

        let ctor_param_decorators = self
            .class_constructor(idx)
            .is_some_and(|c| self.has_param_decorators(c));

        if self.options.target.supports_es2015() {
            if has_decorators {
                self.emit_decorated_class_declaration_es6(idx, &name_text);
            } else {
                self.emit_es6_export_prefix(node);
                self.emit_class_es6(idx, &name_text);
                self.emit_member_decorate_calls(idx, &name_text);
                if ctor_param_decorators {
                    self.write_line();
                    self.emit_class_decorate_call(idx, &name_text);
                }
            }
        } else {
            tracing::debug!(class = %name_text, "lowering class to an IIFE");
            self.emit_es6_export_prefix(node);
            self.write("var ");
            self.write(&name_text);
            self.write(" = ");
            self.emit_class_iife_es5(idx, &name_text);
            self.write_semicolon();
        }

        self.emit_export_assignments_for_declaration(idx, &name_text);
    }

    pub(super) fn emit_class_expression(&mut self, node: &Node, idx: NodeIndex) {
        let Some(class) = self.arena.get_class(node) else {
            return;
        };
        let name = class.name;
        let name_text = if name.is_some() {
            self.arena.identifier_text(name).to_string()
        } else {
            self.make_unique_name("class")
        };

        if self.options.target.supports_es2015() {
            let static_inits = self.static_property_initializers(idx);
            if static_inits.is_empty() {
                self.emit_class_es6(idx, &name_text);
            } else {
                // `(_a = class …, _a.x = 1, _a)` keeps the expression usable
                // while static properties attach.
                self.emit_class_expression_with_statics_es6(idx, &name_text, &static_inits);
            }
        } else {
            self.emit_class_iife_es5(idx, &name_text);
        }
    }

    // =========================================================================
    // ES2015 emission
    // =========================================================================

    /// Spec'd rewrite for a decorated class declaration, preserving the
    /// runtime `name` of the class:
    /// `let C = class { … }; Object.defineProperty(C, "name", …); C = __decorate([…], C);`
    fn emit_decorated_class_declaration_es6(&mut self, idx: NodeIndex, name_text: &str) {
        self.write("let ");
        self.write(name_text);
        self.write(" = ");
        self.emit_class_es6_header_and_body(idx, None);
        self.write_semicolon();
        self.write_line();
        self.write("Object.defineProperty(");
        self.write(name_text);
        self.write(", \"name\", { value: \"");
        self.write(name_text);
        self.write("\", configurable: true });");
        self.write_line();
        self.emit_class_decorate_call(idx, name_text);
        self.write_line();
        self.emit_member_decorate_calls(idx, name_text);
    }

    fn emit_class_es6(&mut self, idx: NodeIndex, name_text: &str) {
        self.emit_class_es6_header_and_body(idx, Some(name_text));
    }

    fn emit_class_es6_header_and_body(&mut self, idx: NodeIndex, name: Option<&str>) {
        let Some(class) = self.arena.get(idx).and_then(|n| self.arena.get_class(n)) else {
            return;
        };
        let (base, members) = (class.base, class.members.nodes.clone());

        let saved = self.save_temp_state();
        self.write("class");
        if let Some(name) = name {
            if !name.is_empty() {
                self.write_space();
                self.write(name);
            }
            self.record_scope_name_start(name);
        }
        if base.is_some() {
            self.write(" extends ");
            self.emit_expression(base);
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();

        self.emit_es6_constructor(base.is_some(), &members);

        for &member_idx in &members {
            let Some(member) = self.arena.get(member_idx) else {
                continue;
            };
            let member = *member;
            match member.kind {
                SyntaxKind::MethodDeclaration => self.emit_es6_method(&member, member_idx),
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                    self.emit_es6_accessor(&member, member_idx)
                }
                _ => {}
            }
        }

        self.decrease_indent();
        self.write("}");
        if name.is_some() {
            self.record_scope_name_end();
        }
        self.restore_temp_state(saved);
    }

    /// Instance property initializers have no ES2015 syntax; they move into
    /// the constructor, which is synthesized when absent. A class with no
    /// explicit constructor, no initializers, and no base emits none.
    fn emit_es6_constructor(&mut self, has_base: bool, members: &[NodeIndex]) {
        let ctor_idx = self.find_constructor(members);
        let instance_inits = self.instance_property_initializers(members);

        // A derived class still needs the synthesized forwarding constructor.
        if ctor_idx.is_none() && instance_inits.is_empty() && !has_base {
            return;
        }

        let ctor = CtorContext {
            param_property_names: ctor_idx
                .map(|c| self.parameter_property_names(c))
                .unwrap_or_default(),
            instance_initializers: instance_inits,
        };

        if let Some(ctor_idx) = ctor_idx {
            self.write("constructor");
            self.emit_signature_and_body(ctor_idx, Some("constructor"), false, Some(&ctor));
            self.write_line();
            return;
        }

        // Synthesized constructor.
        if has_base {
            self.write("constructor(...args) {");
            self.write_line();
            self.increase_indent();
            self.write("super(...args);");
            self.write_line();
        } else {
            self.write("constructor() {");
            self.write_line();
            self.increase_indent();
        }
        for &prop_idx in &ctor.instance_initializers {
            self.emit_instance_property_initializer(prop_idx);
        }
        self.decrease_indent();
        self.write("}");
        self.write_line();
    }

    fn emit_es6_method(&mut self, member: &Node, member_idx: NodeIndex) {
        let Some(func) = self.arena.get_function(member) else {
            return;
        };
        let (name, body) = (func.name, func.body);
        if !self.should_emit_member_body(member, body) {
            return;
        }
        if member.has_flag(node_flags::STATIC) {
            self.write("static ");
        }
        self.emit(name);
        let scope_name = self.declaration_name_text(name);
        self.emit_signature_and_body(member_idx, Some(&scope_name), false, None);
        self.write_line();
    }

    fn emit_es6_accessor(&mut self, member: &Node, member_idx: NodeIndex) {
        let Some(func) = self.arena.get_function(member) else {
            return;
        };
        let (name, body) = (func.name, func.body);
        if !self.should_emit_member_body(member, body) {
            return;
        }
        if member.has_flag(node_flags::STATIC) {
            self.write("static ");
        }
        self.write(if member.kind == SyntaxKind::GetAccessor {
            "get "
        } else {
            "set "
        });
        self.emit(name);
        let scope_name = self.declaration_name_text(name);
        self.emit_signature_and_body(member_idx, Some(&scope_name), false, None);
        self.write_line();
    }

    fn emit_class_expression_with_statics_es6(
        &mut self,
        idx: NodeIndex,
        name_text: &str,
        static_inits: &[NodeIndex],
    ) {
        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        self.record_temp_declaration(temp.clone());
        self.write("(");
        self.write(&temp);
        self.write(" = ");
        self.emit_class_es6_header_and_body(idx, Some(name_text));
        for &prop_idx in static_inits {
            let Some(prop) = self
                .arena
                .get(prop_idx)
                .and_then(|n| self.arena.get_property_decl(n))
            else {
                continue;
            };
            let (name, initializer) = (prop.name, prop.initializer);
            self.write(", ");
            self.write(&temp);
            if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
                self.emit(name);
            } else {
                self.write(".");
                let text = self.declaration_name_text(name);
                self.write(&text);
            }
            self.write(" = ");
            self.emit_expression(initializer);
        }
        self.write(", ");
        self.write(&temp);
        self.write(")");
    }

    // =========================================================================
    // ES5 lowering
    // =========================================================================

    /// The IIFE form:
    ///
    /// ```text
    /// (function (_super) {
    ///     __extends(C, _super);
    ///     function C() { … }
    ///     C.prototype.m = function () { … };
    ///     return C;
    /// })(Base)
    /// ```
    fn emit_class_iife_es5(&mut self, idx: NodeIndex, name_text: &str) {
        let Some(class) = self.arena.get(idx).and_then(|n| self.arena.get_class(n)) else {
            return;
        };
        let (base, members) = (class.base, class.members.nodes.clone());
        let has_base = base.is_some();
        let has_class_decorators = class.decorators.as_ref().is_some_and(|d| !d.is_empty())
            || self
                .class_constructor(idx)
                .is_some_and(|c| self.has_param_decorators(c));

        let saved = self.save_temp_state();
        let prev_super = self.super_name.take();
        if has_base {
            self.super_name = Some("_super".to_string());
        }
        self.record_scope_name_start(name_text);

        self.write("(function (");
        if has_base {
            self.write("_super");
        }
        self.write(") {");
        self.write_line();
        self.increase_indent();

        if has_base {
            self.write("__extends(");
            self.write(name_text);
            self.write(", _super);");
            self.write_line();
        }

        self.emit_es5_constructor_function(name_text, has_base, &members);

        for &member_idx in &members {
            let Some(member) = self.arena.get(member_idx) else {
                continue;
            };
            let member = *member;
            match member.kind {
                SyntaxKind::MethodDeclaration => {
                    self.emit_es5_method(&member, member_idx, name_text)
                }
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                    self.emit_es5_accessor_group(&member, member_idx, name_text, &members)
                }
                _ => {}
            }
        }

        // Static property initializers attach to the constructor function.
        for &prop_idx in &self.static_property_initializers(idx) {
            let Some(prop) = self
                .arena
                .get(prop_idx)
                .and_then(|n| self.arena.get_property_decl(n))
            else {
                continue;
            };
            let (name, initializer) = (prop.name, prop.initializer);
            self.write(name_text);
            if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
                self.emit_decorated_member_name(name, prop_idx);
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

        self.emit_member_decorate_calls(idx, name_text);
        if has_class_decorators {
            self.emit_class_decorate_call(idx, name_text);
            self.write_line();
        }

        self.emit_temp_declarations();
        self.write("return ");
        self.write(name_text);
        self.write_semicolon();
        self.write_line();
        self.decrease_indent();
        self.write("})(");
        if has_base {
            // The extends clause is evaluated outside the frame.
            let prev = self.super_name.take();
            self.emit_expression(base);
            self.super_name = prev;
        }
        self.write(")");

        self.record_scope_name_end();
        self.super_name = prev_super;
        self.restore_temp_state(saved);
    }

    fn emit_es5_constructor_function(
        &mut self,
        name_text: &str,
        has_base: bool,
        members: &[NodeIndex],
    ) {
        let ctor_idx = self.find_constructor(members);
        let instance_inits = self.instance_property_initializers(members);

        self.write("function ");
        self.write(name_text);

        if let Some(ctor_idx) = ctor_idx {
            let ctor = CtorContext {
                param_property_names: self.parameter_property_names(ctor_idx),
                instance_initializers: instance_inits,
            };
            self.emit_signature_and_body(ctor_idx, None, false, Some(&ctor));
        } else {
            self.write("() {");
            self.write_line();
            self.increase_indent();
            if has_base {
                self.write("_super.apply(this, arguments);");
                self.write_line();
            }
            for &prop_idx in &instance_inits {
                self.emit_instance_property_initializer(prop_idx);
            }
            self.decrease_indent();
            self.write("}");
        }
        self.write_line();
    }

    fn emit_es5_method(&mut self, member: &Node, member_idx: NodeIndex, name_text: &str) {
        let Some(func) = self.arena.get_function(member) else {
            return;
        };
        let (name, body) = (func.name, func.body);
        if !self.should_emit_member_body(member, body) {
            return;
        }

        self.write(name_text);
        if !member.has_flag(node_flags::STATIC) {
            self.write(".prototype");
        }
        self.emit_es5_member_name(name, member_idx);
        self.write(" = function ");
        let scope_name = self.declaration_name_text(name);
        self.emit_signature_and_body(member_idx, Some(&scope_name), false, None);
        self.write_semicolon();
        self.write_line();
    }

    /// Accessors lower to one `Object.defineProperty` per get/set pair,
    /// emitted at the first accessor of the pair.
    fn emit_es5_accessor_group(
        &mut self,
        member: &Node,
        member_idx: NodeIndex,
        name_text: &str,
        members: &[NodeIndex],
    ) {
        let Some(func) = self.arena.get_function(member) else {
            return;
        };
        let name = func.name;
        let key = self.declaration_name_text(name);
        let is_static = member.has_flag(node_flags::STATIC);

        let (first, getter, setter) = self.accessor_pair(members, &key, is_static);
        if first != member_idx {
            return;
        }

        self.write("Object.defineProperty(");
        self.write(name_text);
        if !is_static {
            self.write(".prototype");
        }
        self.write(", \"");
        self.write(&key);
        self.write("\", {");
        self.write_line();
        self.increase_indent();
        if let Some(getter) = getter {
            self.write("get: function ");
            self.emit_signature_and_body(getter, Some(&key), false, None);
            self.write(",");
            self.write_line();
        }
        if let Some(setter) = setter {
            self.write("set: function ");
            self.emit_signature_and_body(setter, Some(&key), false, None);
            self.write(",");
            self.write_line();
        }
        self.write("enumerable: true,");
        self.write_line();
        self.write("configurable: true");
        self.write_line();
        self.decrease_indent();
        self.write("});");
        self.write_line();
    }

    /// (first accessor index, getter, setter) for a name/static pairing.
    pub(super) fn accessor_pair(
        &self,
        members: &[NodeIndex],
        key: &str,
        is_static: bool,
    ) -> (NodeIndex, Option<NodeIndex>, Option<NodeIndex>) {
        let mut first = NodeIndex::NONE;
        let mut getter = None;
        let mut setter = None;
        for &member_idx in members {
            let Some(member) = self.arena.get(member_idx) else {
                continue;
            };
            if !matches!(
                member.kind,
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor
            ) {
                continue;
            }
            if member.has_flag(node_flags::STATIC) != is_static {
                continue;
            }
            let Some(func) = self.arena.get_function(member) else {
                continue;
            };
            if self.declaration_name_text(func.name) != key {
                continue;
            }
            if first.is_none() {
                first = member_idx;
            }
            if member.kind == SyntaxKind::GetAccessor {
                getter.get_or_insert(member_idx);
            } else {
                setter.get_or_insert(member_idx);
            }
        }
        (first, getter, setter)
    }

    /// `.name` for identifiers, `["text"]` for literals, `[expr]` for
    /// computed names (capturing decorated computed names into a temp).
    fn emit_es5_member_name(&mut self, name: NodeIndex, member_idx: NodeIndex) {
        if self.arena.kind(name) == SyntaxKind::ComputedPropertyName {
            self.emit_decorated_member_name(name, member_idx);
            return;
        }
        let text = self.declaration_name_text(name);
        if self.arena.kind(name) == SyntaxKind::Identifier {
            self.write(".");
            self.write(&text);
        } else {
            self.write("[");
            self.emit_property_name_as_string(name);
            self.write("]");
        }
    }

    /// A decorated computed property evaluates its name expression once: the
    /// first mention assigns into a temporary, later mentions (the
    /// `__decorate` call) read it back.
    fn emit_decorated_member_name(&mut self, name: NodeIndex, member_idx: NodeIndex) {
        let member_is_decorated = self.member_decorators(member_idx).is_some();
        if !member_is_decorated {
            self.emit(name);
            return;
        }
        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        self.record_temp_declaration(temp.clone());
        self.computed_property_temps.insert(name, temp.clone());
        let expr = self
            .arena
            .get(name)
            .and_then(|n| self.arena.get_wrapped_expr(n))
            .map(|w| w.expression)
            .unwrap_or(NodeIndex::NONE);
        self.write("[");
        self.write(&temp);
        self.write(" = ");
        self.emit_expression(expr);
        self.write("]");
    }

    // =========================================================================
    // Member classification
    // =========================================================================

    pub(super) fn find_constructor(&self, members: &[NodeIndex]) -> Option<NodeIndex> {
        members.iter().copied().find(|&m| {
            self.arena.kind(m) == SyntaxKind::Constructor
                && self
                    .arena
                    .get(m)
                    .and_then(|n| self.arena.get_function(n))
                    .is_some_and(|f| f.body.is_some())
        })
    }

    pub(super) fn instance_property_initializers(&self, members: &[NodeIndex]) -> Vec<NodeIndex> {
        members
            .iter()
            .copied()
            .filter(|&m| {
                self.arena.kind(m) == SyntaxKind::PropertyDeclaration
                    && !self.arena.has_flag(m, node_flags::STATIC)
                    && self
                        .arena
                        .get(m)
                        .and_then(|n| self.arena.get_property_decl(n))
                        .is_some_and(|p| p.initializer.is_some())
            })
            .collect()
    }

    fn static_property_initializers(&self, class_idx: NodeIndex) -> Vec<NodeIndex> {
        let members = self
            .arena
            .get(class_idx)
            .and_then(|n| self.arena.get_class(n))
            .map(|c| c.members.nodes.clone())
            .unwrap_or_default();
        members
            .iter()
            .copied()
            .filter(|&m| {
                self.arena.kind(m) == SyntaxKind::PropertyDeclaration
                    && self.arena.has_flag(m, node_flags::STATIC)
                    && self
                        .arena
                        .get(m)
                        .and_then(|n| self.arena.get_property_decl(n))
                        .is_some_and(|p| p.initializer.is_some())
            })
            .collect()
    }

    /// Names of constructor parameters carrying accessibility modifiers;
    /// each expands to a `this.x = x;` assignment.
    fn parameter_property_names(&self, ctor_idx: NodeIndex) -> Vec<String> {
        let params = self
            .arena
            .get(ctor_idx)
            .and_then(|n| self.arena.get_function(n))
            .map(|f| f.parameters.nodes.clone())
            .unwrap_or_default();
        params
            .iter()
            .filter(|&&p| self.arena.has_flag(p, node_flags::ACCESSIBILITY))
            .filter_map(|&p| {
                self.arena
                    .get(p)
                    .and_then(|n| self.arena.get_parameter(n))
                    .map(|param| self.arena.identifier_text(param.name).to_string())
            })
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Body-less members (overloads, signatures) emit only their comments.
    /// The original emitter's `MethodSignature` branch compared the wrong
    /// node's kind; the observable behavior — no body, no output — is what
    /// matters and is preserved here.
    pub(super) fn should_emit_member_body(&mut self, member: &Node, body: NodeIndex) -> bool {
        if body.is_some() {
            return true;
        }
        if !member.has_flag(node_flags::AMBIENT) {
            self.error_on_node(
                member,
                quill_common::diagnostics::codes::FUNCTION_IMPLEMENTATION_MISSING,
                "Function implementation is missing or not immediately following the declaration.",
            );
        }
        false
    }
}
