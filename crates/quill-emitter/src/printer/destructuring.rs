use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};

use super::{temp_flags, Printer};

/// A right-hand value the pattern walker can re-emit cheaply: the original
/// expression node, a manufactured name, or an index into one of those.
#[derive(Clone)]
pub(super) enum DestructuringValue {
    Node(NodeIndex),
    Name(String),
    Indexed(Box<DestructuringValue>, String),
}

struct DestructuringState {
    emitted: usize,
    is_declaration: bool,
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Destructuring lowering
    // =========================================================================

    pub(super) fn emit_destructuring_value(&mut self, value: &DestructuringValue) {
        match value {
            DestructuringValue::Node(idx) => self.emit_expression(*idx),
            DestructuringValue::Name(name) => {
                let name = name.clone();
                self.write(&name);
            }
            DestructuringValue::Indexed(base, index) => {
                let index = index.clone();
                self.emit_destructuring_value(base);
                self.write("[");
                self.write(&index);
                self.write("]");
            }
        }
    }

    /// `let { a, b = 2 } = obj` in a declaration list: emits the
    /// comma-separated pieces after the caller's `var` keyword:
    /// `a = obj.a, _b = obj.b, b = _b === void 0 ? 2 : _b`.
    pub(super) fn emit_destructuring_declaration(
        &mut self,
        pattern: NodeIndex,
        initializer: NodeIndex,
    ) {
        let value = if initializer.is_some() {
            DestructuringValue::Node(initializer)
        } else {
            DestructuringValue::Name("void 0".to_string())
        };
        self.emit_destructuring_declaration_value(pattern, value);
    }

    /// Same, with a caller-supplied value (the `for-of` element).
    pub(super) fn emit_destructuring_declaration_value(
        &mut self,
        pattern: NodeIndex,
        value: DestructuringValue,
    ) {
        let mut state = DestructuringState {
            emitted: 0,
            is_declaration: true,
        };
        self.destructure_binding_pattern(pattern, value, &mut state);
    }

    /// Assignment-context destructuring: `({ a } = obj)`. When the value of
    /// the whole expression is observable, the right-hand side is captured so
    /// it can be produced at the end: `(_a = obj, a = _a.a, _a)`.
    pub(super) fn emit_destructuring_assignment(
        &mut self,
        target: NodeIndex,
        value_node: NodeIndex,
        standalone: bool,
    ) {
        let mut state = DestructuringState {
            emitted: 0,
            is_declaration: false,
        };
        if standalone {
            let value = DestructuringValue::Node(value_node);
            self.destructure_assignment_target(target, value, &mut state);
        } else {
            self.write("(");
            let value =
                self.ensure_identifier(DestructuringValue::Node(value_node), true, &mut state);
            self.destructure_assignment_target(target, value.clone(), &mut state);
            self.write(", ");
            self.emit_destructuring_value(&value);
            self.write(")");
        }
    }

    pub(super) fn emit_destructuring_assignment_from_value(
        &mut self,
        target: NodeIndex,
        value: DestructuringValue,
    ) {
        let mut state = DestructuringState {
            emitted: 0,
            is_declaration: false,
        };
        self.destructure_assignment_target(target, value, &mut state);
    }

    // =========================================================================
    // Shared machinery
    // =========================================================================

    fn write_separator(&mut self, state: &mut DestructuringState) {
        if state.emitted > 0 {
            self.write(", ");
        }
        state.emitted += 1;
    }

    /// Values referenced more than once are evaluated exactly once: anything
    /// that is not already an identifier or a manufactured name is captured
    /// into a temporary. In declaration context the temporary joins the
    /// `var` list being emitted; in expression context it is hoisted to the
    /// function's `var t1, t2;` prelude.
    fn ensure_identifier(
        &mut self,
        value: DestructuringValue,
        force: bool,
        state: &mut DestructuringState,
    ) -> DestructuringValue {
        let already_simple = match &value {
            DestructuringValue::Name(_) => true,
            DestructuringValue::Node(idx) => {
                self.arena.kind(*idx) == SyntaxKind::Identifier
                    && self
                        .resolver
                        .get_expression_name_substitution(*idx)
                        .is_none()
            }
            DestructuringValue::Indexed(..) => false,
        };
        if already_simple && !force {
            return value;
        }
        if already_simple && force {
            if let DestructuringValue::Node(idx) = &value {
                // A plain identifier needs no capture even when forced.
                let text = self.arena.identifier_text(*idx).to_string();
                if !text.is_empty() {
                    return DestructuringValue::Name(text);
                }
            }
            if let DestructuringValue::Name(_) = &value {
                return value;
            }
        }

        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        if !state.is_declaration {
            self.record_temp_declaration(temp.clone());
        }
        self.write_separator(state);
        self.write(&temp);
        self.write(" = ");
        self.emit_destructuring_value(&value);
        DestructuringValue::Name(temp)
    }

    /// `value === void 0 ? default : value`, capturing `value` first so the
    /// check and the result read the same evaluation.
    fn with_default_value(
        &mut self,
        value: DestructuringValue,
        default: NodeIndex,
        state: &mut DestructuringState,
    ) -> DefaultedValue {
        let captured = self.ensure_identifier(value, false, state);
        DefaultedValue {
            value: captured,
            default,
        }
    }

    fn emit_defaulted(&mut self, defaulted: &DefaultedValue) {
        self.emit_destructuring_value(&defaulted.value);
        self.write(" === void 0 ? ");
        self.emit_expression(defaulted.default);
        self.write(" : ");
        self.emit_destructuring_value(&defaulted.value);
    }

    fn property_of(
        &mut self,
        value: &DestructuringValue,
        name: NodeIndex,
    ) -> PendingAccess {
        let name_kind = self.arena.kind(name);
        match name_kind {
            SyntaxKind::Identifier => PendingAccess::Dot(
                value.clone(),
                self.arena.identifier_text(name).to_string(),
            ),
            _ => PendingAccess::Bracket(value.clone(), name),
        }
    }

    fn emit_pending_access(&mut self, access: &PendingAccess) {
        match access {
            PendingAccess::Dot(value, name) => {
                let name = name.clone();
                self.emit_destructuring_value(value);
                self.write(".");
                self.write(&name);
            }
            PendingAccess::Bracket(value, name) => {
                self.emit_destructuring_value(value);
                self.write("[");
                let name = *name;
                match self.arena.kind(name) {
                    SyntaxKind::ComputedPropertyName => {
                        let expr = self
                            .arena
                            .get(name)
                            .and_then(|n| self.arena.get_wrapped_expr(n))
                            .map(|w| w.expression)
                            .unwrap_or(NodeIndex::NONE);
                        self.emit_expression(expr);
                    }
                    _ => self.emit(name),
                }
                self.write("]");
            }
        }
    }

    /// Capture a property access into a temp so it can feed a default check,
    /// or pass it through as a one-shot emission when no default applies.
    fn access_as_value(
        &mut self,
        access: PendingAccess,
        needs_capture: bool,
        state: &mut DestructuringState,
    ) -> AccessOrValue {
        if !needs_capture {
            return AccessOrValue::Access(access);
        }
        let temp = self.make_temp_variable_name(temp_flags::AUTO);
        if !state.is_declaration {
            self.record_temp_declaration(temp.clone());
        }
        self.write_separator(state);
        self.write(&temp);
        self.write(" = ");
        self.emit_pending_access(&access);
        AccessOrValue::Value(DestructuringValue::Name(temp))
    }

    // =========================================================================
    // Declaration-context patterns
    // =========================================================================

    fn destructure_binding_pattern(
        &mut self,
        pattern: NodeIndex,
        value: DestructuringValue,
        state: &mut DestructuringState,
    ) {
        let Some(pattern_node) = self.arena.get(pattern) else {
            return;
        };
        let pattern_node = *pattern_node;
        let elements = self
            .arena
            .get_binding_pattern(&pattern_node)
            .map(|p| p.elements.nodes.clone())
            .unwrap_or_default();

        let value = if elements.len() == 1 {
            value
        } else {
            self.ensure_identifier(value, false, state)
        };

        let is_object = pattern_node.kind == SyntaxKind::ObjectBindingPattern;
        for (i, &element_idx) in elements.iter().enumerate() {
            let Some(element) = self
                .arena
                .get(element_idx)
                .and_then(|n| self.arena.get_binding_element(n))
            else {
                continue;
            };
            let (property_name, name, initializer) =
                (element.property_name, element.name, element.initializer);
            let is_rest = self.arena.has_flag(element_idx, node_flags::REST);

            if self.arena.kind(name) == SyntaxKind::OmittedExpression {
                continue;
            }

            let element_value = if is_object {
                let key = if property_name.is_some() {
                    property_name
                } else {
                    name
                };
                ElementSource::Access(self.property_of(&value, key))
            } else if is_rest {
                ElementSource::Slice(value.clone(), i)
            } else {
                ElementSource::Value(DestructuringValue::Indexed(
                    Box::new(value.clone()),
                    i.to_string(),
                ))
            };

            self.emit_binding_element_assignment(name, initializer, element_value, state);
        }
    }

    fn emit_binding_element_assignment(
        &mut self,
        name: NodeIndex,
        default: NodeIndex,
        source: ElementSource,
        state: &mut DestructuringState,
    ) {
        let name_is_pattern = matches!(
            self.arena.kind(name),
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
        );

        // A default or a nested pattern reads the extracted value more than
        // once, so it must live in a temp (or already be a value). All
        // captures emit their own `temp = …` piece before the target's
        // assignment piece starts.
        let needs_value = default.is_some() || name_is_pattern;
        let resolved: AccessOrValue = match source {
            ElementSource::Access(access) => self.access_as_value(access, needs_value, state),
            ElementSource::Value(value) => {
                if needs_value {
                    AccessOrValue::Value(self.ensure_identifier(value, false, state))
                } else {
                    AccessOrValue::Value(value)
                }
            }
            ElementSource::Slice(base, index) => AccessOrValue::Slice(base, index),
        };

        if name_is_pattern {
            let value = match resolved {
                AccessOrValue::Value(value) => {
                    if default.is_some() {
                        // Nested patterns re-read the value; fold the default
                        // into a temp first.
                        let defaulted = self.with_default_value(value, default, state);
                        let temp = self.make_temp_variable_name(temp_flags::AUTO);
                        if !state.is_declaration {
                            self.record_temp_declaration(temp.clone());
                        }
                        self.write_separator(state);
                        self.write(&temp);
                        self.write(" = ");
                        self.emit_defaulted(&defaulted);
                        DestructuringValue::Name(temp)
                    } else {
                        value
                    }
                }
                AccessOrValue::Slice(base, index) => {
                    DestructuringValue::Indexed(Box::new(base), index.to_string())
                }
                AccessOrValue::Access(_) => {
                    debug_assert!(false, "pattern element source was not captured");
                    return;
                }
            };
            self.destructure_binding_pattern(name, value, state);
            return;
        }

        let defaulted = match resolved {
            AccessOrValue::Value(value) if default.is_some() => {
                Some(self.with_default_value(value, default, state))
            }
            other => {
                // No capture needed; hold the source for the assignment.
                return self.emit_leaf_assignment(name, other, state);
            }
        };

        self.write_separator(state);
        if state.is_declaration {
            self.maybe_rename_block_scoped_binding(name);
        }
        self.emit(name);
        self.write(" = ");
        if let Some(defaulted) = defaulted {
            self.emit_defaulted(&defaulted);
        }
    }

    fn emit_leaf_assignment(
        &mut self,
        name: NodeIndex,
        source: AccessOrValue,
        state: &mut DestructuringState,
    ) {
        self.write_separator(state);
        if state.is_declaration {
            self.maybe_rename_block_scoped_binding(name);
        }
        self.emit(name);
        self.write(" = ");
        match source {
            AccessOrValue::Access(access) => self.emit_pending_access(&access),
            AccessOrValue::Value(value) => self.emit_destructuring_value(&value),
            AccessOrValue::Slice(base, index) => {
                self.emit_destructuring_value(&base);
                self.write(".slice(");
                self.write(&index.to_string());
                self.write(")");
            }
        }
    }

    // =========================================================================
    // Assignment-context patterns
    // =========================================================================

    fn destructure_assignment_target(
        &mut self,
        target: NodeIndex,
        value: DestructuringValue,
        state: &mut DestructuringState,
    ) {
        match self.arena.kind(target) {
            SyntaxKind::ObjectLiteralExpression => {
                self.destructure_object_assignment(target, value, state);
            }
            SyntaxKind::ArrayLiteralExpression => {
                self.destructure_array_assignment(target, value, state);
            }
            _ => {
                self.write_separator(state);
                self.emit_expression(target);
                self.write(" = ");
                self.emit_destructuring_value(&value);
            }
        }
    }

    fn destructure_object_assignment(
        &mut self,
        target: NodeIndex,
        value: DestructuringValue,
        state: &mut DestructuringState,
    ) {
        let properties = self
            .arena
            .get(target)
            .and_then(|n| self.arena.get_literal_expr(n))
            .map(|o| o.elements.nodes.clone())
            .unwrap_or_default();
        let value = if properties.len() == 1 {
            value
        } else {
            self.ensure_identifier(value, false, state)
        };

        for &prop_idx in &properties {
            let Some(prop_node) = self.arena.get(prop_idx) else {
                continue;
            };
            let prop_node = *prop_node;
            let Some(prop) = self.arena.get_property_assignment(&prop_node) else {
                continue;
            };
            let (name, initializer) = (prop.name, prop.initializer);
            let access = self.property_of(&value, name);
            let inner_target = if prop_node.kind == SyntaxKind::ShorthandPropertyAssignment
                || initializer.is_none()
            {
                name
            } else {
                initializer
            };

            // `{ a: x = 1 }` carries the default as an assignment expression.
            let (inner_target, default) =
                if self.arena.kind(inner_target) == SyntaxKind::BinaryExpression {
                    let data = self
                        .arena
                        .get(inner_target)
                        .and_then(|n| self.arena.get_binary_expr(n));
                    match data {
                        Some(b) if b.operator == SyntaxKind::EqualsToken => (b.left, b.right),
                        _ => (inner_target, NodeIndex::NONE),
                    }
                } else {
                    (inner_target, NodeIndex::NONE)
                };

            if default.is_some() {
                let AccessOrValue::Value(extracted) = self.access_as_value(access, true, state)
                else {
                    continue;
                };
                if matches!(
                    self.arena.kind(inner_target),
                    SyntaxKind::ObjectLiteralExpression | SyntaxKind::ArrayLiteralExpression
                ) {
                    let defaulted = self.with_default_value(extracted, default, state);
                    let temp = self.make_temp_variable_name(temp_flags::AUTO);
                    if !state.is_declaration {
                        self.record_temp_declaration(temp.clone());
                    }
                    self.write_separator(state);
                    self.write(&temp);
                    self.write(" = ");
                    self.emit_defaulted(&defaulted);
                    self.destructure_assignment_target(
                        inner_target,
                        DestructuringValue::Name(temp),
                        state,
                    );
                } else {
                    let defaulted = self.with_default_value(extracted, default, state);
                    self.write_separator(state);
                    self.emit_expression(inner_target);
                    self.write(" = ");
                    self.emit_defaulted(&defaulted);
                }
            } else {
                self.assign_to_target(inner_target, access, state);
            }
        }
    }

    fn destructure_array_assignment(
        &mut self,
        target: NodeIndex,
        value: DestructuringValue,
        state: &mut DestructuringState,
    ) {
        let elements = self
            .arena
            .get(target)
            .and_then(|n| self.arena.get_literal_expr(n))
            .map(|o| o.elements.nodes.clone())
            .unwrap_or_default();
        let value = if elements.len() == 1 {
            value
        } else {
            self.ensure_identifier(value, false, state)
        };

        for (i, &element_idx) in elements.iter().enumerate() {
            let kind = self.arena.kind(element_idx);
            if kind == SyntaxKind::OmittedExpression {
                continue;
            }
            if kind == SyntaxKind::SpreadElement {
                let inner = self
                    .arena
                    .get(element_idx)
                    .and_then(|n| self.arena.get_wrapped_expr(n))
                    .map(|w| w.expression)
                    .unwrap_or(NodeIndex::NONE);
                self.write_separator(state);
                self.emit_expression(inner);
                self.write(" = ");
                self.emit_destructuring_value(&value);
                self.write(".slice(");
                self.write(&i.to_string());
                self.write(")");
                continue;
            }
            let element_value =
                DestructuringValue::Indexed(Box::new(value.clone()), i.to_string());

            // `[a = 1]` carries the default as an assignment expression.
            let (inner_target, default) = if kind == SyntaxKind::BinaryExpression {
                let data = self
                    .arena
                    .get(element_idx)
                    .and_then(|n| self.arena.get_binary_expr(n));
                match data {
                    Some(b) if b.operator == SyntaxKind::EqualsToken => (b.left, b.right),
                    _ => (element_idx, NodeIndex::NONE),
                }
            } else {
                (element_idx, NodeIndex::NONE)
            };

            if matches!(
                self.arena.kind(inner_target),
                SyntaxKind::ObjectLiteralExpression | SyntaxKind::ArrayLiteralExpression
            ) {
                let value = if default.is_some() {
                    let defaulted = self.with_default_value(element_value, default, state);
                    let temp = self.make_temp_variable_name(temp_flags::AUTO);
                    if !state.is_declaration {
                        self.record_temp_declaration(temp.clone());
                    }
                    self.write_separator(state);
                    self.write(&temp);
                    self.write(" = ");
                    self.emit_defaulted(&defaulted);
                    DestructuringValue::Name(temp)
                } else {
                    element_value
                };
                self.destructure_assignment_target(inner_target, value, state);
            } else if default.is_some() {
                // Capture the element first so the default check and the
                // result read one evaluation.
                let defaulted = self.with_default_value(element_value, default, state);
                self.write_separator(state);
                self.emit_expression(inner_target);
                self.write(" = ");
                self.emit_defaulted(&defaulted);
            } else {
                self.write_separator(state);
                self.emit_expression(inner_target);
                self.write(" = ");
                self.emit_destructuring_value(&element_value);
            }
        }
    }

    fn assign_to_target(
        &mut self,
        target: NodeIndex,
        access: PendingAccess,
        state: &mut DestructuringState,
    ) {
        if matches!(
            self.arena.kind(target),
            SyntaxKind::ObjectLiteralExpression | SyntaxKind::ArrayLiteralExpression
        ) {
            let value = match self.access_as_value(access, true, state) {
                AccessOrValue::Value(value) => value,
                _ => return,
            };
            self.destructure_assignment_target(target, value, state);
            return;
        }
        self.write_separator(state);
        self.emit_expression(target);
        self.write(" = ");
        self.emit_pending_access(&access);
    }
}

struct DefaultedValue {
    value: DestructuringValue,
    default: NodeIndex,
}

enum PendingAccess {
    Dot(DestructuringValue, String),
    Bracket(DestructuringValue, NodeIndex),
}

enum ElementSource {
    Access(PendingAccess),
    Value(DestructuringValue),
    Slice(DestructuringValue, usize),
}

enum AccessOrValue {
    Access(PendingAccess),
    Value(DestructuringValue),
    Slice(DestructuringValue, usize),
}
