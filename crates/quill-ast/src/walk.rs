//! Child enumeration for arena nodes.
//!
//! Used by prepass scans (helper detection, reference checks) that need to
//! visit a subtree without knowing each kind's data layout.

use crate::arena::NodeArena;
use crate::node::{NodeIndex, NodeList};
use crate::syntax_kind::SyntaxKind;

fn one(child: NodeIndex, f: &mut dyn FnMut(NodeIndex)) {
    if child.is_some() {
        f(child);
    }
}

fn list(list: &NodeList, f: &mut dyn FnMut(NodeIndex)) {
    for &child in &list.nodes {
        if child.is_some() {
            f(child);
        }
    }
}

/// Invoke `f` for each direct child of `idx`, in source order.
pub fn for_each_child(arena: &NodeArena, idx: NodeIndex, f: &mut dyn FnMut(NodeIndex)) {
    let Some(node) = arena.get(idx) else {
        return;
    };

    match node.kind {
        SyntaxKind::QualifiedName => {
            if let Some(data) = arena.get_qualified_name(node) {
                one(data.left, f);
                one(data.right, f);
            }
        }
        SyntaxKind::TemplateExpression => {
            if let Some(data) = arena.get_template_expr(node) {
                one(data.head, f);
                list(&data.spans, f);
            }
        }
        SyntaxKind::TemplateSpan => {
            if let Some(data) = arena.get_template_span(node) {
                one(data.expression, f);
                one(data.literal, f);
            }
        }
        SyntaxKind::TaggedTemplateExpression => {
            if let Some(data) = arena.get_tagged_template(node) {
                one(data.tag, f);
                one(data.template, f);
            }
        }
        SyntaxKind::BinaryExpression => {
            if let Some(data) = arena.get_binary_expr(node) {
                one(data.left, f);
                one(data.right, f);
            }
        }
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression => {
            if let Some(data) = arena.get_unary_expr(node) {
                one(data.operand, f);
            }
        }
        SyntaxKind::PropertyAccessExpression | SyntaxKind::ElementAccessExpression => {
            if let Some(data) = arena.get_access_expr(node) {
                one(data.expression, f);
                one(data.member, f);
            }
        }
        SyntaxKind::CallExpression | SyntaxKind::NewExpression => {
            if let Some(data) = arena.get_call_expr(node) {
                one(data.expression, f);
                list(&data.arguments, f);
            }
        }
        SyntaxKind::ParenthesizedExpression
        | SyntaxKind::TypeAssertionExpression
        | SyntaxKind::SpreadElement
        | SyntaxKind::ComputedPropertyName
        | SyntaxKind::DeleteExpression
        | SyntaxKind::TypeOfExpression
        | SyntaxKind::VoidExpression
        | SyntaxKind::YieldExpression
        | SyntaxKind::ExpressionStatement
        | SyntaxKind::ExternalModuleReference
        | SyntaxKind::ExpressionWithTypeArguments
        | SyntaxKind::Decorator
        | SyntaxKind::ExportAssignment => {
            if let Some(data) = arena.get_wrapped_expr(node) {
                one(data.expression, f);
            }
        }
        SyntaxKind::ConditionalExpression => {
            if let Some(data) = arena.get_conditional_expr(node) {
                one(data.condition, f);
                one(data.when_true, f);
                one(data.when_false, f);
            }
        }
        SyntaxKind::ArrayLiteralExpression | SyntaxKind::ObjectLiteralExpression => {
            if let Some(data) = arena.get_literal_expr(node) {
                list(&data.elements, f);
            }
        }
        SyntaxKind::FunctionDeclaration
        | SyntaxKind::FunctionExpression
        | SyntaxKind::ArrowFunction
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::MethodSignature
        | SyntaxKind::Constructor
        | SyntaxKind::GetAccessor
        | SyntaxKind::SetAccessor => {
            if let Some(data) = arena.get_function(node) {
                if let Some(decorators) = &data.decorators {
                    list(decorators, f);
                }
                one(data.name, f);
                list(&data.parameters, f);
                one(data.body, f);
            }
        }
        SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => {
            if let Some(data) = arena.get_class(node) {
                if let Some(decorators) = &data.decorators {
                    list(decorators, f);
                }
                one(data.name, f);
                one(data.base, f);
                list(&data.members, f);
            }
        }
        SyntaxKind::PropertyDeclaration | SyntaxKind::PropertySignature => {
            if let Some(data) = arena.get_property_decl(node) {
                if let Some(decorators) = &data.decorators {
                    list(decorators, f);
                }
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::Parameter => {
            if let Some(data) = arena.get_parameter(node) {
                if let Some(decorators) = &data.decorators {
                    list(decorators, f);
                }
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::EnumDeclaration => {
            if let Some(data) = arena.get_enum(node) {
                one(data.name, f);
                list(&data.members, f);
            }
        }
        SyntaxKind::EnumMember => {
            if let Some(data) = arena.get_enum_member(node) {
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::ModuleDeclaration => {
            if let Some(data) = arena.get_module(node) {
                one(data.name, f);
                one(data.body, f);
            }
        }
        SyntaxKind::Block | SyntaxKind::ModuleBlock => {
            if let Some(data) = arena.get_block(node) {
                list(&data.statements, f);
            }
        }
        SyntaxKind::VariableStatement | SyntaxKind::VariableDeclarationList => {
            if let Some(data) = arena.get_variable(node) {
                list(&data.declarations, f);
            }
        }
        SyntaxKind::VariableDeclaration => {
            if let Some(data) = arena.get_variable_declaration(node) {
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
            if let Some(data) = arena.get_binding_pattern(node) {
                list(&data.elements, f);
            }
        }
        SyntaxKind::BindingElement => {
            if let Some(data) = arena.get_binding_element(node) {
                one(data.property_name, f);
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::PropertyAssignment | SyntaxKind::ShorthandPropertyAssignment => {
            if let Some(data) = arena.get_property_assignment(node) {
                one(data.name, f);
                one(data.initializer, f);
            }
        }
        SyntaxKind::IfStatement => {
            if let Some(data) = arena.get_if_statement(node) {
                one(data.expression, f);
                one(data.then_statement, f);
                one(data.else_statement, f);
            }
        }
        SyntaxKind::ForStatement | SyntaxKind::WhileStatement | SyntaxKind::DoStatement => {
            if let Some(data) = arena.get_loop(node) {
                one(data.initializer, f);
                one(data.condition, f);
                one(data.incrementor, f);
                one(data.statement, f);
            }
        }
        SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => {
            if let Some(data) = arena.get_for_in_of(node) {
                one(data.initializer, f);
                one(data.expression, f);
                one(data.statement, f);
            }
        }
        SyntaxKind::ReturnStatement | SyntaxKind::ThrowStatement => {
            if let Some(data) = arena.get_return(node) {
                one(data.expression, f);
            }
        }
        SyntaxKind::SwitchStatement => {
            if let Some(data) = arena.get_switch(node) {
                one(data.expression, f);
                list(&data.clauses, f);
            }
        }
        SyntaxKind::CaseClause | SyntaxKind::DefaultClause => {
            if let Some(data) = arena.get_case_clause(node) {
                one(data.expression, f);
                list(&data.statements, f);
            }
        }
        SyntaxKind::TryStatement => {
            if let Some(data) = arena.get_try(node) {
                one(data.try_block, f);
                one(data.catch_clause, f);
                one(data.finally_block, f);
            }
        }
        SyntaxKind::CatchClause => {
            if let Some(data) = arena.get_catch_clause(node) {
                one(data.variable_declaration, f);
                one(data.block, f);
            }
        }
        SyntaxKind::LabeledStatement
        | SyntaxKind::BreakStatement
        | SyntaxKind::ContinueStatement => {
            if let Some(data) = arena.get_labeled(node) {
                one(data.label, f);
                one(data.statement, f);
            }
        }
        SyntaxKind::ImportDeclaration => {
            if let Some(data) = arena.get_import_decl(node) {
                one(data.import_clause, f);
                one(data.module_specifier, f);
            }
        }
        SyntaxKind::ImportClause => {
            if let Some(data) = arena.get_import_clause(node) {
                one(data.name, f);
                one(data.named_bindings, f);
            }
        }
        SyntaxKind::NamespaceImport => {
            if let Some(data) = arena.get_name_data(node) {
                one(data.name, f);
            }
        }
        SyntaxKind::NamedImports | SyntaxKind::NamedExports => {
            if let Some(data) = arena.get_named_bindings(node) {
                list(&data.elements, f);
            }
        }
        SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier => {
            if let Some(data) = arena.get_specifier(node) {
                one(data.property_name, f);
                one(data.name, f);
            }
        }
        SyntaxKind::ExportDeclaration => {
            if let Some(data) = arena.get_export_decl(node) {
                one(data.export_clause, f);
                one(data.module_specifier, f);
            }
        }
        SyntaxKind::ImportEqualsDeclaration => {
            if let Some(data) = arena.get_import_equals(node) {
                one(data.name, f);
                one(data.module_reference, f);
            }
        }
        SyntaxKind::SourceFile => {
            if let Some(data) = arena.get_source_file(node) {
                list(&data.statements, f);
            }
        }
        _ => {}
    }
}

/// Depth-first traversal of the subtree rooted at `idx` (excluding `idx`).
pub fn walk_descendants(arena: &NodeArena, idx: NodeIndex, f: &mut dyn FnMut(NodeIndex)) {
    let mut stack = Vec::new();
    for_each_child(arena, idx, &mut |child| stack.push(child));
    stack.reverse();
    while let Some(next) = stack.pop() {
        f(next);
        let mut children = Vec::new();
        for_each_child(arena, next, &mut |child| children.push(child));
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
}
