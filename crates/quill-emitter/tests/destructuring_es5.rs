mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};

#[test]
fn test_object_pattern_with_default() {
    let mut ast = Ast::new();
    // let { a, b = 2 } = obj;
    let a = ast.id("a");
    let a_el = ast.binding_element(a, NodeIndex::NONE);
    let b = ast.id("b");
    let two = ast.num("2");
    let b_el = ast.binding_element(b, two);
    let pattern = ast.object_pattern(vec![a_el, b_el]);
    let obj = ast.id("obj");
    let decl = ast.var_decl(pattern, obj);
    let stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("var a = obj.a, _a = obj.b, b = _a === void 0 ? 2 : _a;"));
}

#[test]
fn test_non_identifier_value_is_evaluated_once() {
    let mut ast = Ast::new();
    // let { a, b } = make();
    let a = ast.id("a");
    let a_el = ast.binding_element(a, NodeIndex::NONE);
    let b = ast.id("b");
    let b_el = ast.binding_element(b, NodeIndex::NONE);
    let pattern = ast.object_pattern(vec![a_el, b_el]);
    let make = ast.call_named("make", vec![]);
    let decl = ast.var_decl(pattern, make);
    let stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("var _a = make(), a = _a.a, b = _a.b;"));
    assert_eq!(out.matches("make()").count(), 1);
}

#[test]
fn test_renamed_property_and_nested_pattern() {
    let mut ast = Ast::new();
    // let { p: q, r: { s } } = obj;
    let p = ast.id("p");
    let q = ast.id("q");
    let q_el = ast
        .arena
        .add_binding_element(0, 0, p, q, NodeIndex::NONE);
    let s = ast.id("s");
    let s_el = ast.binding_element(s, NodeIndex::NONE);
    let inner = ast.object_pattern(vec![s_el]);
    let r = ast.id("r");
    let inner_el = ast
        .arena
        .add_binding_element(0, 0, r, inner, NodeIndex::NONE);
    let pattern = ast.object_pattern(vec![q_el, inner_el]);
    let obj = ast.id("obj");
    let decl = ast.var_decl(pattern, obj);
    let stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    // Renames extract through the property name; the nested pattern reads
    // its source through a temp.
    assert!(out.contains("q = obj.p"));
    assert!(out.contains("_a = obj.r"));
    assert!(out.contains("s = _a.s"));
}

#[test]
fn test_array_pattern_with_holes_and_rest() {
    let mut ast = Ast::new();
    // let [p, , ...rest] = xs;
    let p = ast.id("p");
    let p_el = ast.binding_element(p, NodeIndex::NONE);
    let hole = ast.arena.add_token(SyntaxKind::OmittedExpression, 0, 0);
    let hole_el = ast.binding_element(hole, NodeIndex::NONE);
    let rest = ast.id("rest");
    let rest_el = ast.binding_element(rest, NodeIndex::NONE);
    ast.arena.add_flags(rest_el, node_flags::REST);
    let pattern = ast.array_pattern(vec![p_el, hole_el, rest_el]);
    let xs = ast.id("xs");
    let decl = ast.var_decl(pattern, xs);
    let stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("var p = xs[0], rest = xs.slice(2);"));
}

#[test]
fn test_destructuring_assignment_statement() {
    let mut ast = Ast::new();
    // ({ a } = obj);  as a statement: no temp, no wrapping value
    let a_ref = ast.id("a");
    let shorthand = ast.arena.add_property_assignment(
        SyntaxKind::ShorthandPropertyAssignment,
        0,
        0,
        a_ref,
        NodeIndex::NONE,
    );
    let target = ast.object(vec![shorthand]);
    let obj = ast.id("obj");
    let assign = ast.assign(target, obj);
    let stmt = ast.expr_stmt(assign);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("a = obj.a;"));
    assert!(!out.contains("var _"));
}

#[test]
fn test_destructuring_assignment_in_value_position() {
    let mut ast = Ast::new();
    // f([a] = xs);  the assignment's value is observable
    let a_ref = ast.id("a");
    let target = ast.array(vec![a_ref]);
    let xs = ast.id("xs");
    let assign = ast.assign(target, xs);
    let call = ast.call_named("f", vec![assign]);
    let stmt = ast.expr_stmt(call);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("f((a = xs[0], xs));"));
}

#[test]
fn test_array_assignment_with_default() {
    let mut ast = Ast::new();
    // [a = 1] = xs;
    let a_ref = ast.id("a");
    let one = ast.num("1");
    let with_default = ast.assign(a_ref, one);
    let target = ast.array(vec![with_default]);
    let xs = ast.id("xs");
    let assign = ast.assign(target, xs);
    let stmt = ast.expr_stmt(assign);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("_a = xs[0], a = _a === void 0 ? 1 : _a;"));
    // The temporary is hoisted into a var prelude.
    assert!(out.contains("var _a;"));
}
