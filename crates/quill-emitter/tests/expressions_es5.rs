mod common;

use common::*;
use quill_ast::{NodeIndex, SyntaxKind};

#[test]
fn test_array_spread_lowers_to_concat() {
    let mut ast = Ast::new();
    let one = ast.num("1");
    let a = ast.id("a");
    let spread = ast.spread(a);
    let two = ast.num("2");
    let arr = ast.array(vec![one, spread, two]);
    let stmt = ast.expr_stmt(arr);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("[1].concat(a, [2]);"));
}

#[test]
fn test_lone_array_spread_copies() {
    let mut ast = Ast::new();
    let a = ast.id("a");
    let spread = ast.spread(a);
    let arr = ast.array(vec![spread]);
    let stmt = ast.expr_stmt(arr);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("a.slice();"));
}

#[test]
fn test_call_spread_on_free_function() {
    let mut ast = Ast::new();
    let xs = ast.id("xs");
    let spread = ast.spread(xs);
    let call = ast.call_named("f", vec![spread]);
    let stmt = ast.expr_stmt(call);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("f.apply(void 0, xs);"));
}

#[test]
fn test_call_spread_on_method_reuses_stable_receiver() {
    let mut ast = Ast::new();
    let o = ast.id("o");
    let m = ast.prop_access(o, "m");
    let one = ast.num("1");
    let xs = ast.id("xs");
    let spread = ast.spread(xs);
    let call = ast.call(m, vec![one, spread]);
    let stmt = ast.expr_stmt(call);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("o.m.apply(o, [1].concat(xs));"));
}

#[test]
fn test_call_spread_captures_unstable_receiver() {
    let mut ast = Ast::new();
    let make = ast.call_named("make", vec![]);
    let m = ast.prop_access(make, "m");
    let xs = ast.id("xs");
    let spread = ast.spread(xs);
    let call = ast.call(m, vec![spread]);
    let stmt = ast.expr_stmt(call);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("(_a = make()).m.apply(_a, xs);"));
    assert!(out.contains("var _a;"));
}

#[test]
fn test_shorthand_property_expands_below_es6() {
    let mut ast = Ast::new();
    let a_ref = ast.id("a");
    let shorthand = ast.arena.add_property_assignment(
        SyntaxKind::ShorthandPropertyAssignment,
        0,
        0,
        a_ref,
        NodeIndex::NONE,
    );
    let obj = ast.object(vec![shorthand]);
    let stmt = ast.expr_stmt(obj);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("{ a: a };"));
}

#[test]
fn test_computed_property_lowers_to_comma_expression() {
    let mut ast = Ast::new();
    let a_prop = {
        let one = ast.num("1");
        ast.prop("a", one)
    };
    let k = ast.id("k");
    let computed = ast
        .arena
        .add_wrapped_expr(SyntaxKind::ComputedPropertyName, 0, 0, k);
    let two = ast.num("2");
    let computed_prop = ast.arena.add_property_assignment(
        SyntaxKind::PropertyAssignment,
        0,
        0,
        computed,
        two,
    );
    let obj = ast.object(vec![a_prop, computed_prop]);
    let stmt = ast.expr_stmt(obj);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("(_a = { a: 1 }, _a[k] = 2, _a);"));
    assert!(out.contains("var _a;"));
}

#[test]
fn test_type_assertion_peels_away() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let assertion = ast
        .arena
        .add_wrapped_expr(SyntaxKind::TypeAssertionExpression, 0, 0, x);
    let call = ast.call_named("f", vec![assertion]);
    let stmt = ast.expr_stmt(call);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("f(x);"));
}

#[test]
fn test_operator_spacing_and_unary_merging() {
    let mut ast = Ast::new();
    let a = ast.id("a");
    let b = ast.id("b");
    let in_expr = ast.binary(a, SyntaxKind::InKeyword, b);
    let stmt1 = ast.expr_stmt(in_expr);

    let c = ast.id("c");
    let neg_inner = ast.arena.add_unary_expr(
        SyntaxKind::PrefixUnaryExpression,
        0,
        0,
        SyntaxKind::MinusToken,
        c,
    );
    let neg_outer = ast.arena.add_unary_expr(
        SyntaxKind::PrefixUnaryExpression,
        0,
        0,
        SyntaxKind::MinusToken,
        neg_inner,
    );
    let stmt2 = ast.expr_stmt(neg_outer);

    let file = ast.source_file(vec![stmt1, stmt2]);
    let out = print_es5(&ast, file);

    assert!(out.contains("a in b;"));
    assert!(out.contains("- -c;"));
    assert!(!out.contains("--c"));
}

#[test]
fn test_conditional_and_comma_formatting() {
    let mut ast = Ast::new();
    let c = ast.id("c");
    let one = ast.num("1");
    let two = ast.num("2");
    let cond = ast.arena.add_conditional_expr(0, 0, c, one, two);
    let stmt1 = ast.expr_stmt(cond);

    let x = ast.id("x");
    let y = ast.id("y");
    let comma = ast.binary(x, SyntaxKind::CommaToken, y);
    let stmt2 = ast.expr_stmt(comma);

    let file = ast.source_file(vec![stmt1, stmt2]);
    let out = print_es5(&ast, file);

    assert!(out.contains("c ? 1 : 2;"));
    assert!(out.contains("x, y;"));
}

#[test]
fn test_string_literal_escaping() {
    let mut ast = Ast::new();
    let lit = ast.str_lit("a\"b\nc\\d");
    let stmt = ast.expr_stmt(lit);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("\"a\\\"b\\nc\\\\d\";"));
}
