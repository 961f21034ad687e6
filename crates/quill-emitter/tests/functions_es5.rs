mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};
use quill_common::CompilerOptions;
use quill_emitter::resolver::check_flags;

#[test]
fn test_default_parameter_prelude() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let one = ast.num("1");
    let param = ast.param_with_init(x, one);
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![param], body);
    let file = ast.source_file(vec![func]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function f(x) {"));
    assert!(out.contains("if (x === void 0) { x = 1; }"));
}

#[test]
fn test_default_parameter_stays_inline_at_es6() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let one = ast.num("1");
    let param = ast.param_with_init(x, one);
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![param], body);
    let file = ast.source_file(vec![func]);
    let out = print_es6(&ast, file);

    assert!(out.contains("function f(x = 1) {"));
    assert!(!out.contains("void 0"));
}

#[test]
fn test_rest_parameter_prelude() {
    let mut ast = Ast::new();
    let head = ast.id("head");
    let head_param = ast.param(head);
    let rest = ast.id("rest");
    let rest_param = ast.param(rest);
    ast.arena.add_flags(rest_param, node_flags::REST);
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![head_param, rest_param], body);
    let file = ast.source_file(vec![func]);
    let out = print_es5(&ast, file);

    // The rest parameter leaves the signature.
    assert!(out.contains("function f(head) {"));
    assert!(out.contains("var rest = [];"));
    assert!(out.contains("for (var _i = 1; _i < arguments.length; _i++) {"));
    assert!(out.contains("rest[_i - 1] = arguments[_i];"));
}

#[test]
fn test_rest_parameter_at_index_zero() {
    let mut ast = Ast::new();
    let rest = ast.id("args");
    let rest_param = ast.param(rest);
    ast.arena.add_flags(rest_param, node_flags::REST);
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![rest_param], body);
    let file = ast.source_file(vec![func]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function f() {"));
    assert!(out.contains("args[_i] = arguments[_i];"));
}

#[test]
fn test_destructuring_parameter_gets_a_temp() {
    let mut ast = Ast::new();
    let a = ast.id("a");
    let a_el = ast.binding_element(a, NodeIndex::NONE);
    let pattern = ast.object_pattern(vec![a_el]);
    let param = ast.param(pattern);
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![param], body);
    let file = ast.source_file(vec![func]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function f(_a) {"));
    assert!(out.contains("var a = _a.a;"));
}

#[test]
fn test_arrow_lowers_to_function_with_this_capture() {
    let mut ast = Ast::new();

    // function outer() { var cb = () => this; }
    let this_kw = ast.arena.add_token(SyntaxKind::ThisKeyword, 0, 0);
    let arrow = ast.arrow(vec![], this_kw);
    let cb = ast.id("cb");
    let decl = ast.var_decl(cb, arrow);
    let stmt = ast.var_stmt(0, vec![decl]);
    let body = ast.block(vec![stmt]);
    let outer = ast.function_decl("outer", vec![], body);
    let file = ast.source_file(vec![outer]);

    let mut resolver = StubResolver::default();
    resolver
        .check_flags
        .insert(outer, check_flags::CAPTURE_THIS);
    resolver.check_flags.insert(arrow, check_flags::LEXICAL_THIS);

    let out = print_with_resolver(&ast, file, &resolver, &CompilerOptions::es5());

    assert!(out.contains("var _this = this;"));
    assert!(out.contains("var cb = function () {"));
    assert!(out.contains("return _this;"));
    assert!(!out.contains("=>"));
}

#[test]
fn test_this_inside_regular_function_is_not_substituted() {
    let mut ast = Ast::new();
    let this_kw = ast.arena.add_token(SyntaxKind::ThisKeyword, 0, 0);
    let ret = ast.ret(this_kw);
    let inner_body = ast.block(vec![ret]);
    let inner = ast.function_expr(vec![], inner_body);
    let cb = ast.id("cb");
    let decl = ast.var_decl(cb, inner);
    let stmt = ast.var_stmt(0, vec![decl]);
    let arrow_body = ast.block(vec![stmt]);
    let arrow = ast.arrow(vec![], arrow_body);
    let f = ast.id("f");
    let decl2 = ast.var_decl(f, arrow);
    let stmt2 = ast.var_stmt(0, vec![decl2]);
    let file = ast.source_file(vec![stmt2]);
    let out = print_es5(&ast, file);

    // The arrow becomes a function, but the inner function keeps its own
    // `this`.
    assert!(out.contains("return this;"));
}

#[test]
fn test_concise_arrow_body_returns_expression() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let x_param = ast.param(x);
    let x_ref = ast.id("x");
    let one = ast.num("1");
    let sum = ast.binary(x_ref, SyntaxKind::PlusToken, one);
    let arrow = ast.arrow(vec![x_param], sum);
    let f = ast.id("f");
    let decl = ast.var_decl(f, arrow);
    let stmt = ast.var_stmt(0, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("var f = function (x) {"));
    assert!(out.contains("return x + 1;"));
}

#[test]
fn test_function_without_body_reports_a_diagnostic() {
    let mut ast = Ast::new();
    let name = ast.id("f");
    let func = ast.arena.add_function(
        SyntaxKind::FunctionDeclaration,
        0,
        0,
        name,
        quill_ast::NodeList::new(vec![]),
        NodeIndex::NONE,
        None,
    );
    let file = ast.source_file(vec![func]);

    let output = quill_emitter::print_source_file(
        &ast.arena,
        file,
        &quill_emitter::NullResolver,
        &CompilerOptions::es5(),
    );
    assert!(!output.code.contains("function"));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, 2391);
}

#[test]
fn test_temp_names_reset_between_sibling_functions() {
    let mut ast = Ast::new();

    // Two functions each destructure a parameter: both can use `_a`.
    let mut make_func = |ast: &mut Ast, fname: &str, binding: &str| {
        let b = ast.id(binding);
        let el = ast.binding_element(b, NodeIndex::NONE);
        let pattern = ast.object_pattern(vec![el]);
        let param = ast.param(pattern);
        let body = ast.block(vec![]);
        ast.function_decl(fname, vec![param], body)
    };
    let f = make_func(&mut ast, "f", "a");
    let g = make_func(&mut ast, "g", "b");
    let file = ast.source_file(vec![f, g]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function f(_a) {"));
    assert!(out.contains("function g(_a) {"));
}
