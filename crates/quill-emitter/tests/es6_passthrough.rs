mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};

#[test]
fn test_class_syntax_survives_at_es6() {
    let mut ast = Ast::new();
    let x_name = ast.id("x");
    let x_param = ast.param(x_name);
    ast.arena.add_flags(x_param, node_flags::PUBLIC);
    let body = ast.block(vec![]);
    let ctor = ast.constructor(vec![x_param], body);
    let m_body = ast.block(vec![]);
    let method = ast.method("m", vec![], m_body);
    let base = ast.id("Base");
    let class_c = ast.class_decl("C", base, vec![ctor, method]);
    let file = ast.source_file(vec![class_c]);
    let out = print_es6(&ast, file);

    assert!(out.contains("class C extends Base {"));
    assert!(out.contains("constructor(x) {"));
    // Parameter properties still expand: they are not ES2015 syntax.
    assert!(out.contains("this.x = x;"));
    assert!(out.contains("m() {"));
    assert!(!out.contains("__extends"));
    assert!(!out.contains("prototype"));
}

#[test]
fn test_synthesized_es6_constructor_spreads_args() {
    let mut ast = Ast::new();
    let y_name = ast.id("y");
    let one = ast.num("1");
    let prop = ast
        .arena
        .add_property_decl(SyntaxKind::PropertyDeclaration, 0, 0, y_name, one, None);
    let base = ast.id("Base");
    let class_c = ast.class_decl("C", base, vec![prop]);
    let file = ast.source_file(vec![class_c]);
    let out = print_es6(&ast, file);

    assert!(out.contains("constructor(...args) {"));
    assert!(out.contains("super(...args);"));
    assert!(out.contains("this.y = 1;"));
}

#[test]
fn test_derived_class_without_members_still_forwards_to_base() {
    let mut ast = Ast::new();
    let base = ast.id("Base");
    let class_c = ast.class_decl("C", base, vec![]);
    let file = ast.source_file(vec![class_c]);
    let out = print_es6(&ast, file);

    assert!(out.contains("class C extends Base {"));
    assert!(out.contains("constructor(...args) {"));
    assert!(out.contains("super(...args);"));
}

#[test]
fn test_let_and_const_keywords_survive_at_es6() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let one = ast.num("1");
    let decl = ast.var_decl(x, one);
    let let_stmt = ast.var_stmt(node_flags::LET, vec![decl]);

    let y = ast.id("y");
    let two = ast.num("2");
    let decl2 = ast.var_decl(y, two);
    let const_stmt = ast.var_stmt(node_flags::CONST, vec![decl2]);

    let file = ast.source_file(vec![let_stmt, const_stmt]);
    let out = print_es6(&ast, file);

    assert!(out.contains("let x = 1;"));
    assert!(out.contains("const y = 2;"));
}

#[test]
fn test_let_lowers_to_var_below_es6() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let one = ast.num("1");
    let decl = ast.var_decl(x, one);
    let let_stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let file = ast.source_file(vec![let_stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("var x = 1;"));
    assert!(!out.contains("let"));
}

#[test]
fn test_template_survives_at_es6() {
    let mut ast = Ast::new();
    let head = ast.template_part(SyntaxKind::TemplateHead, "x=");
    let n = ast.id("n");
    let tail = ast.template_part(SyntaxKind::TemplateTail, "");
    let span = ast.arena.add_template_span(0, 0, n, tail);
    let template = ast
        .arena
        .add_template_expr(0, 0, head, quill_ast::NodeList::new(vec![span]));
    let stmt = ast.expr_stmt(template);
    let file = ast.source_file(vec![stmt]);
    let out = print_es6(&ast, file);

    assert!(out.contains("`x=${n}`"));
}

#[test]
fn test_arrow_functions_survive_at_es6() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let x_param = ast.param(x);
    let x_ref = ast.id("x");
    let arrow = ast.arrow(vec![x_param], x_ref);
    let f = ast.id("f");
    let decl = ast.var_decl(f, arrow);
    let stmt = ast.var_stmt(0, vec![decl]);
    let file = ast.source_file(vec![stmt]);
    let out = print_es6(&ast, file);

    assert!(out.contains("var f = x => x;"));
}

#[test]
fn test_for_of_survives_at_es6() {
    let mut ast = Ast::new();
    let v = ast.id("v");
    let decl = ast.var_decl(v, NodeIndex::NONE);
    let list = ast.let_decl_list(vec![decl]);
    let xs = ast.id("xs");
    let v_ref = ast.id("v");
    let log = ast.call_named("log", vec![v_ref]);
    let body = ast.expr_stmt(log);
    let for_of = ast.for_of(list, xs, body);
    let file = ast.source_file(vec![for_of]);
    let out = print_es6(&ast, file);

    assert!(out.contains("for (let v of xs)"));
    assert!(out.contains("log(v);"));
    assert!(!out.contains("_i"));
}

#[test]
fn test_spread_survives_at_es6() {
    let mut ast = Ast::new();
    let xs = ast.id("xs");
    let spread = ast.spread(xs);
    let one = ast.num("1");
    let arr = ast.array(vec![one, spread]);
    let stmt = ast.expr_stmt(arr);
    let file = ast.source_file(vec![stmt]);
    let out = print_es6(&ast, file);

    assert!(out.contains("[1, ...xs];"));
}
