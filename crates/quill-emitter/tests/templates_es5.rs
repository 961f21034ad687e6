mod common;

use common::*;
use quill_ast::SyntaxKind;

fn simple_template(ast: &mut Ast, head: &str, expr: quill_ast::NodeIndex, tail: &str) -> quill_ast::NodeIndex {
    let head = ast.template_part(SyntaxKind::TemplateHead, head);
    let tail = ast.template_part(SyntaxKind::TemplateTail, tail);
    let span = ast.arena.add_template_span(0, 0, expr, tail);
    ast.arena
        .add_template_expr(0, 0, head, quill_ast::NodeList::new(vec![span]))
}

#[test]
fn test_template_lowers_to_concatenation() {
    let mut ast = Ast::new();
    let n = ast.id("n");
    let one = ast.num("1");
    let sum = ast.binary(n, SyntaxKind::PlusToken, one);
    let template = simple_template(&mut ast, "x=", sum, "");
    let stmt = ast.expr_stmt(template);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    // Additions associate differently under concatenation, so they keep
    // their parentheses.
    assert!(out.contains("\"x=\" + (n + 1);"));
}

#[test]
fn test_higher_precedence_interpolations_stay_bare() {
    let mut ast = Ast::new();
    let n = ast.id("n");
    let two = ast.num("2");
    let product = ast.binary(n, SyntaxKind::AsteriskToken, two);
    let template = simple_template(&mut ast, "x=", product, "");
    let stmt = ast.expr_stmt(template);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("\"x=\" + n * 2;"));
    assert!(!out.contains("(n * 2)"));
}

#[test]
fn test_leading_empty_head_still_forces_string_conversion() {
    let mut ast = Ast::new();
    let a = ast.id("a");
    let template = simple_template(&mut ast, "", a, "");
    let stmt = ast.expr_stmt(template);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("\"\" + a;"));
}

#[test]
fn test_template_in_access_position_is_parenthesized() {
    let mut ast = Ast::new();
    let n = ast.id("n");
    let template = simple_template(&mut ast, "x=", n, "");
    let access = ast.prop_access(template, "length");
    let stmt = ast.expr_stmt(access);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("(\"x=\" + n).length;"));
}

#[test]
fn test_tagged_template_builds_cooked_and_raw_arrays() {
    let mut ast = Ast::new();
    let n = ast.id("n");
    let one = ast.num("1");
    let sum = ast.binary(n, SyntaxKind::PlusToken, one);
    let template = simple_template(&mut ast, "x=", sum, "");
    let tag = ast.id("t");
    let tagged = ast.arena.add_tagged_template(0, 0, tag, template);
    let stmt = ast.expr_stmt(tagged);
    let file = ast.source_file(vec![stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("(_a = [\"x=\", \"\"], _a.raw = [\"x=\", \"\"], t(_a, n + 1));"));
    assert!(out.contains("var _a;"));
}

#[test]
fn test_no_substitution_template_lowers_to_string() {
    let mut ast = Ast::new();
    let lit = ast.template_part(SyntaxKind::NoSubstitutionTemplateLiteral, "plain");
    let stmt = ast.expr_stmt(lit);
    let file = ast.source_file(vec![stmt]);

    let out = print_es5(&ast, file);
    assert!(out.contains("\"plain\";"));

    let out = print_es6(&ast, file);
    assert!(out.contains("`plain`;"));
}
