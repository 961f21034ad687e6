mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, NodeList, SyntaxKind};
use quill_common::CompilerOptions;

fn named_import(ast: &mut Ast, binding: &str, module: &str) -> NodeIndex {
    let name = ast.id(binding);
    let spec = ast.arena.add_specifier(
        SyntaxKind::ImportSpecifier,
        0,
        0,
        NodeIndex::NONE,
        name,
    );
    let named = ast.arena.add_named_bindings(
        SyntaxKind::NamedImports,
        0,
        0,
        NodeList::new(vec![spec]),
    );
    let clause = ast.arena.add_import_clause(0, 0, NodeIndex::NONE, named);
    let specifier = ast.str_lit(module);
    ast.arena.add_import_decl(0, 0, clause, specifier)
}

#[test]
fn test_named_import_lowers_to_require() {
    let mut ast = Ast::new();
    let import = named_import(&mut ast, "y", "m");
    let file = ast.module_file(vec![import]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("var m_1 = require(\"m\");"));
}

#[test]
fn test_namespace_import_keeps_its_name() {
    let mut ast = Ast::new();
    let ns = ast.id("ns");
    let ns_import = ast.arena.add_namespace_import(0, 0, ns);
    let clause = ast.arena.add_import_clause(0, 0, NodeIndex::NONE, ns_import);
    let specifier = ast.str_lit("m");
    let import = ast.arena.add_import_decl(0, 0, clause, specifier);
    let file = ast.module_file(vec![import]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("var ns = require(\"m\");"));
}

#[test]
fn test_bare_import_keeps_side_effect_require() {
    let mut ast = Ast::new();
    let specifier = ast.str_lit("polyfill");
    let import = ast.arena.add_import_decl(0, 0, NodeIndex::NONE, specifier);
    let file = ast.module_file(vec![import]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("require(\"polyfill\");"));
    assert!(!out.contains("var"));
}

#[test]
fn test_unreferenced_import_is_elided() {
    let mut ast = Ast::new();
    let import = named_import(&mut ast, "T", "types");
    let file = ast.module_file(vec![import]);

    let mut resolver = StubResolver::default();
    resolver.unreferenced_aliases.insert(import);
    let out = print_with_resolver(&ast, file, &resolver, &CompilerOptions::es5_commonjs());

    assert!(!out.contains("require"));
}

#[test]
fn test_exported_var_assigns_through_exports() {
    let mut ast = Ast::new();
    let z = ast.id("z");
    let two = ast.num("2");
    let decl = ast.var_decl(z, two);
    let stmt = ast.var_stmt(node_flags::EXPORT, vec![decl]);
    let file = ast.module_file(vec![stmt]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("exports.z = 2;"));
    assert!(!out.contains("var z"));
}

#[test]
fn test_exported_function_gets_trailing_assignment() {
    let mut ast = Ast::new();
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![], body);
    ast.arena.add_flags(func, node_flags::EXPORT);
    let file = ast.module_file(vec![func]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("function f() {"));
    assert!(out.contains("exports.f = f;"));
}

#[test]
fn test_export_default_function() {
    let mut ast = Ast::new();
    let body = ast.block(vec![]);
    let func = ast.function_decl("f", vec![], body);
    ast.arena
        .add_flags(func, node_flags::EXPORT | node_flags::DEFAULT);
    let file = ast.module_file(vec![func]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("exports.default = f;"));
}

#[test]
fn test_export_specifier_aliases_follow_the_declaration() {
    let mut ast = Ast::new();
    let body = ast.block(vec![]);
    let func = ast.function_decl("helper", vec![], body);

    // export { helper as aid };
    let property = ast.id("helper");
    let alias = ast.id("aid");
    let spec = ast
        .arena
        .add_specifier(SyntaxKind::ExportSpecifier, 0, 0, property, alias);
    let named = ast.arena.add_named_bindings(
        SyntaxKind::NamedExports,
        0,
        0,
        NodeList::new(vec![spec]),
    );
    let export = ast
        .arena
        .add_export_decl(0, 0, named, NodeIndex::NONE);

    let file = ast.module_file(vec![func, export]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("exports.aid = helper;"));
}

#[test]
fn test_export_star_uses_the_helper() {
    let mut ast = Ast::new();
    let specifier = ast.str_lit("lib");
    let export = ast
        .arena
        .add_export_decl(0, 0, NodeIndex::NONE, specifier);
    let file = ast.module_file(vec![export]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("function __export(m) {"));
    assert!(out.contains("__export(require(\"lib\"));"));
    let helper_pos = out.find("function __export(m)").unwrap();
    let use_pos = out.find("__export(require(").unwrap();
    assert!(helper_pos < use_pos);
}

#[test]
fn test_reexport_specifiers_bind_the_module_once() {
    let mut ast = Ast::new();
    // export { a } from "m";
    let a = ast.id("a");
    let spec = ast
        .arena
        .add_specifier(SyntaxKind::ExportSpecifier, 0, 0, NodeIndex::NONE, a);
    let named = ast.arena.add_named_bindings(
        SyntaxKind::NamedExports,
        0,
        0,
        NodeList::new(vec![spec]),
    );
    let specifier = ast.str_lit("m");
    let export = ast.arena.add_export_decl(0, 0, named, specifier);
    let file = ast.module_file(vec![export]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("var m_1 = require(\"m\");"));
    assert!(out.contains("exports.a = m_1.a;"));
}

#[test]
fn test_export_equals_lowers_to_module_exports() {
    let mut ast = Ast::new();
    let value = ast.id("api");
    let export = ast.arena.add_export_assignment(0, 0, value);
    ast.arena.add_flags(export, node_flags::EXPORT_EQUALS);
    let file = ast.module_file(vec![export]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("module.exports = api;"));
}

#[test]
fn test_export_default_expression() {
    let mut ast = Ast::new();
    let one = ast.num("1");
    let two = ast.num("2");
    let sum = ast.binary(one, SyntaxKind::PlusToken, two);
    let export = ast.arena.add_export_assignment(0, 0, sum);
    let file = ast.module_file(vec![export]);
    let out = print_with(&ast, file, &CompilerOptions::es5_commonjs());

    assert!(out.contains("exports.default = 1 + 2;"));
}

#[test]
fn test_import_reference_substitution() {
    let mut ast = Ast::new();
    let import = named_import(&mut ast, "y", "m");
    let y_ref = ast.id("y");
    let call = ast.call_named("log", vec![y_ref]);
    let stmt = ast.expr_stmt(call);
    let file = ast.module_file(vec![import, stmt]);

    let mut resolver = StubResolver::default();
    resolver.substitutions.insert(y_ref, "m_1.y".to_string());
    let out = print_with_resolver(&ast, file, &resolver, &CompilerOptions::es5_commonjs());

    assert!(out.contains("var m_1 = require(\"m\");"));
    assert!(out.contains("log(m_1.y);"));
}
