mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, NodeList, SyntaxKind};
use quill_common::CompilerOptions;

#[test]
fn test_if_else_chains() {
    let mut ast = Ast::new();
    let c1 = ast.id("c1");
    let a_call = ast.call_named("a", vec![]);
    let a_stmt = ast.expr_stmt(a_call);
    let then_block = ast.block(vec![a_stmt]);

    let c2 = ast.id("c2");
    let b_call = ast.call_named("b", vec![]);
    let b_stmt = ast.expr_stmt(b_call);
    let inner_then = ast.block(vec![b_stmt]);
    let d_call = ast.call_named("d", vec![]);
    let d_stmt = ast.expr_stmt(d_call);
    let else_block = ast.block(vec![d_stmt]);
    let inner_if = ast
        .arena
        .add_if_statement(0, 0, c2, inner_then, else_block);

    let outer = ast.arena.add_if_statement(0, 0, c1, then_block, inner_if);
    let file = ast.source_file(vec![outer]);
    let out = print_es5(&ast, file);

    assert!(out.contains("if (c1) {"));
    assert!(out.contains("} else if (c2) {"));
    assert!(out.contains("a();"));
    assert!(out.contains("b();"));
    assert!(out.contains("d();"));
}

#[test]
fn test_while_do_and_for() {
    let mut ast = Ast::new();

    let c = ast.id("go");
    let tick = ast.call_named("tick", vec![]);
    let tick_stmt = ast.expr_stmt(tick);
    let body = ast.block(vec![tick_stmt]);
    let while_stmt = ast
        .arena
        .add_loop(SyntaxKind::WhileStatement, 0, 0, NodeIndex::NONE, c, NodeIndex::NONE, body);

    let c2 = ast.id("more");
    let tock = ast.call_named("tock", vec![]);
    let tock_stmt = ast.expr_stmt(tock);
    let do_body = ast.block(vec![tock_stmt]);
    let do_stmt = ast.arena.add_loop(
        SyntaxKind::DoStatement,
        0,
        0,
        NodeIndex::NONE,
        c2,
        NodeIndex::NONE,
        do_body,
    );

    let i = ast.id("i");
    let zero = ast.num("0");
    let decl = ast.var_decl(i, zero);
    let init = ast.let_decl_list(vec![decl]);
    let i_ref = ast.id("i");
    let ten = ast.num("10");
    let cond = ast.binary(i_ref, SyntaxKind::LessThanToken, ten);
    let i_ref2 = ast.id("i");
    let inc = ast.arena.add_unary_expr(
        SyntaxKind::PostfixUnaryExpression,
        0,
        0,
        SyntaxKind::PlusPlusToken,
        i_ref2,
    );
    let step = ast.call_named("step", vec![]);
    let step_stmt = ast.expr_stmt(step);
    let for_body = ast.block(vec![step_stmt]);
    let for_stmt = ast
        .arena
        .add_loop(SyntaxKind::ForStatement, 0, 0, init, cond, inc, for_body);

    let file = ast.source_file(vec![while_stmt, do_stmt, for_stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("while (go) {"));
    assert!(out.contains("do {"));
    assert!(out.contains("} while (more);"));
    // `let` in a loop head lowers to `var` below ES6.
    assert!(out.contains("for (var i = 0; i < 10; i++) {"));
}

#[test]
fn test_switch_with_default() {
    let mut ast = Ast::new();
    let x = ast.id("x");
    let one = ast.num("1");
    let a_call = ast.call_named("a", vec![]);
    let a_stmt = ast.expr_stmt(a_call);
    let brk = ast.arena.add_labeled(
        SyntaxKind::BreakStatement,
        0,
        0,
        NodeIndex::NONE,
        NodeIndex::NONE,
    );
    let case = ast.arena.add_case_clause(
        SyntaxKind::CaseClause,
        0,
        0,
        one,
        NodeList::new(vec![a_stmt, brk]),
    );
    let b_call = ast.call_named("b", vec![]);
    let b_stmt = ast.expr_stmt(b_call);
    let default = ast.arena.add_case_clause(
        SyntaxKind::DefaultClause,
        0,
        0,
        NodeIndex::NONE,
        NodeList::new(vec![b_stmt]),
    );
    let switch = ast
        .arena
        .add_switch(0, 0, x, NodeList::new(vec![case, default]));
    let file = ast.source_file(vec![switch]);
    let out = print_es5(&ast, file);

    assert!(out.contains("switch (x) {"));
    assert!(out.contains("case 1:"));
    assert!(out.contains("break;"));
    assert!(out.contains("default:"));
}

#[test]
fn test_try_catch_finally() {
    let mut ast = Ast::new();
    let risky = ast.call_named("risky", vec![]);
    let risky_stmt = ast.expr_stmt(risky);
    let try_block = ast.block(vec![risky_stmt]);

    let e = ast.id("e");
    let e_decl = ast.var_decl(e, NodeIndex::NONE);
    let rethrow = {
        let e_ref = ast.id("e");
        ast.arena.add_return(SyntaxKind::ThrowStatement, 0, 0, e_ref)
    };
    let catch_block = ast.block(vec![rethrow]);
    let catch = ast.arena.add_catch_clause(0, 0, e_decl, catch_block);

    let cleanup = ast.call_named("cleanup", vec![]);
    let cleanup_stmt = ast.expr_stmt(cleanup);
    let finally_block = ast.block(vec![cleanup_stmt]);

    let try_stmt = ast.arena.add_try(0, 0, try_block, catch, finally_block);
    let file = ast.source_file(vec![try_stmt]);
    let out = print_es5(&ast, file);

    assert!(out.contains("try {"));
    assert!(out.contains("catch (e) {"));
    assert!(out.contains("throw e;"));
    assert!(out.contains("finally {"));
    assert!(out.contains("cleanup();"));
}

#[test]
fn test_labeled_break_and_continue() {
    let mut ast = Ast::new();
    let label = ast.id("outer");
    let label_ref = ast.id("outer");
    let cont = ast
        .arena
        .add_labeled(SyntaxKind::ContinueStatement, 0, 0, label_ref, NodeIndex::NONE);
    let c = ast.id("go");
    let body = ast.block(vec![cont]);
    let while_stmt = ast
        .arena
        .add_loop(SyntaxKind::WhileStatement, 0, 0, NodeIndex::NONE, c, NodeIndex::NONE, body);
    let labeled = ast
        .arena
        .add_labeled(SyntaxKind::LabeledStatement, 0, 0, label, while_stmt);
    let file = ast.source_file(vec![labeled]);
    let out = print_es5(&ast, file);

    assert!(out.contains("outer: while (go) {"));
    assert!(out.contains("continue outer;"));
}

#[test]
fn test_shadowing_let_is_renamed() {
    let mut ast = Ast::new();

    // var x = 1; { let x = 2; log(x); }
    let x_outer = ast.id("x");
    let one = ast.num("1");
    let outer_decl = ast.var_decl(x_outer, one);
    let outer_stmt = ast.var_stmt(0, vec![outer_decl]);

    let x_inner = ast.id("x");
    let two = ast.num("2");
    let inner_decl = ast.var_decl(x_inner, two);
    let inner_stmt = ast.var_stmt(node_flags::LET, vec![inner_decl]);
    let x_ref = ast.id("x");
    let log = ast.call_named("log", vec![x_ref]);
    let log_stmt = ast.expr_stmt(log);
    let block = ast.block(vec![inner_stmt, log_stmt]);

    let file = ast.source_file(vec![outer_stmt, block]);

    let mut resolver = StubResolver::default();
    resolver.block_ids.insert(x_inner, 7);
    resolver.block_ids.insert(x_ref, 7);
    resolver.shadowed.insert(x_inner);

    let out = print_with_resolver(&ast, file, &resolver, &CompilerOptions::es5());

    assert!(out.contains("var x = 1;"));
    assert!(out.contains("var x_1 = 2;"));
    assert!(out.contains("log(x_1);"));
}

#[test]
fn test_non_shadowing_let_keeps_its_name() {
    let mut ast = Ast::new();
    let y = ast.id("y");
    let one = ast.num("1");
    let decl = ast.var_decl(y, one);
    let stmt = ast.var_stmt(node_flags::LET, vec![decl]);
    let block = ast.block(vec![stmt]);
    let file = ast.source_file(vec![block]);

    let mut resolver = StubResolver::default();
    resolver.block_ids.insert(y, 3);
    // Not shadowed: the resolver reports no enclosing value by this name.

    let out = print_with_resolver(&ast, file, &resolver, &CompilerOptions::es5());
    assert!(out.contains("var y = 1;"));
    assert!(!out.contains("y_1"));
}

#[test]
fn test_empty_and_debugger_statements() {
    let mut ast = Ast::new();
    let empty = ast.arena.add_token(SyntaxKind::EmptyStatement, 0, 0);
    let debugger = ast.arena.add_token(SyntaxKind::DebuggerStatement, 0, 0);
    let file = ast.source_file(vec![empty, debugger]);
    let out = print_es5(&ast, file);

    assert!(out.contains(";\n"));
    assert!(out.contains("debugger;"));
}
