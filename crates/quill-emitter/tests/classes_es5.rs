mod common;

use common::*;
use quill_ast::node::node_flags;
use quill_ast::{NodeIndex, SyntaxKind};

#[test]
fn test_derived_class_with_parameter_property() {
    let mut ast = Ast::new();

    // class A { constructor(public x: number) {} }
    let x_name = ast.id("x");
    let x_param = ast.param(x_name);
    ast.arena.add_flags(x_param, node_flags::PUBLIC);
    let a_body = ast.block(vec![]);
    let a_ctor = ast.constructor(vec![x_param], a_body);
    let class_a = ast.class_decl("A", NodeIndex::NONE, vec![a_ctor]);

    // class B extends A { constructor() { super(1); } }
    let base = ast.id("A");
    let super_kw = ast.arena.add_token(SyntaxKind::SuperKeyword, 0, 0);
    let one = ast.num("1");
    let super_call = ast.call(super_kw, vec![one]);
    let super_stmt = ast.expr_stmt(super_call);
    let b_body = ast.block(vec![super_stmt]);
    let b_ctor = ast.constructor(vec![], b_body);
    let class_b = ast.class_decl("B", base, vec![b_ctor]);

    let file = ast.source_file(vec![class_a, class_b]);
    let out = print_es5(&ast, file);

    // The helper is defined exactly once, before first use.
    assert_eq!(out.matches("var __extends =").count(), 1);
    assert!(out.find("var __extends =").unwrap() < out.find("__extends(B, _super);").unwrap());

    assert!(out.contains("var A = (function () {"));
    assert!(out.contains("function A(x) {"));
    assert!(out.contains("this.x = x;"));
    assert!(out.contains("var B = (function (_super) {"));
    assert!(out.contains("__extends(B, _super);"));
    assert!(out.contains("_super.call(this, 1);"));
    assert!(out.contains("})(A);"));
    assert!(out.contains("return A;"));
    assert!(out.contains("return B;"));
}

#[test]
fn test_methods_statics_and_accessors_lower_to_assignments() {
    let mut ast = Ast::new();

    let one = ast.num("1");
    let ret = ast.ret(one);
    let m_body = ast.block(vec![ret]);
    let method = ast.method("m", vec![], m_body);

    let s_body = ast.block(vec![]);
    let stat = ast.method("s", vec![], s_body);
    ast.arena.add_flags(stat, node_flags::STATIC);

    let two = ast.num("2");
    let get_ret = ast.ret(two);
    let get_body = ast.block(vec![get_ret]);
    let x_name = ast.id("x");
    let getter = ast.arena.add_function(
        SyntaxKind::GetAccessor,
        0,
        0,
        x_name,
        quill_ast::NodeList::new(vec![]),
        get_body,
        None,
    );

    let v_name = ast.id("v");
    let v_param = ast.param(v_name);
    let set_body = ast.block(vec![]);
    let x_name_2 = ast.id("x");
    let setter = ast.arena.add_function(
        SyntaxKind::SetAccessor,
        0,
        0,
        x_name_2,
        quill_ast::NodeList::new(vec![v_param]),
        set_body,
        None,
    );

    let class_c = ast.class_decl("C", NodeIndex::NONE, vec![method, stat, getter, setter]);
    let file = ast.source_file(vec![class_c]);
    let out = print_es5(&ast, file);

    assert!(out.contains("C.prototype.m = function () {"));
    assert!(out.contains("return 1;"));
    assert!(out.contains("C.s = function () {"));
    assert_eq!(out.matches("Object.defineProperty(C.prototype, \"x\", {").count(), 1);
    assert!(out.contains("get: function () {"));
    assert!(out.contains("set: function (v) {"));
    assert!(out.contains("enumerable: true,"));
    assert!(out.contains("configurable: true"));
}

#[test]
fn test_synthesized_constructor_forwards_to_base() {
    let mut ast = Ast::new();
    let base = ast.id("Base");
    let class_d = ast.class_decl("D", base, vec![]);
    let file = ast.source_file(vec![class_d]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function D() {"));
    assert!(out.contains("_super.apply(this, arguments);"));
    assert!(out.contains("})(Base);"));
}

#[test]
fn test_instance_property_initializers_move_into_constructor() {
    let mut ast = Ast::new();
    let y_name = ast.id("y");
    let five = ast.num("5");
    let prop = ast
        .arena
        .add_property_decl(SyntaxKind::PropertyDeclaration, 0, 0, y_name, five, None);
    let class_e = ast.class_decl("E", NodeIndex::NONE, vec![prop]);
    let file = ast.source_file(vec![class_e]);
    let out = print_es5(&ast, file);

    assert!(out.contains("function E() {"));
    assert!(out.contains("this.y = 5;"));
    // No stray prototype assignment for the data property.
    assert!(!out.contains("E.prototype.y"));
}

#[test]
fn test_static_property_initializers_attach_to_constructor_function() {
    let mut ast = Ast::new();
    let y_name = ast.id("count");
    let zero = ast.num("0");
    let prop = ast
        .arena
        .add_property_decl(SyntaxKind::PropertyDeclaration, 0, 0, y_name, zero, None);
    ast.arena.add_flags(prop, node_flags::STATIC);
    let class_f = ast.class_decl("F", NodeIndex::NONE, vec![prop]);
    let file = ast.source_file(vec![class_f]);
    let out = print_es5(&ast, file);

    assert!(out.contains("F.count = 0;"));
    let count_pos = out.find("F.count = 0;").unwrap();
    let return_pos = out.find("return F;").unwrap();
    assert!(count_pos < return_pos);
}

#[test]
fn test_super_method_call_lowers_through_prototype() {
    let mut ast = Ast::new();
    let base = ast.id("Base");
    let super_kw = ast.arena.add_token(SyntaxKind::SuperKeyword, 0, 0);
    let m = ast.id("m");
    let access = ast.arena.add_access_expr(
        SyntaxKind::PropertyAccessExpression,
        0,
        0,
        super_kw,
        m,
    );
    let arg = ast.num("2");
    let call = ast.call(access, vec![arg]);
    let stmt = ast.expr_stmt(call);
    let body = ast.block(vec![stmt]);
    let method = ast.method("run", vec![], body);
    let class_g = ast.class_decl("G", base, vec![method]);
    let file = ast.source_file(vec![class_g]);
    let out = print_es5(&ast, file);

    assert!(out.contains("_super.prototype.m.call(this, 2);"));
}

#[test]
fn test_class_body_temporaries_stay_inside_the_iife() {
    // A decorated computed property captures its name expression into a
    // temporary that must be declared inside the class frame.
    let mut ast = Ast::new();
    let dec = ast.id("dec");
    let decorator = ast.decorator(dec);
    let key_expr = ast.call_named("key", vec![]);
    let computed = ast
        .arena
        .add_wrapped_expr(SyntaxKind::ComputedPropertyName, 0, 0, key_expr);
    let one = ast.num("1");
    let prop = ast.arena.add_property_decl(
        SyntaxKind::PropertyDeclaration,
        0,
        0,
        computed,
        one,
        Some(quill_ast::NodeList::new(vec![decorator])),
    );
    ast.arena.add_flags(prop, node_flags::STATIC);
    let class_h = ast.class_decl("H", NodeIndex::NONE, vec![prop]);
    let file = ast.source_file(vec![class_h]);
    let out = print_es5(&ast, file);

    assert!(out.contains("H[_a = key()] = 1;"));
    assert!(out.contains("__decorate([dec], H, _a, void 0);"));
    let var_pos = out.find("var _a;").unwrap();
    let return_pos = out.find("return H;").unwrap();
    assert!(var_pos < return_pos);
}
