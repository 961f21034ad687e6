//! Shared builders for emitter tests. The parser lives outside this
//! repository, so tests assemble trees directly through the arena API;
//! nodes default to empty spans, with explicit spans where a test exercises
//! position-dependent behavior (comments, source maps).

#![allow(dead_code)]

use rustc_hash::{FxHashMap, FxHashSet};

use quill_ast::node::node_flags;
use quill_ast::{NodeArena, NodeIndex, NodeList, SyntaxKind};
use quill_common::CompilerOptions;
use quill_emitter::{print_source_file, EmitResolver, NullResolver};

pub struct Ast {
    pub arena: NodeArena,
}

impl Ast {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
        }
    }

    pub fn id(&mut self, text: &str) -> NodeIndex {
        self.arena.add_identifier(0, 0, text)
    }

    pub fn id_at(&mut self, text: &str, pos: u32, end: u32) -> NodeIndex {
        self.arena.add_identifier(pos, end, text)
    }

    pub fn num(&mut self, text: &str) -> NodeIndex {
        self.arena
            .add_literal(SyntaxKind::NumericLiteral, 0, 0, text)
    }

    pub fn str_lit(&mut self, text: &str) -> NodeIndex {
        self.arena.add_literal(SyntaxKind::StringLiteral, 0, 0, text)
    }

    pub fn template_part(&mut self, kind: SyntaxKind, text: &str) -> NodeIndex {
        self.arena.add_literal(kind, 0, 0, text)
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_literal_expr(
            SyntaxKind::ArrayLiteralExpression,
            0,
            0,
            NodeList::new(elements),
        )
    }

    pub fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_literal_expr(
            SyntaxKind::ObjectLiteralExpression,
            0,
            0,
            NodeList::new(properties),
        )
    }

    pub fn prop(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let name = self.id(name);
        self.arena
            .add_property_assignment(SyntaxKind::PropertyAssignment, 0, 0, name, value)
    }

    pub fn binary(&mut self, left: NodeIndex, op: SyntaxKind, right: NodeIndex) -> NodeIndex {
        self.arena.add_binary_expr(0, 0, left, op, right)
    }

    pub fn assign(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.binary(left, SyntaxKind::EqualsToken, right)
    }

    pub fn call(&mut self, callee: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add_call_expr(SyntaxKind::CallExpression, 0, 0, callee, NodeList::new(args))
    }

    pub fn call_named(&mut self, callee: &str, args: Vec<NodeIndex>) -> NodeIndex {
        let callee = self.id(callee);
        self.call(callee, args)
    }

    pub fn prop_access(&mut self, target: NodeIndex, member: &str) -> NodeIndex {
        let member = self.id(member);
        self.arena
            .add_access_expr(SyntaxKind::PropertyAccessExpression, 0, 0, target, member)
    }

    pub fn spread(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena
            .add_wrapped_expr(SyntaxKind::SpreadElement, 0, 0, expression)
    }

    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena
            .add_wrapped_expr(SyntaxKind::ParenthesizedExpression, 0, 0, expression)
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena
            .add_wrapped_expr(SyntaxKind::ExpressionStatement, 0, 0, expression)
    }

    pub fn ret(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena
            .add_return(SyntaxKind::ReturnStatement, 0, 0, expression)
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add_block(SyntaxKind::Block, 0, 0, NodeList::new(statements))
    }

    pub fn var_decl(&mut self, name: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.arena.add_variable_declaration(0, 0, name, init)
    }

    /// `var`/`let`/`const` statement; `flags` go on the declaration list
    /// (LET/CONST) except EXPORT/AMBIENT, which go on the statement.
    pub fn var_stmt(&mut self, list_flags: u32, decls: Vec<NodeIndex>) -> NodeIndex {
        let list = self.arena.add_variable(
            SyntaxKind::VariableDeclarationList,
            0,
            0,
            NodeList::new(decls),
        );
        self.arena.add_flags(list, list_flags & node_flags::BLOCK_SCOPED);
        let stmt = self.arena.add_variable(
            SyntaxKind::VariableStatement,
            0,
            0,
            NodeList::new(vec![list]),
        );
        self.arena
            .add_flags(stmt, list_flags & !node_flags::BLOCK_SCOPED);
        stmt
    }

    pub fn param(&mut self, name: NodeIndex) -> NodeIndex {
        self.arena.add_parameter(0, 0, name, NodeIndex::NONE, None)
    }

    pub fn param_with_init(&mut self, name: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.arena.add_parameter(0, 0, name, init, None)
    }

    pub fn function_decl(
        &mut self,
        name: &str,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        let name = self.id(name);
        self.arena.add_function(
            SyntaxKind::FunctionDeclaration,
            0,
            0,
            name,
            NodeList::new(params),
            body,
            None,
        )
    }

    pub fn function_expr(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::FunctionExpression,
            0,
            0,
            NodeIndex::NONE,
            NodeList::new(params),
            body,
            None,
        )
    }

    pub fn arrow(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::ArrowFunction,
            0,
            0,
            NodeIndex::NONE,
            NodeList::new(params),
            body,
            None,
        )
    }

    pub fn constructor(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::Constructor,
            0,
            0,
            NodeIndex::NONE,
            NodeList::new(params),
            body,
            None,
        )
    }

    pub fn method(
        &mut self,
        name: &str,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        let name = self.id(name);
        self.arena.add_function(
            SyntaxKind::MethodDeclaration,
            0,
            0,
            name,
            NodeList::new(params),
            body,
            None,
        )
    }

    pub fn class_decl(
        &mut self,
        name: &str,
        base: NodeIndex,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.id(name);
        self.arena.add_class(
            SyntaxKind::ClassDeclaration,
            0,
            0,
            name,
            base,
            NodeList::new(members),
            None,
        )
    }

    pub fn decorator(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena.add_decorator(0, 0, expression)
    }

    pub fn binding_element(&mut self, name: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.arena
            .add_binding_element(0, 0, NodeIndex::NONE, name, init)
    }

    pub fn object_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_binding_pattern(
            SyntaxKind::ObjectBindingPattern,
            0,
            0,
            NodeList::new(elements),
        )
    }

    pub fn array_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_binding_pattern(
            SyntaxKind::ArrayBindingPattern,
            0,
            0,
            NodeList::new(elements),
        )
    }

    pub fn for_of(
        &mut self,
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_for_in_of(
            SyntaxKind::ForOfStatement,
            0,
            0,
            initializer,
            expression,
            statement,
        )
    }

    pub fn let_decl_list(&mut self, decls: Vec<NodeIndex>) -> NodeIndex {
        let list = self.arena.add_variable(
            SyntaxKind::VariableDeclarationList,
            0,
            0,
            NodeList::new(decls),
        );
        self.arena.add_flags(list, node_flags::LET);
        list
    }

    pub fn source_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add_source_file("test.ts", "", NodeList::new(statements), false)
    }

    pub fn module_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add_source_file("test.ts", "", NodeList::new(statements), true)
    }

    pub fn source_file_with_text(
        &mut self,
        text: &str,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.arena
            .add_source_file("test.ts", text, NodeList::new(statements), false)
    }
}

pub fn print_es5(ast: &Ast, file: NodeIndex) -> String {
    print_source_file(&ast.arena, file, &NullResolver, &CompilerOptions::es5()).code
}

pub fn print_es6(ast: &Ast, file: NodeIndex) -> String {
    print_source_file(&ast.arena, file, &NullResolver, &CompilerOptions::es2015()).code
}

pub fn print_with(ast: &Ast, file: NodeIndex, options: &CompilerOptions) -> String {
    print_source_file(&ast.arena, file, &NullResolver, options).code
}

pub fn print_with_resolver(
    ast: &Ast,
    file: NodeIndex,
    resolver: &dyn EmitResolver,
    options: &CompilerOptions,
) -> String {
    print_source_file(&ast.arena, file, resolver, options).code
}

/// A resolver driven by per-test tables.
#[derive(Default)]
pub struct StubResolver {
    pub globals: FxHashSet<String>,
    pub constants: FxHashMap<NodeIndex, f64>,
    pub substitutions: FxHashMap<NodeIndex, String>,
    pub block_ids: FxHashMap<NodeIndex, u32>,
    pub shadowed: FxHashSet<NodeIndex>,
    pub check_flags: FxHashMap<NodeIndex, u32>,
    pub unreferenced_aliases: FxHashSet<NodeIndex>,
    pub types: FxHashMap<NodeIndex, String>,
    pub param_types: FxHashMap<NodeIndex, Vec<String>>,
    pub return_types: FxHashMap<NodeIndex, String>,
}

impl EmitResolver for StubResolver {
    fn has_global_name(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    fn get_constant_value(&self, node: NodeIndex) -> Option<f64> {
        self.constants.get(&node).copied()
    }

    fn get_expression_name_substitution(&self, node: NodeIndex) -> Option<String> {
        self.substitutions.get(&node).cloned()
    }

    fn get_block_scoped_variable_id(&self, node: NodeIndex) -> Option<u32> {
        self.block_ids.get(&node).copied()
    }

    fn resolves_to_some_value(&self, node: NodeIndex) -> bool {
        self.shadowed.contains(&node)
    }

    fn get_node_check_flags(&self, node: NodeIndex) -> u32 {
        self.check_flags.get(&node).copied().unwrap_or(0)
    }

    fn is_referenced_alias_declaration(&self, node: NodeIndex) -> bool {
        !self.unreferenced_aliases.contains(&node)
    }

    fn is_value_alias_declaration(&self, node: NodeIndex) -> bool {
        !self.unreferenced_aliases.contains(&node)
    }

    fn serialize_type_of_node(&self, node: NodeIndex) -> String {
        self.types
            .get(&node)
            .cloned()
            .unwrap_or_else(|| "Object".to_string())
    }

    fn serialize_parameter_types_of_node(&self, node: NodeIndex) -> Vec<String> {
        self.param_types.get(&node).cloned().unwrap_or_default()
    }

    fn serialize_return_type_of_node(&self, node: NodeIndex) -> String {
        self.return_types
            .get(&node)
            .cloned()
            .unwrap_or_else(|| "void 0".to_string())
    }
}
