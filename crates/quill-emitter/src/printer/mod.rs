//! The tree-directed printer.
//!
//! A single ordered traversal writes text, tracks positions, invents names,
//! and lowers syntax. `emit` is the only entry point; node-kind routines are
//! private and live in the sibling modules, all as `impl Printer` blocks:
//!
//! - `literals`: identifiers (substitutions, renames) and literal text
//! - `expressions`: every expression kind, parenthesization, spread lowering
//! - `statements`: blocks, control flow, `for-of` lowering, variables
//! - `functions`: function-likes, parameter prologues, `_this` capture
//! - `classes`: ES2015 emission and the ES5 IIFE lowering
//! - `decorators`: `__decorate` / `__param` / `__metadata` synthesis
//! - `destructuring`: pattern walking with evaluate-once temporaries
//! - `templates`: template literals and their concatenation lowering
//! - `declarations`: enums, namespaces, import-equals
//! - `module_emission` / `module_wrapper`: the module framer
//! - `comments`: the comment router
//! - `names`: the lexical name generator

mod classes;
mod comments;
mod declarations;
mod decorators;
mod destructuring;
mod expressions;
mod functions;
mod literals;
mod module_emission;
mod module_wrapper;
mod names;
mod statements;
mod templates;

use rustc_hash::{FxHashMap, FxHashSet};

use quill_ast::comments::skip_trivia;
use quill_ast::lines::line_and_column_of;
use quill_ast::{Node, NodeArena, NodeIndex, SyntaxKind};
use quill_common::diagnostics::{self, Diagnostic};
use quill_common::{CompilerOptions, ModuleKind};

use crate::resolver::EmitResolver;
use crate::source_map::SourceMapWriter;
use crate::writer::SourceWriter;

pub(crate) use module_emission::ExternalModuleInfo;

/// Temporary-name counter and reserved-name bits. The low 28 bits count
/// consumed positions in the `_a … _z, _0, _1 …` cycle; the two high bits
/// reserve `_i` and `_n` for callers that ask for them by name.
pub(crate) mod temp_flags {
    pub const AUTO: u32 = 0;
    pub const COUNT_MASK: u32 = 0x0FFF_FFFF;
    pub const UNDERSCORE_I: u32 = 0x1000_0000;
    pub const UNDERSCORE_N: u32 = 0x2000_0000;
}

/// Saved name-generator state around a lexical environment frame.
pub(crate) struct TempState {
    temp_flags: u32,
    temp_variables: Vec<String>,
    temp_parameters: Vec<String>,
}

/// The result of printing one or more source files.
pub struct PrintedOutput {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    pub source_map: Option<SourceMapWriter>,
}

pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) resolver: &'a dyn EmitResolver,
    pub(crate) options: &'a CompilerOptions,
    pub(crate) writer: SourceWriter,
    pub(crate) source_map: Option<SourceMapWriter>,

    pub(crate) current_source_file: NodeIndex,
    pub(crate) source_text: Option<&'a str>,
    pub(crate) line_starts: Option<&'a [u32]>,
    /// Files emitted so far into this output; numbers the System envelope's
    /// export function (`exports_1`, `exports_2`, …) across a bundle.
    pub(crate) source_file_count: u32,

    // Name generator state. Scoped slots are saved and restored on function,
    // class, and module body boundaries; the rest lives for the file.
    pub(crate) temp_flags_state: u32,
    pub(crate) temp_variables: Vec<String>,
    pub(crate) temp_parameters: Vec<String>,
    pub(crate) generated_names: FxHashSet<String>,
    pub(crate) node_generated_names: FxHashMap<NodeIndex, String>,
    pub(crate) block_scoped_renames: FxHashMap<u32, String>,
    pub(crate) computed_property_temps: FxHashMap<NodeIndex, String>,

    // Comment router state: end of the consumed detached header, if any.
    pub(crate) detached_comment_end: Option<u32>,

    // Module framing context. Wrapped envelopes (AMD/UMD/System) emit their
    // bodies in CommonJS mode and remember the actual kind so export
    // assignments can pick `return X` over `module.exports = X`.
    pub(crate) module_kind: ModuleKind,
    pub(crate) original_module_kind: Option<ModuleKind>,

    // Lowering context.
    pub(crate) this_substitution: Option<String>,
    pub(crate) super_name: Option<String>,
    pub(crate) namespace_stack: Vec<String>,
    pub(crate) scope_name_stack: Vec<String>,
    pub(crate) module_info: Option<ExternalModuleInfo>,
    pub(crate) system_exports_name: Option<String>,

    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Printer<'a> {
    #[must_use]
    pub fn new(
        arena: &'a NodeArena,
        resolver: &'a dyn EmitResolver,
        options: &'a CompilerOptions,
    ) -> Self {
        Self {
            arena,
            resolver,
            options,
            writer: SourceWriter::new(options.new_line.as_str()),
            source_map: None,
            current_source_file: NodeIndex::NONE,
            source_text: None,
            line_starts: None,
            source_file_count: 0,
            module_kind: options.module,
            original_module_kind: None,
            temp_flags_state: temp_flags::AUTO,
            temp_variables: Vec::new(),
            temp_parameters: Vec::new(),
            generated_names: FxHashSet::default(),
            node_generated_names: FxHashMap::default(),
            block_scoped_renames: FxHashMap::default(),
            computed_property_temps: FxHashMap::default(),
            detached_comment_end: None,
            this_substitution: None,
            super_name: None,
            namespace_stack: Vec::new(),
            scope_name_stack: Vec::new(),
            module_info: None,
            system_exports_name: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn set_source_map(&mut self, map: SourceMapWriter) {
        self.source_map = Some(map);
    }

    #[must_use]
    pub fn finish(self) -> PrintedOutput {
        PrintedOutput {
            code: self.writer.get_text(),
            diagnostics: diagnostics::sort_and_deduplicate(self.diagnostics),
            source_map: self.source_map,
        }
    }

    // =========================================================================
    // Writer plumbing
    // =========================================================================

    #[inline]
    pub(crate) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    #[inline]
    pub(crate) fn write_line(&mut self) {
        self.writer.write_line();
    }

    #[inline]
    pub(crate) fn write_space(&mut self) {
        self.writer.write(" ");
    }

    #[inline]
    pub(crate) fn write_semicolon(&mut self) {
        self.writer.write(";");
    }

    #[inline]
    pub(crate) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    #[inline]
    pub(crate) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    // =========================================================================
    // Source-map recording
    // =========================================================================

    fn record_span_at(&mut self, source_pos: u32) {
        let (Some(map), Some(line_starts)) = (self.source_map.as_mut(), self.line_starts) else {
            return;
        };
        let (line, column) = line_and_column_of(line_starts, source_pos);
        let emitted_line = self.writer.get_line();
        let emitted_column = self.writer.get_column();
        map.record_span(emitted_line, emitted_column, line + 1, column + 1);
    }

    pub(crate) fn record_emit_node_start(&mut self, node: &Node) {
        if self.source_map.is_none() || node.is_synthesized() || node.pos >= node.end {
            return;
        }
        let pos = self
            .source_text
            .map_or(node.pos, |text| skip_trivia(text, node.pos));
        self.record_span_at(pos);
    }

    pub(crate) fn record_emit_node_end(&mut self, node: &Node) {
        if self.source_map.is_none() || node.is_synthesized() || node.pos >= node.end {
            return;
        }
        self.record_span_at(node.end);
    }

    /// Write token text, recording a span at its source position.
    pub(crate) fn emit_token(&mut self, text: &str, source_pos: u32) {
        if source_pos != u32::MAX {
            self.record_span_at(source_pos);
        }
        self.write(text);
    }

    /// Enter a named scope for the map's names table.
    pub(crate) fn record_scope_name_start(&mut self, name: &str) {
        if self.source_map.is_none() {
            return;
        }
        let qualified = match self.scope_name_stack.last() {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };
        self.scope_name_stack.push(qualified.clone());
        if let Some(map) = self.source_map.as_mut() {
            map.push_scope(&qualified);
        }
    }

    pub(crate) fn record_scope_name_end(&mut self) {
        if self.source_map.is_none() {
            return;
        }
        self.scope_name_stack.pop();
        if let Some(map) = self.source_map.as_mut() {
            map.pop_scope();
        }
    }

    // =========================================================================
    // Lexical environment frames
    // =========================================================================

    /// Save and reset the scoped name-generator slots on entry to a function,
    /// class, or module body. Temporaries invented inside never leak out, and
    /// names can be reused across sibling scopes.
    pub(crate) fn save_temp_state(&mut self) -> TempState {
        TempState {
            temp_flags: std::mem::replace(&mut self.temp_flags_state, temp_flags::AUTO),
            temp_variables: std::mem::take(&mut self.temp_variables),
            temp_parameters: std::mem::take(&mut self.temp_parameters),
        }
    }

    pub(crate) fn restore_temp_state(&mut self, saved: TempState) {
        self.temp_flags_state = saved.temp_flags;
        self.temp_variables = saved.temp_variables;
        self.temp_parameters = saved.temp_parameters;
    }

    /// Flush `var t1, t2;` for temporaries accumulated in the current frame.
    /// Emitted at body exit, on its own line.
    pub(crate) fn emit_temp_declarations(&mut self) {
        if self.temp_variables.is_empty() {
            return;
        }
        let names = std::mem::take(&mut self.temp_variables);
        self.write("var ");
        self.write(&names.join(", "));
        self.write_semicolon();
        self.write_line();
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_on_node(&mut self, node: &Node, code: u32, message: impl Into<String>) {
        let file = self
            .arena
            .get(self.current_source_file)
            .and_then(|n| self.arena.get_source_file(n))
            .map_or_else(String::new, |f| f.file_name.clone());
        self.diagnostics.push(Diagnostic::error(
            file,
            node.pos,
            node.end.saturating_sub(node.pos),
            message,
            code,
        ));
    }

    // =========================================================================
    // Position helpers
    // =========================================================================

    /// A node counts as single-line only when it has a real span confined to
    /// one source line. Synthesized nodes format multi-line.
    pub(crate) fn is_single_line(&self, node: &Node) -> bool {
        if node.is_synthesized() || node.pos >= node.end {
            return false;
        }
        let Some(line_starts) = self.line_starts else {
            return false;
        };
        quill_ast::lines::line_of(line_starts, node.pos)
            == quill_ast::lines::line_of(line_starts, node.end)
    }

    /// True only when both nodes have real spans that start on different
    /// source lines. List emitters use this to choose newline-comma over
    /// inline-comma output; synthesized lists stay inline.
    pub(crate) fn nodes_on_separate_lines(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let (Some(line_starts), Some(na), Some(nb)) =
            (self.line_starts, self.arena.get(a), self.arena.get(b))
        else {
            return false;
        };
        if na.is_synthesized() || nb.is_synthesized() || na.pos >= na.end || nb.pos >= nb.end {
            return false;
        }
        quill_ast::lines::line_of(line_starts, na.pos)
            != quill_ast::lines::line_of(line_starts, nb.pos)
    }

    // =========================================================================
    // Entry point and dispatch
    // =========================================================================

    /// Emit one node. Invalid indices emit nothing; malformed data pools are a
    /// programming error upstream.
    pub fn emit(&mut self, idx: NodeIndex) {
        if idx.is_none() {
            return;
        }
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let node = *node;
        self.record_emit_node_start(&node);
        self.emit_node(&node, idx);
        self.record_emit_node_end(&node);
    }

    /// Alias of `emit` kept for call sites that read better with an
    /// expression-shaped name.
    #[inline]
    pub(crate) fn emit_expression(&mut self, idx: NodeIndex) {
        self.emit(idx);
    }

    fn emit_node(&mut self, node: &Node, idx: NodeIndex) {
        if node.kind.is_type_node() {
            return;
        }
        match node.kind {
            SyntaxKind::Identifier => self.emit_identifier(node, idx),
            SyntaxKind::QualifiedName => self.emit_qualified_name(node),
            SyntaxKind::ComputedPropertyName => self.emit_computed_property_name(node, idx),

            SyntaxKind::NumericLiteral => self.emit_numeric_literal(node),
            SyntaxKind::StringLiteral => self.emit_string_literal(node),
            SyntaxKind::RegularExpressionLiteral => self.emit_regex_literal(node),
            SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::TemplateMiddle
            | SyntaxKind::TemplateTail => self.emit_template_part(node),

            SyntaxKind::ThisKeyword => self.emit_this(node),
            SyntaxKind::SuperKeyword => self.emit_super(node),
            SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => self.write(node.kind.token_text()),

            SyntaxKind::ArrayLiteralExpression => self.emit_array_literal(node),
            SyntaxKind::ObjectLiteralExpression => self.emit_object_literal(node, idx),
            SyntaxKind::PropertyAccessExpression => self.emit_property_access(node, idx),
            SyntaxKind::ElementAccessExpression => self.emit_element_access(node),
            SyntaxKind::CallExpression => self.emit_call_expression(node),
            SyntaxKind::NewExpression => self.emit_new_expression(node),
            SyntaxKind::TaggedTemplateExpression => self.emit_tagged_template_expression(node),
            SyntaxKind::TypeAssertionExpression => self.emit_type_assertion(node),
            SyntaxKind::ParenthesizedExpression => self.emit_parenthesized_expression(node),
            SyntaxKind::FunctionExpression => self.emit_function_expression(node, idx),
            SyntaxKind::ArrowFunction => self.emit_arrow_function(node, idx),
            SyntaxKind::DeleteExpression => self.emit_unary_keyword_expression(node, "delete"),
            SyntaxKind::TypeOfExpression => self.emit_unary_keyword_expression(node, "typeof"),
            SyntaxKind::VoidExpression => self.emit_unary_keyword_expression(node, "void"),
            SyntaxKind::PrefixUnaryExpression => self.emit_prefix_unary(node),
            SyntaxKind::PostfixUnaryExpression => self.emit_postfix_unary(node),
            SyntaxKind::BinaryExpression => self.emit_binary_expression(node, idx),
            SyntaxKind::ConditionalExpression => self.emit_conditional_expression(node),
            SyntaxKind::TemplateExpression => self.emit_template_expression(node, idx),
            SyntaxKind::TemplateSpan => self.emit_template_span(node),
            SyntaxKind::YieldExpression => self.emit_yield_expression(node),
            SyntaxKind::SpreadElement => self.emit_spread_element(node),
            SyntaxKind::ClassExpression => self.emit_class_expression(node, idx),
            SyntaxKind::OmittedExpression => {}
            SyntaxKind::ExpressionWithTypeArguments => {
                if let Some(wrapped) = self.arena.get_wrapped_expr(node) {
                    self.emit(wrapped.expression);
                }
            }

            SyntaxKind::Block => self.emit_block(node, idx),
            SyntaxKind::VariableStatement => self.emit_variable_statement(node, idx),
            SyntaxKind::EmptyStatement => self.write_semicolon(),
            SyntaxKind::ExpressionStatement => self.emit_expression_statement(node),
            SyntaxKind::IfStatement => self.emit_if_statement(node),
            SyntaxKind::DoStatement => self.emit_do_statement(node),
            SyntaxKind::WhileStatement => self.emit_while_statement(node),
            SyntaxKind::ForStatement => self.emit_for_statement(node),
            SyntaxKind::ForInStatement => self.emit_for_in_statement(node),
            SyntaxKind::ForOfStatement => self.emit_for_of_statement(node, idx),
            SyntaxKind::ContinueStatement => self.emit_break_or_continue(node, "continue"),
            SyntaxKind::BreakStatement => self.emit_break_or_continue(node, "break"),
            SyntaxKind::ReturnStatement => self.emit_return_statement(node),
            SyntaxKind::WithStatement => self.emit_with_statement(node),
            SyntaxKind::SwitchStatement => self.emit_switch_statement(node),
            SyntaxKind::CaseClause | SyntaxKind::DefaultClause => self.emit_case_clause(node),
            SyntaxKind::LabeledStatement => self.emit_labeled_statement(node),
            SyntaxKind::ThrowStatement => self.emit_throw_statement(node),
            SyntaxKind::TryStatement => self.emit_try_statement(node),
            SyntaxKind::CatchClause => self.emit_catch_clause(node),
            SyntaxKind::DebuggerStatement => {
                self.write("debugger");
                self.write_semicolon();
            }

            SyntaxKind::VariableDeclarationList => self.emit_variable_declaration_list(node),
            SyntaxKind::VariableDeclaration => self.emit_variable_declaration(node, idx),
            SyntaxKind::FunctionDeclaration => self.emit_function_declaration(node, idx),
            SyntaxKind::ClassDeclaration => self.emit_class_declaration(node, idx),
            SyntaxKind::InterfaceDeclaration | SyntaxKind::TypeAliasDeclaration => {
                // Erased: types leave only their comments behind.
            }
            SyntaxKind::EnumDeclaration => self.emit_enum_declaration(node, idx),
            SyntaxKind::ModuleDeclaration => self.emit_module_declaration(node, idx),
            SyntaxKind::ImportEqualsDeclaration => self.emit_import_equals_declaration(node, idx),
            SyntaxKind::ImportDeclaration => self.emit_import_declaration(node, idx),
            SyntaxKind::ExportDeclaration => self.emit_export_declaration(node, idx),
            SyntaxKind::ExportAssignment => self.emit_export_assignment(node, idx),

            SyntaxKind::PropertyAssignment => self.emit_property_assignment(node),
            SyntaxKind::ShorthandPropertyAssignment => self.emit_shorthand_property(node, idx),

            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
                self.emit_binding_pattern_verbatim(node)
            }
            SyntaxKind::BindingElement => self.emit_binding_element_verbatim(node),

            SyntaxKind::Parameter => self.emit_parameter(node),

            SyntaxKind::SourceFile => self.emit_source_file_node(idx),

            // Class members are emitted by their class; signatures and
            // semicolon members produce nothing on their own.
            SyntaxKind::PropertyDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::Constructor
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor
            | SyntaxKind::SemicolonClassElement
            | SyntaxKind::PropertySignature
            | SyntaxKind::MethodSignature
            | SyntaxKind::IndexSignature
            | SyntaxKind::Decorator
            | SyntaxKind::HeritageClause
            | SyntaxKind::ImportClause
            | SyntaxKind::NamespaceImport
            | SyntaxKind::NamedImports
            | SyntaxKind::NamedExports
            | SyntaxKind::ImportSpecifier
            | SyntaxKind::ExportSpecifier
            | SyntaxKind::ExternalModuleReference
            | SyntaxKind::EnumMember => {}

            _ => {
                debug_assert!(
                    false,
                    "emit dispatch reached an unexpected node kind: {:?}",
                    node.kind
                );
            }
        }
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub(crate) fn emit_comma_separated(&mut self, nodes: &[NodeIndex]) {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit(node);
        }
    }

    /// Emit statements one per line, routing comments around each.
    pub(crate) fn emit_lines(&mut self, statements: &[NodeIndex]) {
        for &stmt_idx in statements {
            self.emit_statement_with_comments(stmt_idx);
        }
    }

    pub(crate) fn emit_statement_with_comments(&mut self, stmt_idx: NodeIndex) {
        let Some(stmt) = self.arena.get(stmt_idx) else {
            return;
        };
        let stmt = *stmt;
        self.emit_leading_comments_of_node(&stmt);
        let before_len = self.writer.len();
        self.emit(stmt_idx);
        if self.writer.len() > before_len {
            self.emit_trailing_comments_of_node(&stmt);
            self.write_line();
        }
    }
}
