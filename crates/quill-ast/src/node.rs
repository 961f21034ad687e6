//! Thin node headers and typed data pools.
//!
//! Every AST node is a 16-byte header in `NodeArena::nodes`; kind-specific
//! children live in typed side pools addressed by `Node::data`. Parent
//! back-references sit in a parallel `extended` table so the header stays
//! small and the ownership graph stays acyclic.

use crate::syntax_kind::SyntaxKind;

/// Index of a node in the arena. `NONE` marks an absent child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// An ordered list of child nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    #[must_use]
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Modifier and shape flags packed into the node header.
pub mod node_flags {
    pub const EXPORT: u32 = 1 << 0;
    pub const DEFAULT: u32 = 1 << 1;
    pub const AMBIENT: u32 = 1 << 2;
    pub const PUBLIC: u32 = 1 << 3;
    pub const PRIVATE: u32 = 1 << 4;
    pub const PROTECTED: u32 = 1 << 5;
    pub const STATIC: u32 = 1 << 6;
    pub const ASYNC: u32 = 1 << 7;
    pub const LET: u32 = 1 << 8;
    pub const CONST: u32 = 1 << 9;
    /// Rest parameter or rest binding element.
    pub const REST: u32 = 1 << 10;
    /// `export =` assignment (as opposed to `export default`).
    pub const EXPORT_EQUALS: u32 = 1 << 11;
    /// `const enum` declaration.
    pub const CONST_ENUM: u32 = 1 << 12;
    /// Node was manufactured during lowering; it has no valid source span.
    pub const SYNTHESIZED: u32 = 1 << 13;
    /// Construct spanned multiple lines in the source.
    pub const MULTILINE: u32 = 1 << 14;

    pub const BLOCK_SCOPED: u32 = LET | CONST;
    pub const ACCESSIBILITY: u32 = PUBLIC | PRIVATE | PROTECTED;
}

/// A 16-byte node header.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    /// Packed `node_flags` bits (low 16 are stored; the constants fit).
    pub flags: u16,
    /// Start position in source, excluding leading trivia of preceding node.
    pub pos: u32,
    /// End position in source.
    pub end: u32,
    /// Index into the kind's data pool; `NO_DATA` for tokens.
    pub data: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    #[must_use]
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data: Self::NO_DATA,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_data(kind: SyntaxKind, pos: u32, end: u32, data: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_flag(&self, flag: u32) -> bool {
        u32::from(self.flags) & flag != 0
    }

    /// Synthesized nodes carry no valid span: source maps and comment
    /// emission are suppressed for them.
    #[inline]
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.has_flag(node_flags::SYNTHESIZED)
    }
}

/// Parent mapping and other cold per-node data.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        Self {
            parent: NodeIndex::NONE,
        }
    }
}

// =============================================================================
// Typed data pools
// =============================================================================

/// Identifier text. The emitter treats this as verbatim source text unless a
/// substitution or rename applies.
#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub text: String,
}

/// Literal text: cooked value for strings and template parts, source text for
/// numbers and regular expressions.
#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct TemplateExprData {
    pub head: NodeIndex,
    pub spans: NodeList,
}

#[derive(Clone, Debug)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator: SyntaxKind,
    pub right: NodeIndex,
}

/// Prefix and postfix unary expressions.
#[derive(Clone, Debug)]
pub struct UnaryExprData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

/// Property access (`member` is an identifier) and element access (`member`
/// is an expression) share this layout.
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub member: NodeIndex,
}

/// Call and `new` expressions.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: NodeList,
}

/// Single-child wrappers: parenthesized, type assertion, spread, computed
/// property name, delete/typeof/void, yield, expression statement, external
/// module reference, decorator.
#[derive(Clone, Debug)]
pub struct WrappedExprData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// Array and object literal expressions.
#[derive(Clone, Debug)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

/// Function-likes: declarations, expressions, arrows, methods, constructors,
/// accessors. `body` is a block, or an expression for concise arrows, or
/// `NONE` for overload signatures and ambient declarations.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
    pub decorators: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    /// Base class expression, `NONE` when the class has no heritage.
    pub base: NodeIndex,
    pub members: NodeList,
    pub decorators: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct PropertyDeclData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub decorators: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    /// Identifier or binding pattern.
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub decorators: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Module (namespace) declaration. `body` is a module block or a nested
/// module declaration (for dotted names).
#[derive(Clone, Debug)]
pub struct ModuleData {
    pub name: NodeIndex,
    pub body: NodeIndex,
}

/// Statement-bearing containers: blocks, module blocks.
#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: NodeList,
}

/// Variable statements hold one declaration list; declaration lists hold
/// declarations. Both levels use this pool, as in the teacher compiler.
#[derive(Clone, Debug)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    /// Identifier or binding pattern.
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug)]
pub struct BindingElementData {
    /// Property name when destructuring renames (`{ p: name }`), else `NONE`.
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Property assignments in object literals. Shorthand assignments have
/// `initializer == NONE`.
#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IfData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `for`, `while`, `do` loops. `while`/`do` use only `condition`/`statement`.
#[derive(Clone, Debug)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForInOfData {
    /// Variable declaration list or an expression target.
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

/// Return and throw statements; `expression` may be `NONE` for bare returns.
#[derive(Clone, Debug)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub clauses: NodeList,
}

/// Case and default clauses; default clauses have `expression == NONE`.
#[derive(Clone, Debug)]
pub struct CaseClauseData {
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

/// Labeled statements, and break/continue (which use only `label`).
#[derive(Clone, Debug)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportClauseData {
    /// Default import binding, or `NONE`.
    pub name: NodeIndex,
    /// `NamespaceImport` or `NamedImports`, or `NONE`.
    pub named_bindings: NodeIndex,
}

/// `NamespaceImport` and other single-name nodes.
#[derive(Clone, Debug)]
pub struct NameData {
    pub name: NodeIndex,
}

/// `NamedImports` / `NamedExports` element lists.
#[derive(Clone, Debug)]
pub struct NamedBindingsData {
    pub elements: NodeList,
}

/// Import and export specifiers: `property_name` is the name in the module,
/// `name` the local alias (`NONE` property when they coincide).
#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    /// `NamedExports`, or `NONE` for `export *`.
    pub export_clause: NodeIndex,
    /// Module specifier string literal, or `NONE` for local re-exports.
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportEqualsData {
    pub name: NodeIndex,
    /// `ExternalModuleReference` or an entity name.
    pub module_reference: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub text: String,
    pub statements: NodeList,
    pub line_starts: Vec<u32>,
    pub is_external_module: bool,
}
