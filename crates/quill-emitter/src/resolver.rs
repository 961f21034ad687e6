//! The checker-facing capability the emitter consumes.
//!
//! Every semantic question the emitter has — is this alias referenced, what
//! is this enum member's value, which block-scoped binding does this
//! identifier resolve to — goes through this trait. All calls are read-only
//! from the emitter's perspective.

use quill_ast::NodeIndex;

/// Check flags the resolver computes per node during checking.
pub mod check_flags {
    /// The function's body closes over lexical `this` somewhere below it and
    /// must open with `var _this = this;`.
    pub const CAPTURE_THIS: u32 = 1 << 0;
    /// `this` inside this node refers to an enclosing function's `this` and
    /// emits as `_this`.
    pub const LEXICAL_THIS: u32 = 1 << 1;
}

pub trait EmitResolver {
    /// Is `name` bound in the global scope? Generated names must avoid these.
    fn has_global_name(&self, name: &str) -> bool;

    /// Constant value of a const-enum member access, if statically known.
    fn get_constant_value(&self, node: NodeIndex) -> Option<f64>;

    /// Replacement text for an identifier reference that must be rewritten
    /// (imported binding, namespace-exported member), e.g. `m_1.y` or `M.x`.
    fn get_expression_name_substitution(&self, node: NodeIndex) -> Option<String>;

    /// Id of the block-scoped binding an identifier declares or references.
    fn get_block_scoped_variable_id(&self, node: NodeIndex) -> Option<u32>;

    /// Does `node`'s name resolve to some value in the enclosing scope?
    /// Drives block-scope collision renaming and namespace instantiation.
    fn resolves_to_some_value(&self, node: NodeIndex) -> bool;

    fn get_node_check_flags(&self, node: NodeIndex) -> u32;

    /// Is this alias declaration referenced as a value anywhere?
    fn is_referenced_alias_declaration(&self, node: NodeIndex) -> bool;

    /// Does this import/export specifier name a value (not a type)?
    fn is_value_alias_declaration(&self, node: NodeIndex) -> bool;

    /// Serialized design-time type for `__metadata("design:type", ...)`.
    fn serialize_type_of_node(&self, node: NodeIndex) -> String;

    /// Serialized parameter types for `__metadata("design:paramtypes", ...)`.
    fn serialize_parameter_types_of_node(&self, node: NodeIndex) -> Vec<String>;

    /// Serialized return type for `__metadata("design:returntype", ...)`.
    fn serialize_return_type_of_node(&self, node: NodeIndex) -> String;
}

/// A resolver with no semantic knowledge. Aliases count as referenced, no
/// substitutions apply, every namespace is instantiated. Used by tests and by
/// drivers that emit unchecked trees.
#[derive(Default)]
pub struct NullResolver;

impl EmitResolver for NullResolver {
    fn has_global_name(&self, _name: &str) -> bool {
        false
    }

    fn get_constant_value(&self, _node: NodeIndex) -> Option<f64> {
        None
    }

    fn get_expression_name_substitution(&self, _node: NodeIndex) -> Option<String> {
        None
    }

    fn get_block_scoped_variable_id(&self, _node: NodeIndex) -> Option<u32> {
        None
    }

    fn resolves_to_some_value(&self, _node: NodeIndex) -> bool {
        false
    }

    fn get_node_check_flags(&self, _node: NodeIndex) -> u32 {
        0
    }

    fn is_referenced_alias_declaration(&self, _node: NodeIndex) -> bool {
        true
    }

    fn is_value_alias_declaration(&self, _node: NodeIndex) -> bool {
        true
    }

    fn serialize_type_of_node(&self, _node: NodeIndex) -> String {
        "Object".to_string()
    }

    fn serialize_parameter_types_of_node(&self, _node: NodeIndex) -> Vec<String> {
        Vec::new()
    }

    fn serialize_return_type_of_node(&self, _node: NodeIndex) -> String {
        "void 0".to_string()
    }
}
