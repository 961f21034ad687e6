//! Arena-allocated AST for the quill compiler.
//!
//! The parser and checker live elsewhere; this crate defines the node
//! representation they hand to the emitter: thin 16-byte headers with typed
//! side pools, parent back-references as integer indices (no ownership
//! cycles), plus the trivia scanning and line tables the emitter needs to
//! reason about source positions.

pub mod arena;
pub mod comments;
pub mod lines;
pub mod node;
pub mod syntax_kind;
pub mod walk;

pub use arena::NodeArena;
pub use node::{node_flags, Node, NodeIndex, NodeList};
pub use syntax_kind::SyntaxKind;
