//! Common types shared across the quill compiler phases.
//!
//! These are the leaf types every other crate depends on: the emission
//! target, the module system kind, newline handling, compiler options, and
//! diagnostics. Keeping them here establishes a clear dependency hierarchy:
//!
//! ```text
//! quill-common (base layer)
//!   ↓
//! quill-ast → quill-emitter
//! ```

pub mod diagnostics;
pub mod options;

pub use diagnostics::{Diagnostic, DiagnosticCategory};
pub use options::CompilerOptions;

/// ECMAScript target version.
///
/// This determines which language features survive emission verbatim and
/// which are lowered to an earlier form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum ScriptTarget {
    /// ECMAScript 3 (1999)
    #[default]
    ES3 = 0,

    /// ECMAScript 5 (2009)
    ES5 = 1,

    /// ECMAScript 2015 (6th Edition)
    ES2015 = 2,
}

impl ScriptTarget {
    /// Check if this target supports ES2015+ features (classes, arrows,
    /// template literals, destructuring, `let`/`const`).
    #[must_use]
    pub const fn supports_es2015(self) -> bool {
        (self as u8) >= (Self::ES2015 as u8)
    }

    /// Check if this is an ES5-or-earlier target (requires downleveling).
    #[must_use]
    pub const fn is_es5(self) -> bool {
        (self as u8) <= (Self::ES5 as u8)
    }
}

/// Module system kind.
///
/// Determines which envelope is wrapped around a file's top-level statements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum ModuleKind {
    /// No module system (script mode)
    #[default]
    None = 0,

    /// `CommonJS` (Node.js style)
    CommonJS = 1,

    /// Asynchronous Module Definition (`RequireJS` style)
    AMD = 2,

    /// Universal Module Definition
    UMD = 3,

    /// `SystemJS`
    System = 4,

    /// ES2015 modules (import/export emitted verbatim)
    ES2015 = 5,
}

impl ModuleKind {
    /// Check if this is a CommonJS-like module system.
    #[must_use]
    pub const fn is_commonjs(self) -> bool {
        matches!(self, Self::CommonJS | Self::UMD)
    }

    /// Check if import/export statements are preserved as written.
    #[must_use]
    pub const fn is_es_module(self) -> bool {
        matches!(self, Self::ES2015)
    }
}

/// New line kind for source file emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NewLineKind {
    /// Line Feed (\n) - Unix, Linux, macOS
    #[default]
    LineFeed = 0,

    /// Carriage Return + Line Feed (\r\n) - Windows
    CarriageReturnLineFeed = 1,
}

impl NewLineKind {
    /// Get the newline as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LineFeed => "\n",
            Self::CarriageReturnLineFeed => "\r\n",
        }
    }
}

#[cfg(test)]
#[path = "tests/common.rs"]
mod tests;
