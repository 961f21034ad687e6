//! Compiler options recognized by the emitter.

use crate::{ModuleKind, NewLineKind, ScriptTarget};

/// The option set the emission core consults.
///
/// The surrounding driver parses and validates these; the emitter only reads
/// them. Field names follow the compiler's public option names.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Lowering level: constructs newer than this are desugared.
    pub target: ScriptTarget,

    /// Module envelope for external modules.
    pub module: ModuleKind,

    /// Produce a `.js.map` companion per output file.
    pub source_map: bool,

    /// Prefix recorded in the map's `sourceRoot` field.
    pub source_root: Option<String>,

    /// Directory the `sourceMappingURL` comment points into.
    pub map_root: Option<String>,

    /// Concatenate non-external-module files into a single output file.
    pub out: Option<String>,

    /// Prepend a UTF-8 BOM to emitted JavaScript.
    pub emit_bom: bool,

    /// Strip comments, keeping only `/*!` pinned and triple-slash directives.
    pub remove_comments: bool,

    /// Emit const enum bodies instead of erasing them.
    pub preserve_const_enums: bool,

    /// Compile each file in isolation: forbids cross-file const enum inlining.
    pub separate_compilation: bool,

    /// A `.d.ts` companion is produced by the external declaration emitter.
    pub declaration: bool,

    /// Append `__metadata(...)` design-time type entries to decorator calls.
    pub emit_decorator_metadata: bool,

    /// Newline sequence for emitted files.
    pub new_line: NewLineKind,
}

impl CompilerOptions {
    /// ES5 target, no module envelope.
    #[must_use]
    pub fn es5() -> Self {
        Self {
            target: ScriptTarget::ES5,
            ..Self::default()
        }
    }

    /// ES2015 target, no module envelope.
    #[must_use]
    pub fn es2015() -> Self {
        Self {
            target: ScriptTarget::ES2015,
            ..Self::default()
        }
    }

    /// ES5 target with the CommonJS envelope.
    #[must_use]
    pub fn es5_commonjs() -> Self {
        Self {
            target: ScriptTarget::ES5,
            module: ModuleKind::CommonJS,
            ..Self::default()
        }
    }
}
