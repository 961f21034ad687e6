//! Diagnostics produced during emission.
//!
//! The emitter never throws on semantic gaps; it records a diagnostic and
//! keeps going. Duplicates arising from multiple code paths on the same
//! position are removed by the final sort-and-dedup step.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        }
    }
}

/// Sort diagnostics by (file, start, code) and drop exact positional
/// duplicates. The emitter may reach the same semantic gap through more than
/// one code path; only one report survives.
pub fn sort_and_deduplicate(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.start.cmp(&b.start))
            .then(a.code.cmp(&b.code))
    });
    diagnostics.dedup_by(|a, b| a.file == b.file && a.start == b.start && a.code == b.code);
    diagnostics
}

/// Diagnostic codes used by the emission core.
pub mod codes {
    /// Function implementation is missing or not immediately following the declaration.
    pub const FUNCTION_IMPLEMENTATION_MISSING: u32 = 2391;
    /// Decorators are not valid here.
    pub const DECORATOR_NOT_VALID_HERE: u32 = 1206;
    /// Could not write file '{0}'.
    pub const COULD_NOT_WRITE_FILE: u32 = 5033;
}
