//! JavaScript code emission for the quill compiler.
//!
//! This crate turns a checked, fully-resolved AST into executable JavaScript
//! text and, optionally, a column-accurate source map. It is a tree-directed
//! pretty printer fused with a multi-target desyntaxer (classes,
//! destructuring, `for-of`, templates, decorators, parameters), a
//! collision-free name generator, a module framer for the CommonJS, AMD,
//! UMD, System, and ES2015 envelopes, and a Base64-VLQ source-map encoder.
//!
//! Semantic questions go through the [`resolver::EmitResolver`] capability;
//! file I/O goes through [`host::EmitHost`]. The emitter itself is
//! synchronous, single-threaded, and keeps all mutable state local to one
//! file's emission.

pub mod emit;
pub mod helpers;
pub mod host;
pub mod printer;
pub mod resolver;
pub mod source_map;
pub mod writer;

pub use emit::{emit_files, print_source_file, EmitResult};
pub use host::{EmitHost, MemoryHost};
pub use printer::{PrintedOutput, Printer};
pub use resolver::{EmitResolver, NullResolver};
pub use source_map::{SourceMapData, SourceMapJson, SourceMapWriter};
pub use writer::SourceWriter;
