//! Source-map recording and encoding.
//!
//! Every node emission is bracketed by start/end span recording; spans are
//! deduplicated, delta-compressed against the previously encoded span, and
//! written as Base64-VLQ segments. Lines in the mappings string are separated
//! by `;`, segments within a line by `,`. All recorded positions are 1-based
//! (the writer's convention); the encoder subtracts the base.

use rustc_hash::FxHashMap;

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// One mapping from an emitted position to a source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceMapSpan {
    pub emitted_line: u32,
    pub emitted_column: u32,
    pub source_line: u32,
    pub source_column: u32,
    pub source_index: u32,
    pub name_index: Option<u32>,
}

/// The JSON sidecar, minus the mappings assembly.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SourceMapJson {
    pub version: u32,
    pub file: String,
    #[serde(rename = "sourceRoot")]
    pub source_root: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

/// Data the orchestrator returns per emitted map.
#[derive(Clone, Debug)]
pub struct SourceMapData {
    /// The emitted `.js` file the map describes.
    pub js_file: String,
    /// Path the map was written to.
    pub map_file: String,
    /// Value of the `//# sourceMappingURL=` comment.
    pub mapping_url: String,
    pub map: SourceMapJson,
}

pub struct SourceMapWriter {
    sources: Vec<String>,
    names: Vec<String>,
    name_indices: FxHashMap<String, u32>,
    /// Qualified scope names currently open, innermost last.
    name_stack: Vec<u32>,
    mappings: String,
    last_recorded: Option<SourceMapSpan>,
    last_encoded: SourceMapSpan,
    last_encoded_name_index: u32,
    current_source_index: u32,
    js_file: String,
    source_root: String,
}

impl SourceMapWriter {
    #[must_use]
    pub fn new(js_file: impl Into<String>, source_root: impl Into<String>) -> Self {
        Self {
            sources: Vec::new(),
            names: Vec::new(),
            name_indices: FxHashMap::default(),
            name_stack: Vec::new(),
            mappings: String::new(),
            last_recorded: None,
            last_encoded: SourceMapSpan {
                emitted_line: 1,
                emitted_column: 1,
                source_line: 1,
                source_column: 1,
                source_index: 0,
                name_index: None,
            },
            last_encoded_name_index: 0,
            current_source_index: 0,
            js_file: js_file.into(),
            source_root: source_root.into(),
        }
    }

    /// Register a new input file; subsequent spans reference it. Returns the
    /// source index. The running encoder state carries across files so a
    /// concatenated (`--out`) stream stays monotonic.
    pub fn add_source(&mut self, path: impl Into<String>) -> u32 {
        self.sources.push(path.into());
        self.current_source_index = (self.sources.len() - 1) as u32;
        self.current_source_index
    }

    #[must_use]
    pub fn current_source_index(&self) -> u32 {
        self.current_source_index
    }

    /// Enter a named scope (function/class/module/enum). `name` is already
    /// qualified by the caller (`parent.child`).
    pub fn push_scope(&mut self, name: &str) {
        let index = if let Some(&existing) = self.name_indices.get(name) {
            existing
        } else {
            let index = self.names.len() as u32;
            self.names.push(name.to_string());
            self.name_indices.insert(name.to_string(), index);
            index
        };
        self.name_stack.push(index);
    }

    pub fn pop_scope(&mut self) {
        self.name_stack.pop();
    }

    #[must_use]
    pub fn current_name_index(&self) -> Option<u32> {
        self.name_stack.last().copied()
    }

    /// Record a span mapping the emitted position to a source position.
    ///
    /// A new record is only kept if the emitted position moved, or if the
    /// source position moved backwards (lowering rewrites emit children out
    /// of source order).
    pub fn record_span(
        &mut self,
        emitted_line: u32,
        emitted_column: u32,
        source_line: u32,
        source_column: u32,
    ) {
        let span = SourceMapSpan {
            emitted_line,
            emitted_column,
            source_line,
            source_column,
            source_index: self.current_source_index,
            name_index: self.current_name_index(),
        };

        if let Some(last) = self.last_recorded {
            if last.emitted_line == span.emitted_line
                && last.emitted_column == span.emitted_column
            {
                let moved_backwards = span.source_index == last.source_index
                    && (span.source_line < last.source_line
                        || (span.source_line == last.source_line
                            && span.source_column < last.source_column));
                if moved_backwards {
                    self.last_recorded = Some(span);
                }
                return;
            }
            self.encode_last_recorded();
        }
        self.last_recorded = Some(span);
    }

    fn encode_last_recorded(&mut self) {
        let Some(span) = self.last_recorded.take() else {
            return;
        };

        if span.emitted_line > self.last_encoded.emitted_line {
            for _ in self.last_encoded.emitted_line..span.emitted_line {
                self.mappings.push(';');
            }
            self.last_encoded.emitted_line = span.emitted_line;
            self.last_encoded.emitted_column = 1;
        } else if !self.mappings.is_empty() && !self.mappings.ends_with(';') {
            self.mappings.push(',');
        }

        base64_vlq_encode(
            &mut self.mappings,
            i64::from(span.emitted_column) - i64::from(self.last_encoded.emitted_column),
        );
        base64_vlq_encode(
            &mut self.mappings,
            i64::from(span.source_index) - i64::from(self.last_encoded.source_index),
        );
        base64_vlq_encode(
            &mut self.mappings,
            i64::from(span.source_line) - i64::from(self.last_encoded.source_line),
        );
        base64_vlq_encode(
            &mut self.mappings,
            i64::from(span.source_column) - i64::from(self.last_encoded.source_column),
        );
        if let Some(name_index) = span.name_index {
            base64_vlq_encode(
                &mut self.mappings,
                i64::from(name_index) - i64::from(self.last_encoded_name_index),
            );
            self.last_encoded_name_index = name_index;
        }

        self.last_encoded = span;
    }

    /// Flush the pending span and assemble the JSON sidecar.
    #[must_use]
    pub fn finish(mut self, map_file: String, mapping_url: String) -> SourceMapData {
        self.encode_last_recorded();
        SourceMapData {
            js_file: self.js_file.clone(),
            map_file,
            mapping_url,
            map: SourceMapJson {
                version: 3,
                file: file_name_of(&self.js_file),
                source_root: self.source_root,
                sources: self.sources,
                names: self.names,
                mappings: self.mappings,
            },
        }
    }
}

fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Zig-zag + Base64-VLQ encode one value: non-negative `v` becomes `v << 1`,
/// negative becomes `((-v) << 1) + 1`; 5-bit groups are emitted LSB-first
/// with the sixth bit set on every group but the last.
pub fn base64_vlq_encode(out: &mut String, value: i64) {
    let mut v: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (v & 0x1F) as u8;
        v >>= 5;
        if v > 0 {
            digit |= 0x20;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if v == 0 {
            break;
        }
    }
}

/// Decode a Base64-VLQ stream into values. Used by tests and by the
/// map-validating debug paths.
#[must_use]
pub fn base64_vlq_decode(text: &str) -> Vec<i64> {
    let mut values = Vec::new();
    let mut shift = 0u32;
    let mut acc: u64 = 0;
    for ch in text.bytes() {
        let digit = BASE64_CHARS.iter().position(|&c| c == ch);
        let Some(digit) = digit else {
            continue;
        };
        let digit = digit as u64;
        acc |= (digit & 0x1F) << shift;
        if digit & 0x20 != 0 {
            shift += 5;
        } else {
            let value = if acc & 1 != 0 {
                -((acc >> 1) as i64)
            } else {
                (acc >> 1) as i64
            };
            values.push(value);
            shift = 0;
            acc = 0;
        }
    }
    values
}

#[cfg(test)]
#[path = "tests/source_map.rs"]
mod tests;
