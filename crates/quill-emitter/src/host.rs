//! The I/O capability the emitter consumes.

use quill_common::CompilerOptions;

/// Everything the orchestrator needs from the surrounding program: options,
/// path canonicalization, and the file sink. The emitter never touches the
/// filesystem directly.
pub trait EmitHost {
    fn options(&self) -> &CompilerOptions;

    fn new_line(&self) -> &str {
        self.options().new_line.as_str()
    }

    fn current_directory(&self) -> String {
        String::new()
    }

    fn common_source_directory(&self) -> String {
        String::new()
    }

    fn canonical_file_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Write one output artifact. Failures are reported back as diagnostics;
    /// the emitter does not retry, and partial output is the host's to clean
    /// up.
    fn write_file(&self, path: &str, data: &str, write_bom: bool) -> anyhow::Result<()>;
}

/// An in-memory host that collects written files. Used by tests and by
/// drivers that post-process output before persisting it.
pub struct MemoryHost {
    options: CompilerOptions,
    pub written: std::cell::RefCell<Vec<(String, String)>>,
}

impl MemoryHost {
    #[must_use]
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            written: std::cell::RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn file(&self, path: &str) -> Option<String> {
        self.written
            .borrow()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, text)| text.clone())
    }
}

impl EmitHost for MemoryHost {
    fn options(&self) -> &CompilerOptions {
        &self.options
    }

    fn write_file(&self, path: &str, data: &str, write_bom: bool) -> anyhow::Result<()> {
        let mut text = String::new();
        if write_bom {
            text.push('\u{FEFF}');
        }
        text.push_str(data);
        self.written.borrow_mut().push((path.to_string(), text));
        Ok(())
    }
}
