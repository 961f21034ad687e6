//! The top-level orchestrator: per-file output paths, source-map plumbing,
//! artifact writes, and the emit result.

use quill_ast::{NodeArena, NodeIndex};
use quill_common::diagnostics::{codes, sort_and_deduplicate, Diagnostic};
use quill_common::CompilerOptions;

use crate::host::EmitHost;
use crate::printer::{PrintedOutput, Printer};
use crate::resolver::EmitResolver;
use crate::source_map::{SourceMapData, SourceMapWriter};

/// What the emitter hands back to the driver.
pub struct EmitResult {
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub source_maps: Vec<SourceMapData>,
}

/// Print one source file to a string. The building block under `emit_files`,
/// and the convenient entry for tests and in-memory drivers.
pub fn print_source_file(
    arena: &NodeArena,
    file: NodeIndex,
    resolver: &dyn EmitResolver,
    options: &CompilerOptions,
) -> PrintedOutput {
    let mut printer = Printer::new(arena, resolver, options);
    if options.source_map {
        let js_file = output_path_for(arena, file).unwrap_or_else(|| "out.js".to_string());
        let source_root = options.source_root.clone().unwrap_or_default();
        printer.set_source_map(SourceMapWriter::new(js_file, source_root));
    }
    printer.emit(file);
    printer.finish()
}

/// Emit every input file through the host: one `.js` per input, or a single
/// concatenated output when `out` is set. Declaration inputs (`.d.ts`) never
/// produce output. I/O failures become diagnostics; partial output is the
/// host's to clean up.
pub fn emit_files(
    arena: &NodeArena,
    files: &[NodeIndex],
    host: &dyn EmitHost,
    resolver: &dyn EmitResolver,
) -> EmitResult {
    let options = host.options();
    let mut diagnostics = Vec::new();
    let mut source_maps = Vec::new();
    let mut emit_skipped = false;

    if let Some(out) = options.out.clone() {
        tracing::debug!(out = %out, files = files.len(), "emitting concatenated output");
        let mut printer = Printer::new(arena, resolver, options);
        if options.source_map {
            let source_root = options.source_root.clone().unwrap_or_default();
            printer.set_source_map(SourceMapWriter::new(out.clone(), source_root));
        }
        for &file in files {
            if is_declaration_input(arena, file) {
                continue;
            }
            printer.emit(file);
        }
        let output = printer.finish();
        diagnostics.extend(output.diagnostics.iter().cloned());
        write_output(
            host,
            options,
            &out,
            output,
            &mut diagnostics,
            &mut source_maps,
            &mut emit_skipped,
        );
    } else {
        for &file in files {
            if is_declaration_input(arena, file) {
                continue;
            }
            let Some(js_path) = output_path_for(arena, file) else {
                continue;
            };
            let js_path = host.canonical_file_name(&js_path);
            tracing::debug!(js = %js_path, "emitting file");
            let output = print_source_file(arena, file, resolver, options);
            diagnostics.extend(output.diagnostics.iter().cloned());
            write_output(
                host,
                options,
                &js_path,
                output,
                &mut diagnostics,
                &mut source_maps,
                &mut emit_skipped,
            );
        }
    }

    EmitResult {
        emit_skipped,
        diagnostics: sort_and_deduplicate(diagnostics),
        source_maps,
    }
}

fn write_output(
    host: &dyn EmitHost,
    options: &CompilerOptions,
    js_path: &str,
    output: PrintedOutput,
    diagnostics: &mut Vec<Diagnostic>,
    source_maps: &mut Vec<SourceMapData>,
    emit_skipped: &mut bool,
) {
    let mut code = output.code;

    let map_data = output.source_map.map(|map| {
        let base = file_name_of(js_path);
        let mapping_url = match &options.map_root {
            Some(root) => format!("{}/{}.map", root.trim_end_matches('/'), base),
            None => format!("{base}.map"),
        };
        let map_file = format!("{js_path}.map");
        map.finish(map_file, mapping_url)
    });

    if let Some(data) = &map_data {
        if !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str("//# sourceMappingURL=");
        code.push_str(&data.mapping_url);
        code.push('\n');
    }

    if let Err(error) = host.write_file(js_path, &code, options.emit_bom) {
        diagnostics.push(Diagnostic::error(
            js_path,
            0,
            0,
            format!("Could not write file '{js_path}': {error}."),
            codes::COULD_NOT_WRITE_FILE,
        ));
        *emit_skipped = true;
    }

    if let Some(data) = map_data {
        match serde_json::to_string(&data.map) {
            Ok(json) => {
                if let Err(error) = host.write_file(&data.map_file, &json, false) {
                    diagnostics.push(Diagnostic::error(
                        data.map_file.clone(),
                        0,
                        0,
                        format!("Could not write file '{}': {error}.", data.map_file),
                        codes::COULD_NOT_WRITE_FILE,
                    ));
                    *emit_skipped = true;
                }
            }
            Err(error) => {
                diagnostics.push(Diagnostic::error(
                    data.map_file.clone(),
                    0,
                    0,
                    format!("Could not serialize source map: {error}."),
                    codes::COULD_NOT_WRITE_FILE,
                ));
            }
        }
        source_maps.push(data);
    }
}

fn is_declaration_input(arena: &NodeArena, file: NodeIndex) -> bool {
    source_file_name(arena, file).is_some_and(|name| name.ends_with(".d.ts"))
}

fn source_file_name(arena: &NodeArena, file: NodeIndex) -> Option<String> {
    arena
        .get(file)
        .and_then(|n| arena.get_source_file(n))
        .map(|f| f.file_name.clone())
}

/// The own-output path of a source file: its name with a `.js` extension.
fn output_path_for(arena: &NodeArena, file: NodeIndex) -> Option<String> {
    let name = source_file_name(arena, file)?;
    if name.ends_with(".d.ts") {
        return None;
    }
    for suffix in [".tsx", ".ts"] {
        if let Some(stem) = name.strip_suffix(suffix) {
            return Some(format!("{stem}.js"));
        }
    }
    Some(format!("{name}.js"))
}

fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
