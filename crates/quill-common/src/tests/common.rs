use super::*;
use crate::diagnostics::sort_and_deduplicate;

#[test]
fn test_script_target_ordering() {
    assert!(!ScriptTarget::ES3.supports_es2015());
    assert!(!ScriptTarget::ES5.supports_es2015());
    assert!(ScriptTarget::ES2015.supports_es2015());
    assert!(ScriptTarget::ES5.is_es5());
    assert!(!ScriptTarget::ES2015.is_es5());
}

#[test]
fn test_module_kind_predicates() {
    assert!(ModuleKind::CommonJS.is_commonjs());
    assert!(ModuleKind::UMD.is_commonjs());
    assert!(!ModuleKind::AMD.is_commonjs());
    assert!(ModuleKind::ES2015.is_es_module());
    assert!(!ModuleKind::System.is_es_module());
}

#[test]
fn test_options_constructors() {
    let opts = CompilerOptions::es5();
    assert_eq!(opts.target, ScriptTarget::ES5);
    assert_eq!(opts.module, ModuleKind::None);

    let opts = CompilerOptions::es5_commonjs();
    assert_eq!(opts.target, ScriptTarget::ES5);
    assert_eq!(opts.module, ModuleKind::CommonJS);
}

#[test]
fn test_diagnostic_sort_and_dedup() {
    let d1 = Diagnostic::error("b.ts", 10, 1, "later", 100);
    let d2 = Diagnostic::error("a.ts", 5, 1, "earlier", 100);
    let d3 = Diagnostic::error("a.ts", 5, 1, "duplicate", 100);
    let d4 = Diagnostic::error("a.ts", 5, 1, "different code", 101);

    let sorted = sort_and_deduplicate(vec![d1.clone(), d2.clone(), d3, d4.clone()]);
    assert_eq!(sorted.len(), 3);
    assert_eq!(sorted[0].file, "a.ts");
    assert_eq!(sorted[0].code, 100);
    assert_eq!(sorted[1].code, 101);
    assert_eq!(sorted[2].file, "b.ts");
}

#[test]
fn test_newline_kind() {
    assert_eq!(NewLineKind::LineFeed.as_str(), "\n");
    assert_eq!(NewLineKind::CarriageReturnLineFeed.as_str(), "\r\n");
}
