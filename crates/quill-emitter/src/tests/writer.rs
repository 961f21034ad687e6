use super::*;

#[test]
fn test_basic_write() {
    let mut writer = SourceWriter::new("\n");
    writer.write("hello");
    writer.write(" ");
    writer.write("world");
    assert_eq!(writer.get_output(), "hello world");
}

#[test]
fn test_newline_tracking() {
    let mut writer = SourceWriter::new("\n");
    writer.write("line 1");
    writer.write_line();
    writer.write("line 2");

    assert_eq!(writer.get_line(), 2);
    assert_eq!(writer.get_output(), "line 1\nline 2");
}

#[test]
fn test_indentation_is_lazy() {
    let mut writer = SourceWriter::new("\n");
    writer.write("start");
    writer.write_line();
    writer.increase_indent();
    writer.write("indented");
    writer.write_line();
    writer.decrease_indent();
    writer.write("back");

    assert_eq!(writer.get_output(), "start\n    indented\nback");
}

#[test]
fn test_write_line_idempotent_on_empty_line() {
    let mut writer = SourceWriter::new("\n");
    writer.write("a");
    writer.write_line();
    writer.write_line();
    writer.write_line();
    writer.write("b");
    assert_eq!(writer.get_output(), "a\nb");
}

#[test]
fn test_column_is_one_based() {
    let mut writer = SourceWriter::new("\n");
    assert_eq!(writer.get_line(), 1);
    assert_eq!(writer.get_column(), 1);
    writer.write("ab");
    assert_eq!(writer.get_column(), 3);
    writer.write_line();
    assert_eq!(writer.get_line(), 2);
    assert_eq!(writer.get_column(), 1);
}

#[test]
fn test_pending_indent_counts_toward_column() {
    let mut writer = SourceWriter::new("\n");
    writer.write("a");
    writer.write_line();
    writer.increase_indent();
    assert_eq!(writer.get_column(), 5);
    writer.write("x");
    assert_eq!(writer.get_output(), "a\n    x");
}

#[test]
fn test_write_literal_counts_embedded_newlines() {
    let mut writer = SourceWriter::new("\n");
    writer.write_literal("`a\nb`");
    assert_eq!(writer.get_line(), 2);
    assert_eq!(writer.get_column(), 3);
    writer.write(" + c");
    assert_eq!(writer.get_output(), "`a\nb` + c");
}
