use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builder_collects_context() {
    let diag = Diagnostic::error(ErrorCode::E1002)
        .with_message("unresolved type `demo.Pont`")
        .with_location("model.json")
        .with_note("referenced from demo.Shape.move")
        .with_suggestion("did you mean `demo.Point`?");

    assert!(diag.is_error());
    assert_eq!(diag.location.as_deref(), Some("model.json"));
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E1004).with_message("shadowed");
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_display_format() {
    let diag = Diagnostic::error(ErrorCode::E9001)
        .with_message("cyclic analysis of IfaceAbiInfo")
        .with_location("demo.A")
        .with_note("demo.A is still being analyzed");

    assert_eq!(
        diag.to_string(),
        "error [E9001]: cyclic analysis of IfaceAbiInfo\n  --> demo.A\n  = note: demo.A is still being analyzed"
    );
}

#[test]
fn test_severity_display() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Help.to_string(), "help");
}
