//! End-to-end: model file on disk to generated files on disk.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tidl_diagnostic::ErrorCode;
use tidlc::commands::{run_generate, GenerateOptions};

const SHAPES: &str = r#"{
  "packages": [
    {
      "name": "shapes",
      "structs": [{ "name": "Size", "fields": [{ "name": "w", "type": "f64" }, { "name": "h", "type": "f64" }] }],
      "interfaces": [
        { "name": "Named", "methods": [{ "name": "name", "returns": "string" }] },
        { "name": "Sized", "parents": ["Named"], "methods": [{ "name": "size", "returns": "Size" }] },
        { "name": "Drawn", "parents": ["Named"], "methods": [{ "name": "draw", "params": [{ "name": "layer", "type": "i32" }] }] },
        { "name": "Widget", "parents": ["Sized", "Drawn"] }
      ],
      "functions": [{ "name": "make_widget", "params": [{ "name": "id", "type": "u64" }], "returns": "Widget" }]
    }
  ]
}"#;

fn write_model(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("model.json");
    fs::write(&path, text).unwrap();
    path
}

fn options(out: &Path) -> GenerateOptions {
    GenerateOptions {
        out_dir: out.to_path_buf(),
        ..GenerateOptions::default()
    }
}

#[test]
fn writes_every_registered_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model(dir.path(), SHAPES);
    let out = dir.path().join("out");

    let report = run_generate(&model, &options(&out)).unwrap();
    assert!(report.written);
    for path in &report.paths {
        assert!(out.join(path).is_file(), "{path}");
    }
    assert!(report.paths.contains(&"include/shapes.Widget.abi.2.h".to_string()));
    assert!(report.paths.contains(&"author/shapes.impl.cpp".to_string()));
}

#[test]
fn diamond_widget_layout_and_stubs() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model(dir.path(), SHAPES);
    let out = dir.path().join("out");
    run_generate(&model, &options(&out)).unwrap();

    // [Widget, Sized, Named, Drawn, Named]
    let layout = fs::read_to_string(out.join("include/shapes.Widget.abi.1.h")).unwrap();
    assert_eq!(layout.matches(" const* ftbl_ptr_").count(), 5);

    let stubs = fs::read_to_string(out.join("author/shapes.impl.cpp")).unwrap();
    let widget = stubs
        .split("class WidgetImpl {\n")
        .nth(1)
        .and_then(|rest| rest.split("\n};").next())
        .unwrap();
    assert_eq!(widget.matches("not implemented").count(), 3);
    assert_eq!(widget.matches("::taihe::string name()").count(), 1);
    assert!(stubs.contains("TH_EXPORT_CPP_API_make_widget(make_widget);\n"));
}

#[test]
fn regeneration_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model(dir.path(), SHAPES);
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    let a = run_generate(&model, &options(&first)).unwrap();
    let b = run_generate(&model, &options(&second)).unwrap();
    assert_eq!(a.paths, b.paths);
    for path in &a.paths {
        assert_eq!(
            fs::read(first.join(path)).unwrap(),
            fs::read(second.join(path)).unwrap(),
            "{path}"
        );
    }
}

#[test]
fn cyclic_inheritance_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model(
        dir.path(),
        r#"{ "packages": [{ "name": "p", "interfaces": [
            { "name": "A", "parents": ["B"] },
            { "name": "B", "parents": ["A"] }
        ] }] }"#,
    );
    let diag = run_generate(&model, &options(&dir.path().join("out"))).unwrap_err();
    assert_eq!(diag.code, ErrorCode::E9001);
    assert!(diag.message.contains("interface p.A"), "{}", diag.message);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unresolved_names_stop_before_generation() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model(
        dir.path(),
        r#"{ "packages": [{ "name": "p", "functions": [{ "name": "f", "returns": "Nope" }] }] }"#,
    );
    let diag = run_generate(&model, &options(&dir.path().join("out"))).unwrap_err();
    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.message, "unresolved type `Nope` in return type of function p.f");
}
