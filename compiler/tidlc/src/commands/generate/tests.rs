use pretty_assertions::assert_eq;

use tidl_diagnostic::ErrorCode;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn defaults_enable_every_backend() {
    let options = parse_generate_options(&[]);
    assert_eq!(options, GenerateOptions::default());
    assert_eq!(options.codegen_config(), CodegenConfig::default());
    assert_eq!(options.out_dir, PathBuf::from("generated"));
}

#[test]
fn flags_and_values() {
    let options = parse_generate_options(&args(&[
        "--out-dir=build/gen",
        "--no-abi",
        "--no-stubs",
        "--dry-run",
        "--color=never",
    ]));
    assert_eq!(
        options,
        GenerateOptions {
            out_dir: PathBuf::from("build/gen"),
            emit_abi: false,
            emit_cpp_impl: true,
            emit_stubs: false,
            dry_run: true,
            color: ColorMode::Never,
        }
    );
}

#[test]
fn unknown_values_keep_defaults() {
    let options = parse_generate_options(&args(&["--color=rainbow", "--frobnicate", "extra"]));
    assert_eq!(options, GenerateOptions::default());
}

#[test]
fn dry_run_lists_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    std::fs::write(
        &model,
        r#"{ "packages": [{ "name": "calc", "functions": [{ "name": "reset" }] }] }"#,
    )
    .unwrap();
    let out = dir.path().join("out");
    let options = GenerateOptions {
        out_dir: out.clone(),
        dry_run: true,
        ..GenerateOptions::default()
    };

    let report = run_generate(&model, &options).unwrap();
    assert!(!report.written);
    assert_eq!(
        report.paths,
        vec![
            "author/calc.impl.cpp",
            "include/calc.abi.h",
            "include/calc.impl.hpp",
            "src/calc.abi.c",
        ]
    );
    assert!(!out.exists());
}

#[test]
fn load_failures_become_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let diag = run_generate(&missing, &GenerateOptions::default()).unwrap_err();
    assert_eq!(diag.code, ErrorCode::E1003);
}
