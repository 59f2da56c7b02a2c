//! The `generate` command: model file in, binding files out.

use std::path::{Path, PathBuf};

use tidl_abi::AnalysisManager;
use tidl_codegen::{generate_with, CodegenConfig};
use tidl_diagnostic::emitter::ColorMode;
use tidl_diagnostic::Diagnostic;
use tracing::debug;

use super::report_and_exit;
use crate::load_model;

/// Output directory when `--out-dir` is not given.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Options for `tidl generate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub out_dir: PathBuf,
    pub emit_abi: bool,
    pub emit_cpp_impl: bool,
    pub emit_stubs: bool,
    /// List the files instead of writing them.
    pub dry_run: bool,
    pub color: ColorMode,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            emit_abi: true,
            emit_cpp_impl: true,
            emit_stubs: true,
            dry_run: false,
            color: ColorMode::Auto,
        }
    }
}

impl GenerateOptions {
    pub fn codegen_config(&self) -> CodegenConfig {
        CodegenConfig {
            emit_abi: self.emit_abi,
            emit_cpp_impl: self.emit_cpp_impl,
            emit_stubs: self.emit_stubs,
        }
    }
}

/// Parse `generate` options. Unknown options warn and are ignored.
pub fn parse_generate_options(args: &[String]) -> GenerateOptions {
    let mut options = GenerateOptions::default();
    for arg in args {
        if let Some(dir) = arg.strip_prefix("--out-dir=") {
            options.out_dir = PathBuf::from(dir);
        } else if let Some(value) = arg.strip_prefix("--color=") {
            if let Some(mode) = ColorMode::from_flag(value) {
                options.color = mode;
            } else {
                eprintln!("warning: unknown color mode '{value}', using 'auto'");
            }
        } else {
            match arg.as_str() {
                "--no-abi" => options.emit_abi = false,
                "--no-cpp-impl" => options.emit_cpp_impl = false,
                "--no-stubs" => options.emit_stubs = false,
                "--dry-run" => options.dry_run = true,
                _ if arg.starts_with('-') => eprintln!("warning: unknown option '{arg}'"),
                _ => {}
            }
        }
    }
    options
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateReport {
    /// Relative output paths, sorted.
    pub paths: Vec<String>,
    /// Whether the files were written to disk.
    pub written: bool,
}

/// Load `model_path`, generate, and write unless this is a dry run.
pub fn run_generate(
    model_path: &Path,
    options: &GenerateOptions,
) -> Result<GenerateReport, Diagnostic> {
    let model = load_model(model_path).map_err(|err| err.to_diagnostic())?;
    let am = AnalysisManager::new(&model);
    let om = generate_with(&am, &options.codegen_config()).map_err(|err| err.to_diagnostic())?;

    let written = !options.dry_run;
    if written {
        om.write_all(&options.out_dir)
            .map_err(|err| err.to_diagnostic())?;
    }
    debug!(
        model = %model_path.display(),
        files = om.len(),
        written,
        "generate finished"
    );
    Ok(GenerateReport {
        paths: om.paths().map(str::to_string).collect(),
        written,
    })
}

/// CLI entry: run, print the outcome, exit non-zero on failure.
pub fn generate_file(model_path: &str, options: &GenerateOptions) {
    match run_generate(Path::new(model_path), options) {
        Ok(report) if report.written => {
            println!(
                "wrote {} files to {}",
                report.paths.len(),
                options.out_dir.display()
            );
        }
        Ok(report) => {
            for path in &report.paths {
                println!("{path}");
            }
        }
        Err(diagnostic) => report_and_exit(&diagnostic, options.color),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
