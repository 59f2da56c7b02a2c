//! Command handlers for the tidl CLI.
//!
//! Each submodule implements one command. Handlers that can fail return a
//! [`Diagnostic`]; [`report_and_exit`] renders it for the terminal.

use std::io::IsTerminal;

use tidl_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use tidl_diagnostic::Diagnostic;

mod demangle;
mod explain;
mod generate;

pub use demangle::{demangle_symbol, describe_symbol};
pub use explain::explain_error;
pub use generate::{
    generate_file, parse_generate_options, run_generate, GenerateOptions, GenerateReport,
};

/// Print `diagnostic` to stderr and exit with status 1.
pub(crate) fn report_and_exit(diagnostic: &Diagnostic, color: ColorMode) -> ! {
    let mut emitter = TerminalEmitter::stderr(color, std::io::stderr().is_terminal());
    emitter.emit(diagnostic);
    emitter.emit_summary(1, 0);
    emitter.flush();
    std::process::exit(1);
}
