//! The tidl driver.
//!
//! ```text
//! model.json ──► load_model ──► Model
//!                                 │
//!                                 ▼
//!                  tidl_codegen::generate ──► OutputManager ──► out dir
//! ```
//!
//! Every failure is converted to a [`Diagnostic`](tidl_diagnostic::Diagnostic)
//! at this boundary and rendered by the terminal emitter.

use std::sync::Once;

pub mod commands;
pub mod model_file;

pub use model_file::{load_model, parse_model, ModelFileError};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `TIDL_LOG` (or `RUST_LOG`) is set, e.g.
/// `TIDL_LOG=tidl_abi=trace`. With `TIDL_LOG_TREE` set, spans render as an
/// indented tree. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("TIDL_LOG").or_else(|_| std::env::var("RUST_LOG"));
        let Ok(directives) = directives else {
            return;
        };
        let filter = EnvFilter::new(directives);

        if std::env::var_os("TIDL_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
