//! Diagnostic system for the binding generator.
//!
//! Every failure surfaced to a user carries:
//! - an error code for searchability (`tidl explain E9001`)
//! - a message saying what went wrong
//! - an optional location (model file path or qualified declaration)
//! - notes and suggestions

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
