//! Errors raised by ABI analysis.
//!
//! Both variants are internal invariant violations: a well-formed model
//! never triggers them, so they map to the E9xxx range.

use thiserror::Error;
use tidl_diagnostic::{Diagnostic, ErrorCode};

use crate::MangleKind;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A record was requested for a node while the same record was still
    /// being computed for it.
    #[error("cyclic analysis: {record} requested for {node} while it is still being computed")]
    CyclicAnalysis { record: &'static str, node: String },

    /// Mangling was asked to encode an empty name.
    #[error("cannot mangle an empty name ({kind})")]
    EmptySegments { kind: MangleKind },
}

impl AbiError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AbiError::CyclicAnalysis { .. } => ErrorCode::E9001,
            AbiError::EmptySegments { .. } => ErrorCode::E9002,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.error_code()).with_message(self.to_string());
        match self {
            AbiError::CyclicAnalysis { node, .. } => diag
                .with_location(node.clone())
                .with_note("interface inheritance must be acyclic")
                .with_suggestion(format!("remove the inheritance path that leads back to {node}")),
            AbiError::EmptySegments { .. } => {
                diag.with_note("this is a bug in the generator, not in the model")
            }
        }
    }
}
