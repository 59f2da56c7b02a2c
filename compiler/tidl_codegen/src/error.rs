use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tidl_abi::AbiError;
use tidl_diagnostic::{Diagnostic, ErrorCode};

/// Errors raised while generating or writing output files.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Two producers registered different text for one path.
    #[error("conflicting content registered for `{path}` by {first} and {second}")]
    RegistrationConflict {
        path: String,
        first: String,
        second: String,
    },

    #[error("failed to write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodegenError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CodegenError::Abi(err) => err.error_code(),
            CodegenError::RegistrationConflict { .. } => ErrorCode::E5001,
            CodegenError::Io { .. } => ErrorCode::E5002,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CodegenError::Abi(err) => err.to_diagnostic(),
            CodegenError::RegistrationConflict {
                path,
                first,
                second,
            } => Diagnostic::error(ErrorCode::E5001)
                .with_message(self.to_string())
                .with_location(path.clone())
                .with_note(format!("first registered by {first}"))
                .with_note(format!("then registered by {second} with different content"))
                .with_suggestion("rename one of the colliding declarations"),
            CodegenError::Io { path, .. } => Diagnostic::error(ErrorCode::E5002)
                .with_message(self.to_string())
                .with_location(path.display().to_string()),
        }
    }
}
