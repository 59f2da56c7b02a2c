//! Error codes for all generator diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the phase. Used for `explain` lookups and documentation.

use std::fmt;

/// Error codes for all generator diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Model file loading errors
/// - E5xxx: Code generation / output errors
/// - E9xxx: Internal analysis errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Model Errors (E1xxx)
    /// Malformed model file
    E1001,
    /// Unresolved type or declaration name
    E1002,
    /// Model file could not be read
    E1003,
    /// Duplicate declaration name
    E1004,

    // Codegen Errors (E5xxx)
    /// Conflicting content registered for one output path
    E5001,
    /// Output file could not be written
    E5002,

    // Internal Errors (E9xxx)
    /// Analysis requested for a node already under construction
    E9001,
    /// Mangling called with no name segments
    E9002,
}

impl ErrorCode {
    /// All error code variants, used by `FromStr` to derive parsing from `as_str()`.
    pub const ALL: &'static [ErrorCode] = &[
        // Model
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        // Codegen
        ErrorCode::E5001,
        ErrorCode::E5002,
        // Internal
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a model loading error (E1xxx range).
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Check if this is a codegen error (E5xxx range).
    pub fn is_codegen_error(&self) -> bool {
        matches!(self, ErrorCode::E5001 | ErrorCode::E5002)
    }

    /// Check if this is an internal error (E9xxx range).
    ///
    /// Internal errors point at a bug in the generator, not in user input.
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E9001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
