//! The `explain` command: display documentation for error codes.

use tidl_diagnostic::{ErrorCode, ErrorDocs};

/// Display detailed documentation for a given error code string.
pub fn explain_error(code_str: &str) {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!(
            "Known codes: {}",
            ErrorCode::ALL
                .iter()
                .map(ErrorCode::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(1);
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
    } else {
        eprintln!("No documentation available for {code_str}");
        std::process::exit(1);
    }
}
