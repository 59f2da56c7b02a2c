//! The `demangle` command: decode tidl symbol names.

use tidl_abi::demangle;

/// Readable form of `symbol`, such as `ftable demo.Shape`.
///
/// Anything that is not a canonical tidl symbol comes back unchanged.
pub fn describe_symbol(symbol: &str) -> String {
    match demangle(symbol) {
        Some(demangled) => demangled.to_string(),
        None => symbol.to_string(),
    }
}

/// Print the demangled form of a symbol.
pub fn demangle_symbol(symbol: &str) {
    println!("{}", describe_symbol(symbol));
}
