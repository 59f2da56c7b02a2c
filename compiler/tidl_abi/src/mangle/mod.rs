//! Symbol Mangling
//!
//! Encodes a qualified name plus a declaration kind into a single C
//! identifier that is unique across packages, nesting depths and kinds.
//!
//! # Mangling Scheme
//!
//! ```text
//! tidl <kind> (<len> _ <segment>)+
//! ```
//!
//! Where:
//! - `tidl` is the prefix identifying generated symbols
//! - `<kind>` is a one-letter tag (see [`MangleKind::tag`])
//! - `<segment>` is one escaped name segment and `<len>` its escaped length
//!
//! Inside a segment ASCII alphanumerics pass through, `_` becomes `__` and
//! any other character becomes `_u` followed by six lowercase hex digits.
//! The length prefix makes segment boundaries explicit, so `[a_b, c]` and
//! `[a, b_c]` can never collide.
//!
//! # Examples
//!
//! | Segments | Kind | Mangled |
//! |----------|------|---------|
//! | `ohos.example.add` | function | `tidlF4_ohos7_example3_add` |
//! | `demo.Shape` | vtable | `tidlV4_demo5_Shape` |
//! | `demo.D`, `2` | static cast | `tidlS4_demo1_D1_2` |

use std::fmt::{self, Write};

use crate::AbiError;

/// The prefix for all mangled symbols.
pub const MANGLE_PREFIX: &str = "tidl";

/// What a mangled symbol names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MangleKind {
    /// Package-level function.
    Func,
    /// Interface method implementation.
    Method,
    /// Struct, union, enum or interface type.
    Type,
    /// Interface function table.
    Ftable,
    /// Interface vtable.
    Vtable,
    /// Interface identity object.
    Iid,
    /// Upcast to an ancestor at a fixed offset.
    StaticCast,
    /// Checked downcast.
    DynamicCast,
}

impl MangleKind {
    pub const ALL: [MangleKind; 8] = [
        MangleKind::Func,
        MangleKind::Method,
        MangleKind::Type,
        MangleKind::Ftable,
        MangleKind::Vtable,
        MangleKind::Iid,
        MangleKind::StaticCast,
        MangleKind::DynamicCast,
    ];

    /// One-letter tag written after the prefix.
    pub fn tag(self) -> char {
        match self {
            MangleKind::Func => 'F',
            MangleKind::Method => 'M',
            MangleKind::Type => 'T',
            MangleKind::Ftable => 'B',
            MangleKind::Vtable => 'V',
            MangleKind::Iid => 'I',
            MangleKind::StaticCast => 'S',
            MangleKind::DynamicCast => 'D',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.tag() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MangleKind::Func => "function",
            MangleKind::Method => "method",
            MangleKind::Type => "type",
            MangleKind::Ftable => "ftable",
            MangleKind::Vtable => "vtable",
            MangleKind::Iid => "interface id",
            MangleKind::StaticCast => "static cast",
            MangleKind::DynamicCast => "dynamic cast",
        }
    }
}

impl fmt::Display for MangleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mangle a qualified name.
///
/// Deterministic, and injective over `(segments, kind)`. The result is a
/// valid C identifier.
///
/// # Errors
///
/// Returns [`AbiError::EmptySegments`] if `segments` is empty.
pub fn mangle<S: AsRef<str>>(segments: &[S], kind: MangleKind) -> Result<String, AbiError> {
    if segments.is_empty() {
        return Err(AbiError::EmptySegments { kind });
    }

    let mut result = String::with_capacity(64);
    result.push_str(MANGLE_PREFIX);
    result.push(kind.tag());

    let mut escaped = String::new();
    for segment in segments {
        escaped.clear();
        escape_segment(&mut escaped, segment.as_ref());
        let _ = write!(result, "{}_", escaped.len());
        result.push_str(&escaped);
    }
    Ok(result)
}

fn escape_segment(out: &mut String, segment: &str) {
    for c in segment.chars() {
        match c {
            c if c.is_ascii_alphanumeric() => out.push(c),
            '_' => out.push_str("__"),
            c => {
                let _ = write!(out, "_u{:06x}", u32::from(c));
            }
        }
    }
}

fn unescape_segment(escaped: &str) -> Option<String> {
    let mut result = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }
        match chars.next()? {
            '_' => result.push('_'),
            'u' => {
                let hex: String = chars.by_ref().take(6).collect();
                if hex.len() != 6 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                result.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(result)
}

/// A decoded symbol.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Demangled {
    pub kind: MangleKind,
    pub segments: Vec<String>,
}

impl fmt::Display for Demangled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.segments.join("."))
    }
}

/// Demangle a symbol back to its kind and segments.
///
/// Returns `None` for anything [`mangle`] could not have produced,
/// including non-canonical spellings such as zero-padded lengths.
pub fn demangle(symbol: &str) -> Option<Demangled> {
    let rest = symbol.strip_prefix(MANGLE_PREFIX)?;
    let mut chars = rest.chars();
    let kind = MangleKind::from_tag(chars.next()?)?;
    let mut rest = chars.as_str();

    let mut segments = Vec::new();
    while !rest.is_empty() {
        let (len, tail) = rest.split_once('_')?;
        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let len: usize = len.parse().ok()?;
        if tail.len() < len || !tail.is_char_boundary(len) {
            return None;
        }
        let (escaped, tail) = tail.split_at(len);
        segments.push(unescape_segment(escaped)?);
        rest = tail;
    }

    let demangled = Demangled { kind, segments };
    // Reject anything that does not round-trip byte for byte.
    match mangle(&demangled.segments, kind) {
        Ok(canonical) if canonical == symbol => Some(demangled),
        _ => None,
    }
}

/// Check if a symbol looks like a generated one.
pub fn is_tidl_symbol(name: &str) -> bool {
    demangle(name).is_some()
}

#[cfg(test)]
mod tests;
