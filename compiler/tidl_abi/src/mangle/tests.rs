use pretty_assertions::assert_eq;

use super::*;

fn m(segments: &[&str], kind: MangleKind) -> String {
    mangle(segments, kind).unwrap_or_default()
}

#[test]
fn test_mangle_function() {
    assert_eq!(
        m(&["ohos", "example", "add"], MangleKind::Func),
        "tidlF4_ohos7_example3_add"
    );
}

#[test]
fn test_mangle_static_cast_index_segment() {
    assert_eq!(m(&["demo", "D", "2"], MangleKind::StaticCast), "tidlS4_demo1_D1_2");
}

#[test]
fn test_kind_tag_distinguishes_symbols() {
    let segs = ["demo", "Shape"];
    let all: std::collections::HashSet<_> =
        MangleKind::ALL.iter().map(|&k| m(&segs, k)).collect();
    assert_eq!(all.len(), MangleKind::ALL.len());
}

#[test]
fn test_underscore_boundaries_do_not_collide() {
    let a = m(&["a_b", "c"], MangleKind::Func);
    let b = m(&["a", "b_c"], MangleKind::Func);
    let c = m(&["a_b_c"], MangleKind::Func);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
    assert_eq!(a, "tidlF4_a__b1_c");
}

#[test]
fn test_nesting_depth_does_not_collide() {
    // A child package named like a declaration must not alias it.
    let nested = m(&["p", "A", "B"], MangleKind::Type);
    let flat = m(&["p", "AB"], MangleKind::Type);
    assert_ne!(nested, flat);
}

#[test]
fn test_non_ascii_is_escaped() {
    let mangled = m(&["pkg", "caf\u{e9}"], MangleKind::Type);
    assert_eq!(mangled, "tidlT3_pkg11_caf_u0000e9");
    assert!(mangled
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_'));
}

#[test]
fn test_empty_segments_error() {
    let empty: [&str; 0] = [];
    assert_eq!(
        mangle(&empty, MangleKind::Vtable),
        Err(AbiError::EmptySegments {
            kind: MangleKind::Vtable
        })
    );
}

#[test]
fn test_empty_segment_is_still_encoded() {
    assert_eq!(m(&["p", ""], MangleKind::Func), "tidlF1_p0_");
}

#[test]
fn test_demangle_roundtrip() {
    let demangled = demangle("tidlB4_demo5_Shape");
    assert_eq!(
        demangled,
        Some(Demangled {
            kind: MangleKind::Ftable,
            segments: vec!["demo".to_string(), "Shape".to_string()],
        })
    );
    assert_eq!(
        demangled.map(|d| d.to_string()).as_deref(),
        Some("ftable demo.Shape")
    );
}

#[test]
fn test_demangle_unescapes() {
    let d = demangle("tidlT3_pkg11_caf_u0000e9");
    assert_eq!(
        d.map(|d| d.segments),
        Some(vec!["pkg".to_string(), "caf\u{e9}".to_string()])
    );
}

#[test]
fn test_demangle_rejects_foreign_symbols() {
    assert_eq!(demangle("_Z4mainv"), None);
    assert_eq!(demangle("tidlX1_a"), None);
    assert_eq!(demangle("tidlF"), None);
    assert_eq!(demangle("tidlF5_abc"), None);
    assert_eq!(demangle("tidlF1_a_"), None);
}

#[test]
fn test_demangle_rejects_non_canonical() {
    assert_eq!(demangle("tidlF01_a"), None);
    assert_eq!(demangle("tidlT11_caf_u0000E9"), None);
}

#[test]
fn test_is_tidl_symbol() {
    assert!(is_tidl_symbol("tidlV4_demo1_D"));
    assert!(!is_tidl_symbol("main"));
}
