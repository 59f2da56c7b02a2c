use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("IColor");
    let b = interner.intern("IColor");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "IColor");
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    let a = interner.intern("ohos");
    let b = interner.intern("example");
    assert_ne!(a, b);
    assert_eq!(interner.lookup(b), "example");
}

#[test]
fn test_empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert_eq!(interner.len(), 1);
    assert!(!interner.is_empty());
}

#[test]
fn test_len_counts_unique_strings() {
    let interner = StringInterner::new();
    interner.intern("a");
    interner.intern("b");
    interner.intern("a");
    assert_eq!(interner.len(), 3);
}
