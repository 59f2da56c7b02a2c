use super::*;

#[test]
fn test_name_raw_roundtrip() {
    let name = Name::from_raw(1000);
    assert_eq!(name.raw(), 1000);
    assert_eq!(name.index(), 1000);
}

#[test]
fn test_name_empty_is_default() {
    assert_eq!(Name::default(), Name::EMPTY);
    assert_eq!(Name::EMPTY.raw(), 0);
}

#[test]
fn test_name_hash() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(Name::from_raw(1));
    set.insert(Name::from_raw(1)); // duplicate
    set.insert(Name::from_raw(2));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_name_debug() {
    assert_eq!(format!("{:?}", Name::from_raw(7)), "Name(7)");
}
