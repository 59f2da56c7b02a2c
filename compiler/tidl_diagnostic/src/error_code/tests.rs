use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E9002.as_str(), "E9002");
}

#[test]
fn test_phase_ranges() {
    assert!(ErrorCode::E1002.is_model_error());
    assert!(!ErrorCode::E1002.is_codegen_error());

    assert!(ErrorCode::E5001.is_codegen_error());
    assert!(!ErrorCode::E5001.is_internal_error());

    assert!(ErrorCode::E9001.is_internal_error());
    assert!(!ErrorCode::E9001.is_model_error());
}

#[test]
fn test_every_code_is_in_exactly_one_phase() {
    for code in ErrorCode::ALL {
        let phases = [
            code.is_model_error(),
            code.is_codegen_error(),
            code.is_internal_error(),
        ];
        assert_eq!(phases.iter().filter(|p| **p).count(), 1, "{code}");
    }
}

#[test]
fn test_from_str_roundtrip() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
}

#[test]
fn test_from_str_is_case_insensitive() {
    assert_eq!("e5002".parse::<ErrorCode>(), Ok(ErrorCode::E5002));
}

#[test]
fn test_from_str_rejects_unknown() {
    assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
    assert_eq!("nonsense".parse::<ErrorCode>(), Err(()));
}
