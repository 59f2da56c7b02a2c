use super::*;

#[test]
fn test_get_existing_doc() {
    let doc = ErrorDocs::get(ErrorCode::E5001);
    assert!(doc.is_some_and(|d| d.contains("Output Registration Conflict")));
}

#[test]
fn test_cyclic_analysis_doc_mentions_inheritance() {
    let doc = ErrorDocs::get(ErrorCode::E9001);
    assert!(doc.is_some_and(|d| d.contains("inherits from itself")));
}

#[test]
fn test_every_code_is_documented() {
    for code in ErrorCode::ALL {
        assert!(ErrorDocs::has_docs(*code), "{code} has no docs");
    }
    assert_eq!(ErrorDocs::all_codes().count(), ErrorCode::ALL.len());
}

#[test]
fn test_docs_start_with_their_code() {
    for code in ErrorDocs::all_codes() {
        let doc = ErrorDocs::get(code).unwrap_or_default();
        assert!(doc.starts_with(&format!("# {code}:")), "{code}");
    }
}
