use rureq::compose::RequestDraft;
use rureq::collection::CollectionStore;
use rureq::http::Method;
use rureq::variable::EnvironmentSet;
use rureq::{Result, RureqError};

#[test]
fn test_parse_error() {
    let err = RureqError::ParseError("test error".to_string());
    assert_eq!(err.to_string(), "解析错误: test error");
}

#[test]
fn test_collection_not_found() {
    let mut store = CollectionStore::new();
    let err = store
        .save("missing-id", &RequestDraft::default(), None)
        .unwrap_err();
    assert_eq!(err.to_string(), "未找到集合: missing-id");
}

#[test]
fn test_unknown_environment() {
    let mut set = EnvironmentSet::new();
    let err = set.activate("staging").unwrap_err();
    assert_eq!(err.to_string(), "未知的环境: staging");
}

#[test]
fn test_unknown_method() {
    let err = Method::parse("FETCH").unwrap_err();
    assert!(matches!(err, RureqError::ParseError(_)));
    assert_eq!(err.to_string(), "解析错误: Invalid HTTP method: FETCH");
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let rureq_err: RureqError = anyhow_err.into();
    assert!(rureq_err.to_string().contains("test anyhow error"));
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(RureqError::ParseError("test".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
    match result {
        Err(RureqError::ParseError(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected ParseError"),
    }
}
