use gqlpatch::{GqlPatchError, Intent, QueryDocument, Result};

#[test]
fn test_error_display() {
    let err = GqlPatchError::CacheMiss {
        field: "posts".to_string(),
    };
    assert!(err.to_string().contains("posts"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(GqlPatchError::Cache("unavailable".into()))
    }
    assert!(returns_error().is_err());
}

#[test]
fn cache_miss_classification() {
    assert!(GqlPatchError::CacheMiss { field: "posts".into() }.is_cache_miss());
    assert!(!GqlPatchError::Cache("timeout".into()).is_cache_miss());
    assert!(!GqlPatchError::InvalidPath("posts[3]".into()).is_cache_miss());
}

#[test]
fn json_errors_convert() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    assert!(matches!(parse(), Err(GqlPatchError::Json(_))));
}

#[test]
fn io_errors_convert() {
    fn read() -> Result<String> {
        Ok(std::fs::read_to_string("/nonexistent/gqlpatch/query.graphql")?)
    }
    assert!(matches!(read(), Err(GqlPatchError::Io(_))));
}

#[test]
fn invalid_document_errors() {
    let err = QueryDocument::parse("not a query").unwrap_err();
    assert!(matches!(err, GqlPatchError::InvalidDocument(_)));
}

#[test]
fn unknown_intent_is_configuration_error() {
    let err = "upsert".parse::<Intent>().unwrap_err();
    assert!(matches!(err, GqlPatchError::Configuration(_)));
}
