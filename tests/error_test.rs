use sentiment_service::{Result, SentimentError};

#[test]
fn test_error_display() {
    let err = SentimentError::ModelLoad("tokenizer.json missing".to_string());
    assert!(err.to_string().contains("tokenizer.json missing"));
}

#[test]
fn test_empty_result_display() {
    assert_eq!(
        SentimentError::EmptyResult.to_string(),
        "model returned no labels"
    );
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SentimentError::EmptyResult)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    assert!(matches!(parse(), Err(SentimentError::Json(_))));
}

#[test]
fn test_variants_carry_their_message() {
    let cases = [
        SentimentError::Configuration("bad device".into()),
        SentimentError::Tokenization("bad device".into()),
        SentimentError::Inference("bad device".into()),
        SentimentError::DataError("bad device".into()),
    ];
    for err in cases {
        assert!(err.to_string().contains("bad device"), "{err}");
    }
}
