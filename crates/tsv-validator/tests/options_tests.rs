use super::*;

#[test]
fn test_default_accepts_additional_props() {
    assert!(ValidatorOptions::default().accept_additional_props);
    assert_eq!(
        ValidatorOptions::from_json_str("{}").unwrap(),
        ValidatorOptions::default()
    );
}

#[test]
fn test_bool_or_string() {
    let parse = |json: &str| {
        ValidatorOptions::from_json_str(json)
            .unwrap()
            .accept_additional_props
    };
    assert!(!parse(r#"{"acceptAdditionalProps": false}"#));
    assert!(!parse(r#"{"acceptAdditionalProps": "off"}"#));
    assert!(parse(r#"{"acceptAdditionalProps": " TRUE "}"#));
    assert!(parse(r#"{"acceptAdditionalProps": "1"}"#));
}

#[test]
fn test_invalid_bool_string_is_rejected() {
    let err = ValidatorOptions::from_json_str(r#"{"acceptAdditionalProps": "maybe"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("invalid boolean value: 'maybe'"));
}

#[test]
fn test_serializes_camel_case() {
    let json = serde_json::to_string(&ValidatorOptions::default()).unwrap();
    assert_eq!(json, r#"{"acceptAdditionalProps":true}"#);
}
