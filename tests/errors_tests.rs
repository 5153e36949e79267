use std::error::Error;
use sqs_udf::errors::UdfError;

#[test]
fn test_udf_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = UdfError::Send("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_udf_error_display() {
    let error = UdfError::Arity {
        expected: 7,
        actual: 3,
    };
    assert_eq!(
        format!("{error}"),
        "`sqs_send_message` requires 7 parameters, got 3"
    );

    let error = UdfError::Session("no aws region configured".to_string());
    assert_eq!(
        format!("{error}"),
        "failed to create aws session: no aws region configured"
    );

    let error = UdfError::Send("QueueDoesNotExist".to_string());
    assert_eq!(format!("{error}"), "failed to send sqs message: QueueDoesNotExist");
}

#[test]
fn test_json_error_keeps_source() {
    let source = serde_json::from_str::<serde_json::Value>("{not-json").unwrap_err();
    let error = UdfError::JsonDecode {
        field: "message attributes",
        source,
    };

    assert!(error.source().is_some());
    assert_eq!(error.operation(), "decode_attributes");
}

#[test]
fn test_operations_are_distinct_per_stage() {
    let ops = [
        UdfError::Arity {
            expected: 7,
            actual: 1,
        }
        .operation(),
        UdfError::InvalidUtf8 { position: 0 }.operation(),
        UdfError::Session(String::new()).operation(),
        UdfError::Send(String::new()).operation(),
        UdfError::Encode(String::new()).operation(),
    ];

    for (i, a) in ops.iter().enumerate() {
        for b in &ops[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
