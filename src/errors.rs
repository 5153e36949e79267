use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UdfError {
    #[error("`sqs_send_message` requires {expected} parameters, got {actual}")]
    Arity { expected: usize, actual: u32 },

    #[error("argument {position} must be {expected}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
    },

    #[error("argument {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },

    #[error("failed to unmarshal {field}: {source}")]
    JsonDecode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create aws session: {0}")]
    Session(String),

    #[error("failed to send sqs message: {0}")]
    Send(String),

    #[error("failed to encode send result: {0}")]
    Encode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl UdfError {
    /// Name of the step that failed, logged next to the cause.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            UdfError::Arity { .. } => "negotiate",
            UdfError::ArgumentType { .. } | UdfError::InvalidUtf8 { .. } => "decode_arguments",
            UdfError::JsonDecode { .. } => "decode_attributes",
            UdfError::Session(_) => "create_session",
            UdfError::Send(_) => "send_message",
            UdfError::Encode(_) => "encode_result",
            UdfError::Internal(_) => "evaluate",
        }
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for UdfError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    fn from(error: SdkError<E, R>) -> Self {
        UdfError::Send(DisplayErrorContext(&error).to_string())
    }
}
