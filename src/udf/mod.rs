//! The `sqs_send_message` loadable function.
//!
//! Everything here works on explicit Rust values so it can be exercised
//! without a host. Raw pointer handling lives only in [`ffi`].

pub mod args;
pub mod buffer;
pub mod ffi;

use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::clients::SessionProvider;
use crate::core::SendMessageRequest;
use crate::errors::UdfError;

pub use args::{ArgValue, CallArgs, decode_args};
pub use buffer::{OwnedBuffer, encode_receipt, write_diagnostic};

pub const ARG_COUNT: usize = 7;

/// Scalar kind the host must coerce a slot to before every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    String,
    Integer,
}

impl ArgKind {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            ArgKind::String => "a string",
            ArgKind::Integer => "an integer",
        }
    }
}

const ARG_KINDS: [ArgKind; ARG_COUNT] = [
    ArgKind::String,
    ArgKind::String,
    ArgKind::Integer,
    ArgKind::String,
    ArgKind::String,
    ArgKind::String,
    ArgKind::String,
];

/// Outcome of shape negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub arg_kinds: [ArgKind; ARG_COUNT],
    pub maybe_null: bool,
}

/// # Errors
///
/// Returns `Arity` unless exactly seven arguments are declared.
pub fn negotiate(arg_count: u32) -> Result<Signature, UdfError> {
    if arg_count as usize != ARG_COUNT {
        return Err(UdfError::Arity {
            expected: ARG_COUNT,
            actual: arg_count,
        });
    }
    Ok(Signature {
        arg_kinds: ARG_KINDS,
        maybe_null: true,
    })
}

/// Decode, build, send, encode. Decoding finishes before any session is
/// opened, so a bad argument never reaches the queue.
///
/// # Errors
///
/// Returns the first failure of any stage.
pub async fn evaluate(
    args: &CallArgs<'_>,
    sessions: &dyn SessionProvider,
) -> Result<OwnedBuffer, UdfError> {
    let request = SendMessageRequest::from(decode_args(args)?);
    debug!(
        queue_url = request.queue_url.as_deref().unwrap_or_default(),
        "sending sqs message"
    );

    let client = sessions.open().await?;
    let receipt = client.send_message(request).await?;
    encode_receipt(&receipt)
}

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

fn runtime() -> Result<&'static Runtime, UdfError> {
    RUNTIME.get_or_try_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("sqs-udf")
            .build()
            .map_err(|e| UdfError::Session(format!("failed to start async runtime: {e}")))
    })
}

/// Runs [`evaluate`] to completion on the calling host thread. No deadline
/// is applied beyond whatever the AWS client does by default.
///
/// # Errors
///
/// Same as [`evaluate`], plus `Session` if the runtime cannot start.
pub fn evaluate_blocking(
    args: &CallArgs<'_>,
    sessions: &dyn SessionProvider,
) -> Result<OwnedBuffer, UdfError> {
    runtime()?.block_on(evaluate(args, sessions))
}
