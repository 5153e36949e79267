//! Per-row argument decoding.
//!
//! Slots are borrowed from the host only for the duration of the call; every
//! decoded value is an owned copy.

use serde::de::DeserializeOwned;

use super::ArgKind;
use crate::core::SendMessageArgs;
use crate::errors::UdfError;

pub const SLOT_QUEUE_URL: usize = 0;
pub const SLOT_BODY: usize = 1;
pub const SLOT_DELAY_SECONDS: usize = 2;
pub const SLOT_ATTRIBUTES: usize = 3;
pub const SLOT_SYSTEM_ATTRIBUTES: usize = 4;
pub const SLOT_DEDUPLICATION_ID: usize = 5;
pub const SLOT_GROUP_ID: usize = 6;

/// One non-null argument as the host coerced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue<'a> {
    Bytes(&'a [u8]),
    Int(i64),
}

/// The seven positional slots of one invocation. `None` is SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs<'a> {
    pub slots: [Option<ArgValue<'a>>; super::ARG_COUNT],
}

impl<'a> CallArgs<'a> {
    #[must_use]
    pub fn new(slots: [Option<ArgValue<'a>>; super::ARG_COUNT]) -> Self {
        Self { slots }
    }

    /// Convenience for textual slots.
    #[must_use]
    pub fn with_text(mut self, position: usize, text: &'a str) -> Self {
        self.slots[position] = Some(ArgValue::Bytes(text.as_bytes()));
        self
    }

    #[must_use]
    pub fn with_int(mut self, position: usize, value: i64) -> Self {
        self.slots[position] = Some(ArgValue::Int(value));
        self
    }
}

/// Decodes all seven slots. Either every slot decodes or the call fails;
/// nothing partial is returned.
///
/// # Errors
///
/// Returns `JsonDecode` for malformed attribute maps, `InvalidUtf8` for
/// non-text bytes in a textual slot and `ArgumentType` when a slot's kind
/// disagrees with the negotiated signature.
pub fn decode_args(args: &CallArgs<'_>) -> Result<SendMessageArgs, UdfError> {
    Ok(SendMessageArgs {
        queue_url: text_slot(args, SLOT_QUEUE_URL)?,
        body: text_slot(args, SLOT_BODY)?,
        delay_seconds: int_slot(args, SLOT_DELAY_SECONDS)?,
        attributes: json_slot(args, SLOT_ATTRIBUTES, "message attributes")?,
        system_attributes: json_slot(args, SLOT_SYSTEM_ATTRIBUTES, "message system attributes")?,
        deduplication_id: text_slot(args, SLOT_DEDUPLICATION_ID)?,
        group_id: text_slot(args, SLOT_GROUP_ID)?,
    })
}

fn bytes_slot<'a>(args: &CallArgs<'a>, position: usize) -> Result<Option<&'a [u8]>, UdfError> {
    match args.slots[position] {
        None => Ok(None),
        Some(ArgValue::Bytes(bytes)) => Ok(Some(bytes)),
        Some(ArgValue::Int(_)) => Err(UdfError::ArgumentType {
            position,
            expected: ArgKind::String.describe(),
        }),
    }
}

fn text_slot(args: &CallArgs<'_>, position: usize) -> Result<Option<String>, UdfError> {
    bytes_slot(args, position)?
        .map(|bytes| {
            String::from_utf8(bytes.to_vec()).map_err(|_| UdfError::InvalidUtf8 { position })
        })
        .transpose()
}

fn int_slot(args: &CallArgs<'_>, position: usize) -> Result<Option<i64>, UdfError> {
    match args.slots[position] {
        None => Ok(None),
        Some(ArgValue::Int(value)) => Ok(Some(value)),
        Some(ArgValue::Bytes(_)) => Err(UdfError::ArgumentType {
            position,
            expected: ArgKind::Integer.describe(),
        }),
    }
}

/// A JSON `null` literal decodes to an absent map.
fn json_slot<T: DeserializeOwned>(
    args: &CallArgs<'_>,
    position: usize,
    field: &'static str,
) -> Result<Option<T>, UdfError> {
    let Some(bytes) = bytes_slot(args, position)? else {
        return Ok(None);
    };
    serde_json::from_slice::<Option<T>>(bytes).map_err(|source| UdfError::JsonDecode { field, source })
}
