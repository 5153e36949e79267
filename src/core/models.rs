use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-call values decoded from the seven host argument slots.
///
/// `None` means the host passed SQL `NULL`; it is never replaced by an empty
/// string or zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendMessageArgs {
    pub queue_url: Option<String>,
    pub body: Option<String>,
    pub delay_seconds: Option<i64>,
    pub attributes: Option<HashMap<String, MessageAttributeValue>>,
    pub system_attributes: Option<HashMap<String, MessageSystemAttributeValue>>,
    pub deduplication_id: Option<String>,
    pub group_id: Option<String>,
}

/// A user message attribute in the SQS wire shape. Contents are forwarded
/// without interpretation.
///
/// Field names are matched without regard to case (`DataType`, `dataType`
/// and `datatype` are the same field); unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageAttributeValue {
    #[serde(rename = "DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "StringValue", skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(
        rename = "BinaryValue",
        serialize_with = "base64_bytes::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub binary_value: Option<Vec<u8>>,
    #[serde(rename = "StringListValues", skip_serializing_if = "Option::is_none")]
    pub string_list_values: Option<Vec<String>>,
    #[serde(
        rename = "BinaryListValues",
        serialize_with = "base64_bytes_list::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub binary_list_values: Option<Vec<Vec<u8>>>,
}

impl<'de> Deserialize<'de> for MessageAttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut value = Self::default();
        for (name, field) in fields {
            match name.to_ascii_lowercase().as_str() {
                "datatype" => value.data_type = field_from::<_, D::Error>(field)?,
                "stringvalue" => value.string_value = field_from::<_, D::Error>(field)?,
                "binaryvalue" => {
                    value.binary_value = field_from::<Option<String>, D::Error>(field)?
                        .map(|text| decode_base64::<D::Error>(&text))
                        .transpose()?;
                }
                "stringlistvalues" => value.string_list_values = field_from::<_, D::Error>(field)?,
                "binarylistvalues" => {
                    value.binary_list_values = field_from::<Option<Vec<String>>, D::Error>(field)?
                        .map(|items| {
                            items
                                .iter()
                                .map(|text| decode_base64::<D::Error>(text))
                                .collect::<Result<Vec<_>, _>>()
                        })
                        .transpose()?;
                }
                _ => {}
            }
        }
        Ok(value)
    }
}

fn field_from<T: DeserializeOwned, E: de::Error>(field: Value) -> Result<T, E> {
    serde_json::from_value(field).map_err(E::custom)
}

fn decode_base64<E: de::Error>(text: &str) -> Result<Vec<u8>, E> {
    STANDARD.decode(text).map_err(E::custom)
}

/// System attributes share the user attribute shape but live in their own
/// namespace (e.g. `AWSTraceHeader`).
pub type MessageSystemAttributeValue = MessageAttributeValue;

/// The send acknowledgement. Serialized back to the host as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageReceipt {
    #[serde(rename = "MD5OfMessageAttributes", skip_serializing_if = "Option::is_none", default)]
    pub md5_of_message_attributes: Option<String>,
    #[serde(rename = "MD5OfMessageBody", skip_serializing_if = "Option::is_none", default)]
    pub md5_of_message_body: Option<String>,
    #[serde(
        rename = "MD5OfMessageSystemAttributes",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub md5_of_message_system_attributes: Option<String>,
    #[serde(rename = "MessageId", skip_serializing_if = "Option::is_none", default)]
    pub message_id: Option<String>,
    #[serde(rename = "SequenceNumber", skip_serializing_if = "Option::is_none", default)]
    pub sequence_number: Option<String>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::Serializer;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }
}

mod base64_bytes_list {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Serializer, ser::SerializeSeq};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Vec<Vec<u8>>>, s: S) -> Result<S::Ok, S::Error> {
        let Some(items) = value else {
            return s.serialize_none();
        };
        let mut seq = s.serialize_seq(Some(items.len()))?;
        for bytes in items {
            seq.serialize_element(&STANDARD.encode(bytes))?;
        }
        seq.end()
    }
}
