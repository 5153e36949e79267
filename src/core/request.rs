use serde::Serialize;
use std::collections::HashMap;

use super::models::{MessageAttributeValue, MessageSystemAttributeValue, SendMessageArgs};

/// Outgoing `SendMessage` descriptor. Only fields that were present in the
/// decoded arguments are set; the queue service treats unset and empty
/// differently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendMessageRequest {
    #[serde(rename = "QueueUrl", skip_serializing_if = "Option::is_none")]
    pub queue_url: Option<String>,
    #[serde(rename = "MessageBody", skip_serializing_if = "Option::is_none")]
    pub message_body: Option<String>,
    #[serde(rename = "DelaySeconds", skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<i64>,
    #[serde(rename = "MessageAttributes", skip_serializing_if = "Option::is_none")]
    pub message_attributes: Option<HashMap<String, MessageAttributeValue>>,
    #[serde(rename = "MessageSystemAttributes", skip_serializing_if = "Option::is_none")]
    pub message_system_attributes: Option<HashMap<String, MessageSystemAttributeValue>>,
    #[serde(rename = "MessageDeduplicationId", skip_serializing_if = "Option::is_none")]
    pub message_deduplication_id: Option<String>,
    #[serde(rename = "MessageGroupId", skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,
}

impl From<SendMessageArgs> for SendMessageRequest {
    fn from(args: SendMessageArgs) -> Self {
        Self {
            queue_url: args.queue_url,
            message_body: args.body,
            delay_seconds: args.delay_seconds,
            message_attributes: args.attributes,
            message_system_attributes: args.system_attributes,
            message_deduplication_id: args.deduplication_id,
            message_group_id: args.group_id,
        }
    }
}
