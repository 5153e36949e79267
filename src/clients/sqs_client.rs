//! SQS client for the per-row send.
//!
//! A fresh AWS session is resolved for every call. Pooling the client across
//! calls would not change what the host observes.

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::operation::send_message::SendMessageOutput;
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{
    MessageAttributeValue as SqsAttributeValue, MessageSystemAttributeNameForSends,
    MessageSystemAttributeValue as SqsSystemAttributeValue,
};
use std::collections::HashMap;
use tracing::debug;

use crate::core::config::UdfConfig;
use crate::core::{MessageAttributeValue, MessageSystemAttributeValue, SendMessageReceipt, SendMessageRequest};
use crate::errors::UdfError;

/// Sends one prepared request. Exactly one attempt per call.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageReceipt, UdfError>;
}

/// Establishes the session a [`QueueClient`] sends through.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(&self) -> Result<Box<dyn QueueClient>, UdfError>;
}

/// Resolves credentials and region from the AWS default provider chain.
#[derive(Debug, Clone, Default)]
pub struct AwsSessionProvider {
    endpoint_url: Option<String>,
}

impl AwsSessionProvider {
    #[must_use]
    pub fn new(config: &UdfConfig) -> Self {
        Self {
            endpoint_url: config.endpoint_url.clone(),
        }
    }
}

#[async_trait]
impl SessionProvider for AwsSessionProvider {
    async fn open(&self) -> Result<Box<dyn QueueClient>, UdfError> {
        let mut loader = aws_config::from_env();
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let shared_config = loader.load().await;
        let Some(region) = shared_config.region() else {
            return Err(UdfError::Session("no aws region configured".to_string()));
        };
        debug!(region = %region, "aws session resolved");

        Ok(Box::new(SqsQueueClient {
            client: SqsClient::new(&shared_config),
        }))
    }
}

pub struct SqsQueueClient {
    client: SqsClient,
}

impl SqsQueueClient {
    #[must_use]
    pub fn new(client: SqsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageReceipt, UdfError> {
        let delay_seconds = request
            .delay_seconds
            .map(|d| i32::try_from(d).map_err(|_| UdfError::Send(format!("DelaySeconds {d} out of range"))))
            .transpose()?;
        let attributes = request.message_attributes.map(to_sqs_attributes).transpose()?;
        let system_attributes = request
            .message_system_attributes
            .map(to_sqs_system_attributes)
            .transpose()?;

        let output = self
            .client
            .send_message()
            .set_queue_url(request.queue_url)
            .set_message_body(request.message_body)
            .set_delay_seconds(delay_seconds)
            .set_message_attributes(attributes)
            .set_message_system_attributes(system_attributes)
            .set_message_deduplication_id(request.message_deduplication_id)
            .set_message_group_id(request.message_group_id)
            .send()
            .await?;

        Ok(receipt_from_output(&output))
    }
}

fn to_sqs_attributes(
    attributes: HashMap<String, MessageAttributeValue>,
) -> Result<HashMap<String, SqsAttributeValue>, UdfError> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let converted = SqsAttributeValue::builder()
                .set_data_type(value.data_type)
                .set_string_value(value.string_value)
                .set_binary_value(value.binary_value.map(Blob::new))
                .set_string_list_values(value.string_list_values)
                .set_binary_list_values(
                    value.binary_list_values.map(|l| l.into_iter().map(Blob::new).collect()),
                )
                .build()
                .map_err(|e| UdfError::Send(format!("message attribute `{name}`: {e}")))?;
            Ok((name, converted))
        })
        .collect()
}

fn to_sqs_system_attributes(
    attributes: HashMap<String, MessageSystemAttributeValue>,
) -> Result<HashMap<MessageSystemAttributeNameForSends, SqsSystemAttributeValue>, UdfError> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let converted = SqsSystemAttributeValue::builder()
                .set_data_type(value.data_type)
                .set_string_value(value.string_value)
                .set_binary_value(value.binary_value.map(Blob::new))
                .set_string_list_values(value.string_list_values)
                .set_binary_list_values(
                    value.binary_list_values.map(|l| l.into_iter().map(Blob::new).collect()),
                )
                .build()
                .map_err(|e| UdfError::Send(format!("message system attribute `{name}`: {e}")))?;
            Ok((MessageSystemAttributeNameForSends::from(name.as_str()), converted))
        })
        .collect()
}

fn receipt_from_output(output: &SendMessageOutput) -> SendMessageReceipt {
    SendMessageReceipt {
        md5_of_message_attributes: output.md5_of_message_attributes().map(str::to_string),
        md5_of_message_body: output.md5_of_message_body().map(str::to_string),
        md5_of_message_system_attributes: output.md5_of_message_system_attributes().map(str::to_string),
        message_id: output.message_id().map(str::to_string),
        sequence_number: output.sequence_number().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_conversion_keeps_values() {
        let mut attrs = HashMap::new();
        attrs.insert(
            "trace".to_string(),
            MessageAttributeValue {
                data_type: Some("Binary".to_string()),
                binary_value: Some(vec![1, 2, 3]),
                ..Default::default()
            },
        );

        let converted = to_sqs_attributes(attrs).unwrap();
        let value = &converted["trace"];
        assert_eq!(value.data_type(), "Binary");
        assert_eq!(
            value.binary_value().cloned().map(Blob::into_inner),
            Some(vec![1u8, 2, 3])
        );
        assert!(value.string_value().is_none());
    }

    #[test]
    fn test_attribute_without_data_type_is_send_error() {
        let mut attrs = HashMap::new();
        attrs.insert(
            "color".to_string(),
            MessageAttributeValue {
                string_value: Some("red".to_string()),
                ..Default::default()
            },
        );

        let err = to_sqs_attributes(attrs).unwrap_err();
        assert!(matches!(err, UdfError::Send(ref msg) if msg.contains("color")));
    }

    #[test]
    fn test_system_attribute_names_map_to_sdk_enum() {
        let mut attrs = HashMap::new();
        attrs.insert(
            "AWSTraceHeader".to_string(),
            MessageSystemAttributeValue {
                data_type: Some("String".to_string()),
                string_value: Some("Root=1-abc".to_string()),
                ..Default::default()
            },
        );

        let converted = to_sqs_system_attributes(attrs).unwrap();
        assert!(converted.contains_key(&MessageSystemAttributeNameForSends::AwsTraceHeader));
    }

    #[test]
    fn test_receipt_copies_output_fields() {
        let output = SendMessageOutput::builder()
            .message_id("1")
            .md5_of_message_body("5d41402abc4b2a76b9719d911017c592")
            .build();

        let receipt = receipt_from_output(&output);
        assert_eq!(receipt.message_id.as_deref(), Some("1"));
        assert_eq!(
            receipt.md5_of_message_body.as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
        assert!(receipt.sequence_number.is_none());
    }
}
