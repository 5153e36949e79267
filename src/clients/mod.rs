//! Client modules for external API interactions

pub mod sqs_client;

pub use sqs_client::{AwsSessionProvider, QueueClient, SessionProvider, SqsQueueClient};
