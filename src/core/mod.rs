//! Domain types: loader configuration, decoded arguments, the outgoing
//! request and the send acknowledgement.

pub mod config;
pub mod models;
pub mod request;

pub use models::{MessageAttributeValue, MessageSystemAttributeValue, SendMessageArgs, SendMessageReceipt};
pub use request::SendMessageRequest;
