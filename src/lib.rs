//! sqs-udf - a MySQL loadable function that sends one SQS message per row.
//!
//! ```sql
//! CREATE FUNCTION sqs_send_message RETURNS STRING SONAME 'libsqs_udf.so';
//!
//! SELECT sqs_send_message(
//!     'https://sqs.eu-west-1.amazonaws.com/123456789012/orders',
//!     JSON_OBJECT('order_id', id),
//!     NULL,
//!     '{"source":{"DataType":"String","StringValue":"orders"}}',
//!     NULL,
//!     NULL,
//!     NULL
//! ) FROM orders;
//! ```
//!
//! # Architecture
//!
//! - `udf::ffi` is the only place that touches host pointers
//! - `udf::args` decodes the seven slots into `core::SendMessageArgs`
//! - `core::request` builds the outgoing `SendMessage` request
//! - `clients::sqs_client` sends it through `aws-sdk-sqs`
//! - `udf::buffer` encodes the acknowledgement as JSON for the host
//!
//! Any failure is logged once and the row evaluates to `NULL`.
//!
//! # Example
//!
//! ```no_run
//! use sqs_udf::udf::{CallArgs, args::{SLOT_BODY, SLOT_QUEUE_URL}, evaluate_blocking};
//! use sqs_udf::clients::AwsSessionProvider;
//! use sqs_udf::core::config::UdfConfig;
//!
//! let config = UdfConfig::default();
//! sqs_udf::setup_logging(&config);
//!
//! let args = CallArgs::default()
//!     .with_text(SLOT_QUEUE_URL, "https://sqs.eu-west-1.amazonaws.com/123456789012/orders")
//!     .with_text(SLOT_BODY, "hello");
//! let out = evaluate_blocking(&args, &AwsSessionProvider::new(&config))?;
//! println!("{}", String::from_utf8_lossy(out.as_bytes()));
//! # Ok::<(), sqs_udf::errors::UdfError>(())
//! ```

pub mod clients;
pub mod core;
pub mod errors;
pub mod logging;
pub mod udf;

pub use logging::{report_failure, setup_logging};
