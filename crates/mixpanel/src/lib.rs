// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asynchronous Mixpanel client for Rust.
//!
//! Messages are delivered by a consumer that never blocks the caller:
//!
//! - [`AsyncConsumer`] issues one request per message.
//! - [`BufferedAsyncConsumer`] batches up to `max_size` messages per endpoint
//!   into a single request.
//!
//! Delivery results are not returned from `send`. Each one is reported to an
//! optional [`DeliveryHook`] and collected by `wait`, which should be awaited
//! before shutdown.
//!
//! # Example
//!
//! ```ignore
//! use mixpanel::{BufferedAsyncConsumer, Mixpanel, Properties};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let consumer = BufferedAsyncConsumer::builder().max_size(20).build_buffered()?;
//!     let mut mp = Mixpanel::new("project_token", consumer);
//!
//!     mp.track("user_42", "signup", Properties::new().insert("plan", "free"))?;
//!
//!     for outcome in mp.consumer_mut().wait().await {
//!         if let Err(e) = outcome.result {
//!             eprintln!("delivery to {} failed: {e}", outcome.endpoint);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod buffered;
mod client;
mod config;
mod consumer;
mod delivery;
mod properties;
mod transport;

#[cfg(test)]
mod test_support;

pub use buffered::BufferedAsyncConsumer;
pub use client::Mixpanel;
pub use config::{ConsumerBuilder, ConsumerConfig, DEFAULT_MAX_SIZE};
pub use consumer::{AsyncConsumer, Consumer};
pub use delivery::{
	DeliveryError, DeliveryHook, DeliveryOutcome, DeliveryResponse, NoOpDeliveryHook,
	SharedDeliveryHook,
};
pub use properties::Properties;
pub use transport::{
	DeliveryRequest, HttpTransport, ReqwestTransport, SharedTransport, TransportError,
	TransportResponse,
};

// Re-export core types for convenience
pub use mixpanel_core::{
	decode_data, Endpoint, EndpointUrls, Message, MixpanelError, Result, DEFAULT_API_HOST,
};
