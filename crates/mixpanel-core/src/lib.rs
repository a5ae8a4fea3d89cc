// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Mixpanel ingestion API.
//!
//! This crate holds everything the delivery consumers need that performs no
//! I/O:
//!
//! - [`Endpoint`]: the closed set of ingestion destinations and their URLs
//! - [`Message`]: a validated, pre-serialized JSON payload
//! - [`encode`]: the `application/x-www-form-urlencoded` wire body
//! - [`MixpanelError`]: the synchronous error taxonomy

pub mod encode;
pub mod endpoint;
pub mod error;
pub mod message;

pub use encode::{decode_data, encode_batch, encode_body, encode_message, CONTENT_TYPE};
pub use endpoint::{Endpoint, EndpointUrls, DEFAULT_API_HOST};
pub use error::{MixpanelError, Result};
pub use message::Message;
