// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Mixpanel SDK.

use thiserror::Error;

/// Errors raised synchronously by the SDK.
///
/// Delivery failures are not part of this type; they surface asynchronously
/// through the consumer's delivery outcomes.
#[derive(Debug, Error)]
pub enum MixpanelError {
	/// The endpoint name is not one of the recognized destinations.
	#[error("unknown endpoint '{0}': expected one of events, people, groups, imports")]
	UnknownEndpoint(String),

	/// The message is not valid JSON.
	#[error("message is not valid JSON: {0}")]
	Encoding(#[from] serde_json::Error),

	/// A request body could not be decoded.
	#[error("malformed request body: {0}")]
	MalformedBody(String),

	/// Consumer configuration was rejected.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A consumer was built outside of a tokio runtime.
	#[error("no tokio runtime available: consumers must be built inside a runtime")]
	NoRuntime,

	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, MixpanelError>;
