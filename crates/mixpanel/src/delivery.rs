// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outcomes of issued requests and the hook that observes them.
//!
//! A request's result never travels back to the `send` call that caused it.
//! It is reported once, when the request completes, to the consumer's
//! [`DeliveryHook`], and collected again by `wait`.

use std::sync::Arc;

use mixpanel_core::Endpoint;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::{TransportError, TransportResponse};

/// Why a request did not deliver its messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
	/// No response was received.
	#[error("transport failure: {0}")]
	Transport(String),

	/// The request timeout elapsed.
	#[error("request timed out")]
	Timeout,

	/// The server answered with a non-2xx status.
	#[error("server error ({status}): {body}")]
	Status { status: u16, body: String },

	/// The server accepted the request but reported a failure in its
	/// verbose response.
	#[error("rejected by server: {message}")]
	Rejected { message: String },

	/// The delivery task panicked or was cancelled.
	#[error("delivery task aborted: {0}")]
	Aborted(String),
}

impl DeliveryError {
	/// Whether resending the same batch could succeed.
	///
	/// The consumers never resend; this is information for hooks.
	pub fn is_retryable(&self) -> bool {
		match self {
			DeliveryError::Transport(_) | DeliveryError::Timeout => true,
			DeliveryError::Status { status, .. } => {
				matches!(*status, 429 | 408 | 500 | 502 | 503 | 504)
			}
			DeliveryError::Rejected { .. } | DeliveryError::Aborted(_) => false,
		}
	}
}

impl From<TransportError> for DeliveryError {
	fn from(err: TransportError) -> Self {
		match err {
			TransportError::Timeout => DeliveryError::Timeout,
			TransportError::Failed(message) => DeliveryError::Transport(message),
		}
	}
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
	pub status: u16,
	pub body: String,
}

/// The observed result of one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
	pub endpoint: Endpoint,
	/// Number of messages carried by the request.
	pub message_count: usize,
	pub result: Result<DeliveryResponse, DeliveryError>,
}

impl DeliveryOutcome {
	pub fn is_success(&self) -> bool {
		self.result.is_ok()
	}
}

/// Shape of the body returned for `verbose=1` requests.
#[derive(Debug, Deserialize)]
struct VerboseResponse {
	status: i64,
	#[serde(default)]
	error: Option<String>,
}

/// Turns a raw response into a delivery result.
///
/// A 2xx status is required. When the body is a verbose response its
/// `status` must also be `1`; bodies that are not verbose JSON are accepted.
pub(crate) fn classify(response: TransportResponse) -> Result<DeliveryResponse, DeliveryError> {
	if !(200..300).contains(&response.status) {
		return Err(DeliveryError::Status {
			status: response.status,
			body: response.body,
		});
	}

	if let Ok(verbose) = serde_json::from_str::<VerboseResponse>(&response.body) {
		if verbose.status != 1 {
			return Err(DeliveryError::Rejected {
				message: verbose
					.error
					.unwrap_or_else(|| "unspecified error".to_string()),
			});
		}
	}

	Ok(DeliveryResponse {
		status: response.status,
		body: response.body,
	})
}

/// Observes every completed request.
///
/// Called from the delivery task as soon as the request finishes, before
/// `wait` sees the outcome. Implementations must not block.
pub trait DeliveryHook: Send + Sync {
	fn on_delivery(&self, outcome: &DeliveryOutcome);
}

/// Hook that ignores every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDeliveryHook;

impl DeliveryHook for NoOpDeliveryHook {
	fn on_delivery(&self, _outcome: &DeliveryOutcome) {}
}

pub type SharedDeliveryHook = Arc<dyn DeliveryHook>;

#[cfg(test)]
mod tests {
	use super::*;

	fn response(status: u16, body: &str) -> TransportResponse {
		TransportResponse {
			status,
			body: body.to_string(),
		}
	}

	#[test]
	fn test_verbose_success() {
		let result = classify(response(200, r#"{"status": 1, "error": null}"#));
		assert_eq!(result.unwrap().status, 200);
	}

	#[test]
	fn test_verbose_rejection() {
		let result = classify(response(200, r#"{"status": 0, "error": "token, missing or empty"}"#));
		assert_eq!(
			result,
			Err(DeliveryError::Rejected {
				message: "token, missing or empty".to_string()
			})
		);
	}

	#[test]
	fn test_verbose_rejection_without_message() {
		let result = classify(response(200, r#"{"status": 0}"#));
		assert!(matches!(result, Err(DeliveryError::Rejected { .. })));
	}

	#[test]
	fn test_plain_body_is_success() {
		assert!(classify(response(200, "1")).is_ok());
		assert!(classify(response(204, "")).is_ok());
	}

	#[test]
	fn test_non_2xx_is_status_error() {
		let result = classify(response(503, "unavailable"));
		assert_eq!(
			result,
			Err(DeliveryError::Status {
				status: 503,
				body: "unavailable".to_string()
			})
		);
	}

	#[test]
	fn test_retryable_statuses() {
		for status in [429, 408, 500, 502, 503, 504] {
			let err = DeliveryError::Status {
				status,
				body: String::new(),
			};
			assert!(err.is_retryable(), "status {status} should be retryable");
		}
	}

	#[test]
	fn test_non_retryable() {
		for status in [400, 401, 403, 404, 413] {
			let err = DeliveryError::Status {
				status,
				body: String::new(),
			};
			assert!(!err.is_retryable(), "status {status} should not be retryable");
		}
		assert!(!DeliveryError::Rejected {
			message: "bad".to_string()
		}
		.is_retryable());
		assert!(DeliveryError::Timeout.is_retryable());
	}

	#[test]
	fn test_from_transport_error() {
		assert_eq!(DeliveryError::from(TransportError::Timeout), DeliveryError::Timeout);
		assert_eq!(
			DeliveryError::from(TransportError::Failed("reset".to_string())),
			DeliveryError::Transport("reset".to_string())
		);
	}
}
