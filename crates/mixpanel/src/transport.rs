// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The HTTP capability the consumers deliver through.
//!
//! Consumers never talk to an HTTP client directly. They hand a
//! [`DeliveryRequest`] to an [`HttpTransport`] and await its future. The
//! default transport is [`ReqwestTransport`]; tests substitute recording or
//! gated transports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mixpanel_core::{Endpoint, MixpanelError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

/// Everything needed to issue one ingestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
	pub endpoint: Endpoint,
	pub url: String,
	pub body: String,
	pub content_type: &'static str,
	pub timeout: Duration,
}

/// Raw response from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	pub status: u16,
	pub body: String,
}

/// Failure to obtain any response at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
	/// The request timeout elapsed.
	#[error("request timed out")]
	Timeout,

	/// Connection, TLS or protocol failure.
	#[error("transport failure: {0}")]
	Failed(String),
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			TransportError::Timeout
		} else {
			TransportError::Failed(err.to_string())
		}
	}
}

/// Submits a request and resolves with the server's response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
	async fn submit(
		&self,
		request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError>;
}

/// Shared transport handle, cloned into every delivery task.
pub type SharedTransport = Arc<dyn HttpTransport>;

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: Client,
}

impl ReqwestTransport {
	/// Creates a transport with the standard SDK User-Agent.
	pub fn new() -> Result<Self> {
		let client = mixpanel_common_http::builder()
			.build()
			.map_err(|e| MixpanelError::HttpClient(Box::new(e)))?;
		Ok(Self { client })
	}

	/// Wraps an existing client, e.g. one configured with a proxy.
	pub fn with_client(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn submit(
		&self,
		request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError> {
		let response = self
			.client
			.post(&request.url)
			.header(CONTENT_TYPE, request.content_type)
			.timeout(request.timeout)
			.body(request.body)
			.send()
			.await?;

		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(TransportResponse { status, body })
	}
}
