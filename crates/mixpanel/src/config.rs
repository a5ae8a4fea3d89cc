// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Consumer configuration and builder.

use std::sync::Arc;
use std::time::Duration;

use mixpanel_core::{EndpointUrls, MixpanelError, Result, DEFAULT_API_HOST};
use tokio::runtime::Handle;
use tracing::info;

use crate::buffered::BufferedAsyncConsumer;
use crate::consumer::AsyncConsumer;
use crate::delivery::{DeliveryHook, NoOpDeliveryHook, SharedDeliveryHook};
use crate::transport::{HttpTransport, ReqwestTransport, SharedTransport};

/// Default number of buffered messages per endpoint before a flush.
pub const DEFAULT_MAX_SIZE: usize = 50;

/// Configuration shared by both consumers.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
	/// Base URL of the ingestion API.
	pub api_host: String,
	/// Timeout applied to each HTTP request.
	pub request_timeout: Duration,
	/// Buffered messages per endpoint that force a flush.
	pub max_size: usize,
	/// Static key sent with import requests.
	pub api_key: Option<String>,
}

impl Default for ConsumerConfig {
	fn default() -> Self {
		Self {
			api_host: DEFAULT_API_HOST.to_string(),
			request_timeout: Duration::from_secs(10),
			max_size: DEFAULT_MAX_SIZE,
			api_key: None,
		}
	}
}

/// Builder for [`AsyncConsumer`] and [`BufferedAsyncConsumer`].
///
/// Consumers spawn their requests on the tokio runtime that is current when
/// they are built, so building must happen inside a runtime.
///
/// # Example
///
/// ```ignore
/// let consumer = ConsumerBuilder::new()
///     .max_size(20)
///     .request_timeout(Duration::from_secs(5))
///     .build_buffered()?;
/// ```
pub struct ConsumerBuilder {
	config: ConsumerConfig,
	transport: Option<SharedTransport>,
	hook: Option<SharedDeliveryHook>,
}

impl ConsumerBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self::from_config(ConsumerConfig::default())
	}

	/// Creates a builder starting from an existing configuration.
	pub fn from_config(config: ConsumerConfig) -> Self {
		Self {
			config,
			transport: None,
			hook: None,
		}
	}

	/// Sets the base URL of the ingestion API.
	///
	/// Example: `https://api-eu.mixpanel.com`
	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.config.api_host = host.into();
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Sets how many messages an endpoint buffers before it is flushed.
	///
	/// Only used by [`build_buffered`](Self::build_buffered). Must be at least 1.
	pub fn max_size(mut self, max_size: usize) -> Self {
		self.config.max_size = max_size;
		self
	}

	/// Sets the static API key sent with import requests.
	pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
		self.config.api_key = Some(api_key.into());
		self
	}

	/// Replaces the default reqwest transport.
	pub fn transport<T: HttpTransport + 'static>(mut self, transport: T) -> Self {
		self.transport = Some(Arc::new(transport));
		self
	}

	/// Sets a hook that observes every delivery outcome.
	pub fn delivery_hook<H: DeliveryHook + 'static>(mut self, hook: H) -> Self {
		self.hook = Some(Arc::new(hook));
		self
	}

	/// Sets a shared hook, keeping a handle for the caller.
	pub fn shared_delivery_hook(mut self, hook: SharedDeliveryHook) -> Self {
		self.hook = Some(hook);
		self
	}

	/// Builds an unbuffered consumer: one request per `send`.
	pub fn build_async(self) -> Result<AsyncConsumer> {
		let runtime = Handle::try_current().map_err(|_| MixpanelError::NoRuntime)?;
		let urls = EndpointUrls::new(&self.config.api_host)?;

		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(ReqwestTransport::new()?),
		};
		let hook = self.hook.unwrap_or_else(|| Arc::new(NoOpDeliveryHook));

		info!(
			api_host = %urls.api_host(),
			request_timeout_ms = self.config.request_timeout.as_millis() as u64,
			"Async consumer initialized"
		);

		Ok(AsyncConsumer::from_parts(
			urls,
			transport,
			hook,
			self.config.request_timeout,
			self.config.api_key,
			runtime,
		))
	}

	/// Builds a buffered consumer that batches up to `max_size` messages
	/// per endpoint.
	pub fn build_buffered(self) -> Result<BufferedAsyncConsumer> {
		let max_size = self.config.max_size;
		if max_size == 0 {
			return Err(MixpanelError::InvalidConfig(
				"max_size must be at least 1".to_string(),
			));
		}

		let inner = self.build_async()?;
		info!(max_size, "Buffered consumer initialized");
		Ok(BufferedAsyncConsumer::from_inner(inner, max_size))
	}
}

impl Default for ConsumerBuilder {
	fn default() -> Self {
		Self::new()
	}
}
