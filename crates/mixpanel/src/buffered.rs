// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-endpoint batching on top of [`AsyncConsumer`].

use std::collections::HashMap;

use mixpanel_core::{encode_batch, Endpoint, Message, Result};
use tracing::debug;

use crate::config::ConsumerBuilder;
use crate::consumer::{AsyncConsumer, Consumer};
use crate::delivery::DeliveryOutcome;

/// Buffers messages per endpoint and sends each buffer as one batch.
///
/// An endpoint is flushed when its buffer reaches `max_size`, or when
/// [`flush`](Self::flush) / [`flush_endpoint`](Self::flush_endpoint) is
/// called. A batch is always encoded as a JSON array, even when it holds a
/// single message, so with `max_size == 1` the wire format still differs
/// from [`AsyncConsumer::send`].
///
/// Buffered messages live only in memory. Dropping the consumer loses
/// anything not yet flushed; call [`wait`](Self::wait) before shutdown.
pub struct BufferedAsyncConsumer {
	inner: AsyncConsumer,
	max_size: usize,
	buffers: HashMap<Endpoint, Vec<Message>>,
}

impl BufferedAsyncConsumer {
	/// Creates a new builder for constructing a consumer.
	pub fn builder() -> ConsumerBuilder {
		ConsumerBuilder::new()
	}

	pub(crate) fn from_inner(inner: AsyncConsumer, max_size: usize) -> Self {
		Self {
			inner,
			max_size,
			buffers: HashMap::new(),
		}
	}

	/// Validates and buffers one message, flushing the endpoint if its
	/// buffer is now full.
	///
	/// Nothing is buffered if validation fails.
	pub fn send(&mut self, endpoint: &str, message: &str) -> Result<()> {
		let endpoint: Endpoint = endpoint.parse()?;
		let message = Message::new(message)?;
		self.send_message(endpoint, message);
		Ok(())
	}

	/// Buffers an already validated message.
	pub fn send_message(&mut self, endpoint: Endpoint, message: Message) {
		let buffer = self.buffers.entry(endpoint).or_default();
		buffer.push(message);

		if buffer.len() >= self.max_size {
			self.flush_endpoint(endpoint);
		}
	}

	/// Flushes every endpoint that has buffered messages.
	pub fn flush(&mut self) {
		for endpoint in Endpoint::ALL {
			self.flush_endpoint(endpoint);
		}
	}

	/// Flushes one endpoint. Does nothing if its buffer is empty.
	pub fn flush_endpoint(&mut self, endpoint: Endpoint) {
		let batch = match self.buffers.get_mut(&endpoint) {
			Some(buffer) => std::mem::take(buffer),
			None => return,
		};
		if batch.is_empty() {
			return;
		}

		debug!(endpoint = %endpoint, message_count = batch.len(), "Flushing buffered messages");

		let body = encode_batch(&batch, self.inner.api_key_for(endpoint));
		self.inner.issue(endpoint, batch.len(), body);
	}

	/// Flushes the endpoint with the given name.
	pub fn flush_named(&mut self, endpoint: &str) -> Result<()> {
		let endpoint: Endpoint = endpoint.parse()?;
		self.flush_endpoint(endpoint);
		Ok(())
	}

	/// Flushes every buffer, then waits for all issued requests.
	pub async fn wait(&mut self) -> Vec<DeliveryOutcome> {
		self.flush();
		self.inner.wait().await
	}

	/// Number of messages buffered for `endpoint`.
	pub fn buffered(&self, endpoint: Endpoint) -> usize {
		self.buffers.get(&endpoint).map_or(0, Vec::len)
	}

	/// Number of issued requests whose outcome has not been collected.
	pub fn in_flight(&self) -> usize {
		self.inner.in_flight()
	}

	pub fn max_size(&self) -> usize {
		self.max_size
	}
}

impl Consumer for BufferedAsyncConsumer {
	fn send(&mut self, endpoint: &str, message: &str) -> Result<()> {
		BufferedAsyncConsumer::send(self, endpoint, message)
	}

	fn send_message(&mut self, endpoint: Endpoint, message: Message) -> Result<()> {
		BufferedAsyncConsumer::send_message(self, endpoint, message);
		Ok(())
	}
}
