// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Unbuffered asynchronous delivery: one non-blocking request per message.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mixpanel_core::{encode_message, Endpoint, EndpointUrls, Message, Result, CONTENT_TYPE};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::{self, JoinSet};
use tracing::{debug, error, warn};

use crate::config::ConsumerBuilder;
use crate::delivery::{classify, DeliveryError, DeliveryOutcome, SharedDeliveryHook};
use crate::transport::{DeliveryRequest, SharedTransport};

/// The contract upstream code uses to hand messages to a consumer.
///
/// `message` must already be serialized JSON. Both checks (endpoint and
/// message) happen before anything is buffered or sent.
pub trait Consumer {
	fn send(&mut self, endpoint: &str, message: &str) -> Result<()>;

	/// Hands over a message that is already validated.
	///
	/// The default goes through [`send`](Self::send). The consumers in this
	/// crate override it and skip the second parse.
	fn send_message(&mut self, endpoint: Endpoint, message: Message) -> Result<()> {
		self.send(endpoint.as_str(), message.as_str())
	}
}

/// Sends every message in its own request without waiting for the response.
///
/// Issued requests are tracked until [`wait`](Self::wait) observes them.
/// Requests to the same endpoint reach the transport in the order they were
/// issued; each one starts only after its predecessor has completed.
///
/// # Example
///
/// ```ignore
/// let mut consumer = AsyncConsumer::builder().build_async()?;
/// consumer.send("events", r#"{"event":"signup","properties":{}}"#)?;
///
/// for outcome in consumer.wait().await {
///     if let Err(e) = outcome.result {
///         eprintln!("{} delivery failed: {e}", outcome.endpoint);
///     }
/// }
/// ```
pub struct AsyncConsumer {
	urls: EndpointUrls,
	transport: SharedTransport,
	hook: SharedDeliveryHook,
	request_timeout: Duration,
	api_key: Option<String>,
	runtime: Handle,
	pending: JoinSet<DeliveryOutcome>,
	pending_meta: HashMap<task::Id, (Endpoint, usize)>,
	completed: Vec<DeliveryOutcome>,
	tails: HashMap<Endpoint, oneshot::Receiver<()>>,
}

impl AsyncConsumer {
	/// Creates a new builder for constructing a consumer.
	pub fn builder() -> ConsumerBuilder {
		ConsumerBuilder::new()
	}

	pub(crate) fn from_parts(
		urls: EndpointUrls,
		transport: SharedTransport,
		hook: SharedDeliveryHook,
		request_timeout: Duration,
		api_key: Option<String>,
		runtime: Handle,
	) -> Self {
		Self {
			urls,
			transport,
			hook,
			request_timeout,
			api_key,
			runtime,
			pending: JoinSet::new(),
			pending_meta: HashMap::new(),
			completed: Vec::new(),
			tails: HashMap::new(),
		}
	}

	/// Validates and sends one message to the named endpoint.
	///
	/// Returns as soon as the request has been issued.
	pub fn send(&mut self, endpoint: &str, message: &str) -> Result<()> {
		let endpoint: Endpoint = endpoint.parse()?;
		let message = Message::new(message)?;
		self.send_message(endpoint, &message);
		Ok(())
	}

	/// Sends an already validated message.
	pub fn send_message(&mut self, endpoint: Endpoint, message: &Message) {
		let body = encode_message(message, self.api_key_for(endpoint));
		self.issue(endpoint, 1, body);
	}

	/// Number of issued requests whose outcome has not been collected.
	pub fn in_flight(&self) -> usize {
		self.pending.len() + self.completed.len()
	}

	/// The URL table requests are posted to.
	pub fn urls(&self) -> &EndpointUrls {
		&self.urls
	}

	/// Waits until every issued request has completed.
	///
	/// Returns the outcome of each request in completion order. Outcomes
	/// are held on the consumer until a call runs to completion, so a `wait`
	/// that is cancelled loses nothing; the next call returns them.
	pub async fn wait(&mut self) -> Vec<DeliveryOutcome> {
		while let Some(joined) = self.pending.join_next_with_id().await {
			match joined {
				Ok((id, outcome)) => {
					self.pending_meta.remove(&id);
					self.completed.push(outcome);
				}
				Err(join_error) => {
					let Some((endpoint, message_count)) = self.pending_meta.remove(&join_error.id())
					else {
						error!(error = %join_error, "Untracked delivery task failed");
						continue;
					};
					error!(
						endpoint = %endpoint,
						message_count,
						error = %join_error,
						"Delivery task aborted"
					);
					let outcome = DeliveryOutcome {
						endpoint,
						message_count,
						result: Err(DeliveryError::Aborted(join_error.to_string())),
					};
					self.hook.on_delivery(&outcome);
					self.completed.push(outcome);
				}
			}
		}

		self.tails.clear();
		std::mem::take(&mut self.completed)
	}

	pub(crate) fn api_key_for(&self, endpoint: Endpoint) -> Option<&str> {
		match endpoint {
			Endpoint::Imports => self.api_key.as_deref(),
			_ => None,
		}
	}

	/// Issues one request carrying `message_count` messages.
	pub(crate) fn issue(&mut self, endpoint: Endpoint, message_count: usize, body: String) {
		let request = DeliveryRequest {
			endpoint,
			url: self.urls.url(endpoint).to_string(),
			body,
			content_type: CONTENT_TYPE,
			timeout: self.request_timeout,
		};

		debug!(
			endpoint = %endpoint,
			message_count,
			url = %request.url,
			"Issuing delivery request"
		);

		// Each request holds the sender its successor waits on. The sender is
		// dropped when the task finishes, however it finishes.
		let (done_tx, done_rx) = oneshot::channel::<()>();
		let predecessor = self.tails.insert(endpoint, done_rx);

		let transport = Arc::clone(&self.transport);
		let hook = Arc::clone(&self.hook);

		let handle = self.pending.spawn_on(
			async move {
				let _done = done_tx;
				if let Some(predecessor) = predecessor {
					let _ = predecessor.await;
				}

				let result = match transport.submit(request).await {
					Ok(response) => classify(response),
					Err(e) => Err(DeliveryError::from(e)),
				};

				match &result {
					Ok(response) => {
						debug!(endpoint = %endpoint, message_count, status = response.status, "Delivered")
					}
					Err(e) => warn!(endpoint = %endpoint, message_count, error = %e, "Delivery failed"),
				}

				let outcome = DeliveryOutcome {
					endpoint,
					message_count,
					result,
				};
				hook.on_delivery(&outcome);
				outcome
			},
			&self.runtime,
		);

		self.pending_meta.insert(handle.id(), (endpoint, message_count));
	}
}

impl Consumer for AsyncConsumer {
	fn send(&mut self, endpoint: &str, message: &str) -> Result<()> {
		AsyncConsumer::send(self, endpoint, message)
	}

	fn send_message(&mut self, endpoint: Endpoint, message: Message) -> Result<()> {
		AsyncConsumer::send_message(self, endpoint, &message);
		Ok(())
	}
}

impl Drop for AsyncConsumer {
	fn drop(&mut self) {
		// Issued requests are never cancelled; let them finish unobserved.
		if !self.pending.is_empty() {
			debug!(in_flight = self.pending.len(), "Detaching in-flight deliveries");
			self.pending.detach_all();
		}
	}
}
