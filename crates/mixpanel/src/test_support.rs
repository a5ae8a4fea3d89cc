// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transports and hooks used by the unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::delivery::{DeliveryHook, DeliveryOutcome};
use crate::transport::{DeliveryRequest, HttpTransport, TransportError, TransportResponse};

pub(crate) const VERBOSE_OK: &str = r#"{"status": 1, "error": null}"#;

/// Records every submitted request and answers with a fixed response.
#[derive(Clone)]
pub(crate) struct RecordingTransport {
	requests: Arc<Mutex<Vec<DeliveryRequest>>>,
	response: std::result::Result<TransportResponse, TransportError>,
}

impl RecordingTransport {
	pub(crate) fn new() -> Self {
		Self::responding(Ok(TransportResponse {
			status: 200,
			body: VERBOSE_OK.to_string(),
		}))
	}

	pub(crate) fn responding(
		response: std::result::Result<TransportResponse, TransportError>,
	) -> Self {
		Self {
			requests: Arc::new(Mutex::new(Vec::new())),
			response,
		}
	}

	pub(crate) fn requests(&self) -> Vec<DeliveryRequest> {
		self.requests.lock().unwrap().clone()
	}

	/// Decoded `data` payloads, in submission order.
	pub(crate) fn payloads(&self) -> Vec<serde_json::Value> {
		self.requests()
			.iter()
			.map(|r| mixpanel_core::decode_data(&r.body).unwrap())
			.collect()
	}
}

#[async_trait]
impl HttpTransport for RecordingTransport {
	async fn submit(
		&self,
		request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError> {
		self.requests.lock().unwrap().push(request);
		self.response.clone()
	}
}

/// Holds every request until a permit is released.
#[derive(Clone)]
pub(crate) struct GatedTransport {
	pub(crate) gate: Arc<Semaphore>,
	pub(crate) inner: RecordingTransport,
}

impl GatedTransport {
	pub(crate) fn closed() -> Self {
		Self {
			gate: Arc::new(Semaphore::new(0)),
			inner: RecordingTransport::new(),
		}
	}

	pub(crate) fn open(&self, permits: usize) {
		self.gate.add_permits(permits);
	}
}

#[async_trait]
impl HttpTransport for GatedTransport {
	async fn submit(
		&self,
		request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError> {
		let permit = self.gate.acquire().await;
		if let Ok(permit) = permit {
			permit.forget();
		}
		self.inner.submit(request).await
	}
}

/// Sleeps for a per-request delay read from the payload before answering.
///
/// The payload must be a single JSON number (or a batch whose first element
/// is one), interpreted as milliseconds.
#[derive(Clone)]
pub(crate) struct DelayTransport {
	pub(crate) completed: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl DelayTransport {
	pub(crate) fn new() -> Self {
		Self {
			completed: Arc::new(Mutex::new(Vec::new())),
		}
	}
}

#[async_trait]
impl HttpTransport for DelayTransport {
	async fn submit(
		&self,
		request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError> {
		let payload = mixpanel_core::decode_data(&request.body).unwrap();
		let delay_ms = payload
			.as_u64()
			.or_else(|| payload.get(0).and_then(|v| v.as_u64()))
			.unwrap_or(0);
		tokio::time::sleep(Duration::from_millis(delay_ms)).await;
		self.completed.lock().unwrap().push(payload);
		Ok(TransportResponse {
			status: 200,
			body: VERBOSE_OK.to_string(),
		})
	}
}

/// Transport whose future panics.
pub(crate) struct PanickingTransport;

#[async_trait]
impl HttpTransport for PanickingTransport {
	async fn submit(
		&self,
		_request: DeliveryRequest,
	) -> std::result::Result<TransportResponse, TransportError> {
		panic!("transport exploded");
	}
}

/// Collects outcomes passed to the hook.
#[derive(Clone, Default)]
pub(crate) struct CollectingHook {
	pub(crate) outcomes: Arc<Mutex<Vec<DeliveryOutcome>>>,
}

impl DeliveryHook for CollectingHook {
	fn on_delivery(&self, outcome: &DeliveryOutcome) {
		self.outcomes.lock().unwrap().push(outcome.clone());
	}
}
