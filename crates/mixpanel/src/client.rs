// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project-level access: builds event and profile payloads and hands them to
//! a consumer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mixpanel_core::{Endpoint, Message, Result};
use serde_json::{json, Value};

use crate::consumer::Consumer;
use crate::properties::Properties;

/// Library version reported with tracked events.
const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name reported with tracked events.
const LIB_NAME: &str = "rust";

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Tracks events and updates profiles for one project token.
///
/// The consumer decides how payloads are delivered; `Mixpanel` only builds
/// them. Keep access to the consumer to flush and wait before shutdown.
///
/// # Example
///
/// ```ignore
/// use mixpanel::{BufferedAsyncConsumer, Mixpanel, Properties};
///
/// let consumer = BufferedAsyncConsumer::builder().build_buffered()?;
/// let mut mp = Mixpanel::new("project_token", consumer);
///
/// mp.track("user_42", "checkout", Properties::new().insert("total", 99.5))?;
/// mp.people_set("user_42", Properties::new().insert("plan", "premium"))?;
///
/// mp.consumer_mut().wait().await;
/// ```
pub struct Mixpanel<C> {
	token: String,
	consumer: C,
	clock: Clock,
}

impl<C: Consumer> Mixpanel<C> {
	pub fn new(token: impl Into<String>, consumer: C) -> Self {
		Self {
			token: token.into(),
			consumer,
			clock: Arc::new(Utc::now),
		}
	}

	/// Replaces the clock used for payload timestamps.
	pub fn with_clock<F>(mut self, clock: F) -> Self
	where
		F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
	{
		self.clock = Arc::new(clock);
		self
	}

	/// Records an event for `distinct_id`.
	///
	/// `properties` are merged over the standard ones (`token`,
	/// `distinct_id`, `time`, `mp_lib`, `$lib_version`).
	pub fn track(
		&mut self,
		distinct_id: &str,
		event_name: &str,
		properties: Properties,
	) -> Result<()> {
		let all_properties = Properties::new()
			.insert("token", self.token.as_str())
			.insert("distinct_id", distinct_id)
			.insert("time", self.now().timestamp())
			.insert("mp_lib", LIB_NAME)
			.insert("$lib_version", LIB_VERSION)
			.merge(properties);

		let event = json!({
			"event": event_name,
			"properties": all_properties.into_value(),
		});
		self.deliver(Endpoint::Events, &event)
	}

	/// Sets properties on a user profile.
	pub fn people_set(&mut self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.people_update(distinct_id, "$set", properties.into_value())
	}

	/// Applies an arbitrary profile operation such as `$set_once` or `$unset`.
	pub fn people_update(&mut self, distinct_id: &str, operation: &str, value: Value) -> Result<()> {
		let mut update = serde_json::Map::new();
		update.insert("$token".to_string(), json!(self.token));
		update.insert("$distinct_id".to_string(), json!(distinct_id));
		update.insert("$time".to_string(), json!(self.now().timestamp_millis()));
		update.insert(operation.to_string(), value);
		self.deliver(Endpoint::People, &Value::Object(update))
	}

	/// Sets properties on a group profile.
	pub fn group_set(
		&mut self,
		group_key: &str,
		group_id: &str,
		properties: Properties,
	) -> Result<()> {
		let update = json!({
			"$token": self.token,
			"$group_key": group_key,
			"$group_id": group_id,
			"$time": self.now().timestamp_millis(),
			"$set": properties.into_value(),
		});
		self.deliver(Endpoint::Groups, &update)
	}

	pub fn consumer(&self) -> &C {
		&self.consumer
	}

	pub fn consumer_mut(&mut self) -> &mut C {
		&mut self.consumer
	}

	pub fn into_consumer(self) -> C {
		self.consumer
	}

	fn now(&self) -> DateTime<Utc> {
		(self.clock)()
	}

	fn deliver(&mut self, endpoint: Endpoint, payload: &Value) -> Result<()> {
		let message = Message::from_value(payload)?;
		self.consumer.send_message(endpoint, message)
	}
}
