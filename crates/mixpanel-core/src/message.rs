// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validated message payloads.

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::Result;

/// One serialized event or profile mutation.
///
/// The text is checked to be valid JSON on construction and is kept exactly
/// as supplied, so what goes on the wire is what the caller handed over.
#[derive(Debug, Clone)]
pub struct Message(Box<RawValue>);

impl Message {
	/// Wraps already serialized JSON text.
	///
	/// Fails with [`MixpanelError::Encoding`](crate::MixpanelError::Encoding)
	/// if `text` is not a single valid JSON value.
	pub fn new(text: impl Into<String>) -> Result<Self> {
		Ok(Self(RawValue::from_string(text.into())?))
	}

	/// Serializes `value` into a message.
	pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
		Ok(Self(serde_json::value::to_raw_value(value)?))
	}

	/// The JSON text of the message.
	pub fn as_str(&self) -> &str {
		self.0.get()
	}
}

impl PartialEq for Message {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Eq for Message {}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
