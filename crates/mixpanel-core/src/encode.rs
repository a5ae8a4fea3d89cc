// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire encoding for ingestion requests.
//!
//! Every request body is `application/x-www-form-urlencoded` with three fields:
//!
//! | Field | Value |
//! |-------|-------|
//! | `data` | base64 (standard alphabet, padded) of the JSON payload |
//! | `verbose` | `1`, asking the server for a structured JSON response |
//! | `ip` | `0`, disabling IP based geolocation |
//!
//! Import requests may also carry a static `api_key` field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::form_urlencoded;

use crate::error::{MixpanelError, Result};
use crate::message::Message;

/// `Content-Type` of every request body produced here.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encodes a single message. The payload is the message itself, not an array.
pub fn encode_message(message: &Message, api_key: Option<&str>) -> String {
	encode_body(message.as_str(), api_key)
}

/// Encodes a batch. The payload is always a JSON array, even for one message.
pub fn encode_batch(messages: &[Message], api_key: Option<&str>) -> String {
	encode_body(&batch_json(messages), api_key)
}

/// Assembles the form body around an already serialized JSON payload.
pub fn encode_body(data_json: &str, api_key: Option<&str>) -> String {
	let data = STANDARD.encode(data_json.as_bytes());

	let mut form = form_urlencoded::Serializer::new(String::new());
	form.append_pair("data", &data)
		.append_pair("verbose", "1")
		.append_pair("ip", "0");
	if let Some(api_key) = api_key {
		form.append_pair("api_key", api_key);
	}
	form.finish()
}

/// Decodes the `data` field of a form body back into JSON.
pub fn decode_data(body: &str) -> Result<serde_json::Value> {
	let data = form_urlencoded::parse(body.as_bytes())
		.find(|(key, _)| key == "data")
		.map(|(_, value)| value.into_owned())
		.ok_or_else(|| MixpanelError::MalformedBody("missing data field".to_string()))?;

	let bytes = STANDARD
		.decode(data.as_bytes())
		.map_err(|e| MixpanelError::MalformedBody(format!("data is not valid base64: {e}")))?;

	Ok(serde_json::from_slice(&bytes)?)
}

// Messages are valid JSON individually, so joining them is valid JSON.
fn batch_json(messages: &[Message]) -> String {
	let len = messages.iter().map(|m| m.as_str().len() + 1).sum::<usize>() + 1;
	let mut out = String::with_capacity(len);
	out.push('[');
	for (i, message) in messages.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		out.push_str(message.as_str());
	}
	out.push(']');
	out
}
