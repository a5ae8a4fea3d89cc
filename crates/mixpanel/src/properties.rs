// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builder for event and profile property maps.

use serde_json::{Map, Value};

/// JSON properties attached to an event or a profile update.
///
/// # Example
///
/// ```
/// use mixpanel::Properties;
///
/// let props = Properties::new()
///     .insert("plan", "premium")
///     .insert("seats", 12)
///     .insert("trial", false);
/// assert_eq!(props.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	inner: Map<String, Value>,
}

impl Properties {
	/// Creates an empty property set.
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Adds a property, replacing any previous value for `key`.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Layers `other` on top of these properties; `other` wins on conflicts.
	pub fn merge(mut self, other: Properties) -> Self {
		self.inner.extend(other.inner);
		self
	}

	/// Returns true if no properties are set.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Number of properties.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns the value stored for `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	/// Returns true if `key` is set.
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.contains_key(key)
	}

	/// Converts into a JSON object, ready to embed in a payload.
	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		props.into_value()
	}
}

/// Non-object values carry no properties and convert to an empty set.
impl From<Value> for Properties {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(inner) => Self { inner },
			_ => Self::new(),
		}
	}
}

/// Collects key/value pairs; later pairs replace earlier ones.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		iter.into_iter()
			.fold(Self::new(), |props, (key, value)| props.insert(key, value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn test_insert_replaces() {
		let props = Properties::new().insert("color", "blue").insert("color", "red");
		assert_eq!(props.len(), 1);
		assert_eq!(props.get("color"), Some(&json!("red")));
	}

	#[test]
	fn test_merge_other_wins() {
		let base = Properties::new().insert("token", "abc").insert("time", 1);
		let user = Properties::new().insert("time", 2).insert("size", "big");

		let merged = base.merge(user);

		assert_eq!(merged.into_value(), json!({"token": "abc", "time": 2, "size": "big"}));
	}

	#[test]
	fn test_from_object_and_non_object() {
		let props = Properties::from(json!({"a": 1}));
		assert!(props.contains_key("a"));
		assert!(Properties::from(json!([1, 2])).is_empty());
	}

	#[test]
	fn test_from_iterator() {
		let props: Properties = [("size", "big"), ("color", "blue")].into_iter().collect();
		assert_eq!(props.into_value(), json!({"size": "big", "color": "blue"}));
	}

	proptest! {
		#[test]
		fn merge_keeps_union_of_keys(
			left in proptest::collection::btree_set("[a-z]{1,6}", 0..10),
			right in proptest::collection::btree_set("[a-z]{1,6}", 0..10),
		) {
			let a: Properties = left.iter().map(|k| (k.clone(), 0)).collect();
			let b: Properties = right.iter().map(|k| (k.clone(), 1)).collect();
			let merged = a.merge(b);

			prop_assert_eq!(merged.len(), left.union(&right).count());
			for key in &right {
				prop_assert_eq!(merged.get(key), Some(&json!(1)));
			}
		}
	}
}
