//! Provider-agnostic user profile handed to verify callbacks.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Normalized profile produced by a strategy for one authentication attempt.
///
/// Every field except [`provider`](Self::provider) is a best-effort passthrough of what the
/// upstream API returned: absent members stay `None`, present members keep their JSON shape
/// (including `null`), and nothing is coerced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
	/// Source provider label.
	pub provider: &'static str,
	/// Provider-assigned user identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<Value>,
	/// Human-readable name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<Value>,
	/// Provider-specific login name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<Value>,
	/// Email entries as returned upstream.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub emails: Option<Value>,
	/// Original, unparsed response body.
	#[serde(rename = "_raw")]
	pub raw_body: String,
	/// Parsed (and cleaned) response object.
	#[serde(rename = "_json")]
	pub raw_object: Map<String, Value>,
}
impl NormalizedProfile {
	/// Identifier as a string slice, when upstream sent a string.
	pub fn id_str(&self) -> Option<&str> {
		self.id.as_ref().and_then(Value::as_str)
	}

	/// Display name as a string slice, when upstream sent a string.
	pub fn display_name_str(&self) -> Option<&str> {
		self.display_name.as_ref().and_then(Value::as_str)
	}

	/// Username as a string slice, when upstream sent a string.
	pub fn username_str(&self) -> Option<&str> {
		self.username.as_ref().and_then(Value::as_str)
	}

	/// Email addresses found in [`emails`](Self::emails).
	///
	/// Jive lists emails as objects carrying a `value` member; bare strings are accepted too.
	/// Entries of any other shape are skipped.
	pub fn email_values(&self) -> Vec<&str> {
		let Some(Value::Array(entries)) = self.emails.as_ref() else {
			return Vec::new();
		};

		entries
			.iter()
			.filter_map(|entry| match entry {
				Value::String(address) => Some(address.as_str()),
				Value::Object(fields) => fields.get("value").and_then(Value::as_str),
				_ => None,
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn profile(emails: Value) -> NormalizedProfile {
		NormalizedProfile {
			provider: "jive",
			id: Some(json!("2001")),
			display_name: Some(Value::Null),
			username: None,
			emails: Some(emails),
			raw_body: "{}".into(),
			raw_object: Map::new(),
		}
	}

	#[test]
	fn accessors_only_yield_strings() {
		let profile = profile(json!([]));

		assert_eq!(profile.id_str(), Some("2001"));
		assert_eq!(profile.display_name_str(), None);
		assert_eq!(profile.username_str(), None);
	}

	#[test]
	fn email_values_read_objects_and_strings() {
		let profile = profile(json!([
			{ "value": "ann@example.com", "type": "work", "primary": true },
			"ann@home.example",
			{ "type": "other" },
			42
		]));

		assert_eq!(profile.email_values(), vec!["ann@example.com", "ann@home.example"]);
		assert!(self::profile(json!("not-a-list")).email_values().is_empty());
	}

	#[test]
	fn serializes_with_raw_members() {
		let value = serde_json::to_value(profile(json!(["a@x.com"])))
			.expect("Profile should serialize.");

		assert_eq!(value["provider"], "jive");
		assert_eq!(value["displayName"], Value::Null);
		assert_eq!(value["_raw"], "{}");
		assert!(value.get("username").is_none());
	}
}
