// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The captured error as handed over by the host runtime.

use loom_crash_core::RawStackEntry;
use serde_json::Value;

/// Property names that are part of the error itself rather than extra data.
pub const RESERVED_PROPERTIES: &[&str] = &["name", "message", "stack", "domain"];

/// An own property value of the captured error.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	Json(Value),
	/// A value with no plain-data form, such as a function or symbol.
	/// Never serialized.
	Opaque(String),
}

impl PropertyValue {
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Opaque(_) => None,
		}
	}

	fn as_text(&self) -> Option<String> {
		match self.as_json()? {
			Value::Null => None,
			Value::String(s) => Some(s.clone()),
			other => Some(other.to_string()),
		}
	}
}

impl From<Value> for PropertyValue {
	fn from(value: Value) -> Self {
		Self::Json(value)
	}
}

/// An `Error`-like object: `name`, `message`, `stack` and any other own
/// enumerable properties, in insertion order.
///
/// # Example
///
/// ```
/// use loom_crash_stack::ErrorObject;
///
/// let error = ErrorObject::new()
///     .with_name("TypeError")
///     .with_message("x is not a function")
///     .with_stack("TypeError: x is not a function\n    at main (/app/index.js:3:5)")
///     .with_property("customCode", 42);
///
/// assert_eq!(error.name(), Some("TypeError"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorObject {
	constructor_name: Option<String>,
	properties: Vec<(String, PropertyValue)>,
	call_sites: Option<Vec<RawStackEntry>>,
}

impl ErrorObject {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from any JSON value.
	///
	/// Objects contribute their members as properties. Anything else is
	/// treated like a thrown primitive: a nameless error whose message is the
	/// value's text.
	pub fn from_json(value: Value) -> Self {
		match value {
			Value::Object(map) => {
				let mut error = Self::new();
				for (key, value) in map {
					error.set(key, PropertyValue::Json(value));
				}
				error
			}
			Value::Null => Self::new(),
			Value::String(message) => Self::new().with_message(message),
			other => Self::new().with_message(other.to_string()),
		}
	}

	/// Build from a Rust error, using the type's short name as the error name.
	///
	/// The error's `source()` message, when present, becomes the `cause`
	/// property.
	pub fn from_error<E: std::error::Error>(error: &E) -> Self {
		let type_name = std::any::type_name::<E>();
		let short = type_name
			.split('<')
			.next()
			.and_then(|path| path.rsplit("::").next())
			.unwrap_or(type_name);

		let mut object = Self::new()
			.with_constructor(short)
			.with_message(error.to_string());
		if let Some(source) = error.source() {
			object.set("cause", PropertyValue::Json(Value::String(source.to_string())));
		}
		object
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.set("name", PropertyValue::Json(Value::String(name.into())));
		self
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.set("message", PropertyValue::Json(Value::String(message.into())));
		self
	}

	pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
		self.set("stack", PropertyValue::Json(Value::String(stack.into())));
		self
	}

	/// Name of the constructor on the prototype chain, used when `name` is missing.
	pub fn with_constructor(mut self, name: impl Into<String>) -> Self {
		self.constructor_name = Some(name.into());
		self
	}

	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(key, PropertyValue::Json(value.into()));
		self
	}

	/// Record a property whose value has no plain-data form.
	pub fn with_opaque_property(mut self, key: impl Into<String>, kind: impl Into<String>) -> Self {
		self.set(key, PropertyValue::Opaque(kind.into()));
		self
	}

	/// Structured call sites supplied by the host engine, innermost first.
	///
	/// When present these are used instead of parsing the `stack` string.
	pub fn with_call_sites(mut self, call_sites: Vec<RawStackEntry>) -> Self {
		self.call_sites = Some(call_sites);
		self
	}

	/// Set a property, replacing any previous value for the key.
	pub fn set(&mut self, key: impl Into<String>, value: PropertyValue) {
		let key = key.into();
		match self.properties.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => *existing = value,
			None => self.properties.push((key, value)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&PropertyValue> {
		self.properties
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, value)| value)
	}

	/// The `name` property, when it is a non-empty string.
	pub fn name(&self) -> Option<&str> {
		match self.get("name")?.as_json()? {
			Value::String(name) if !name.is_empty() => Some(name),
			_ => None,
		}
	}

	/// The `message` property as text. Non-string values are stringified.
	pub fn message(&self) -> Option<String> {
		self.get("message")?.as_text()
	}

	pub fn stack(&self) -> Option<&PropertyValue> {
		self.get("stack")
	}

	pub fn constructor_name(&self) -> Option<&str> {
		self.constructor_name.as_deref().filter(|name| !name.is_empty())
	}

	pub fn call_sites(&self) -> Option<&[RawStackEntry]> {
		self.call_sites.as_deref()
	}

	/// Own properties in insertion order, reserved names included.
	pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
		self.properties.iter().map(|(k, v)| (k.as_str(), v))
	}
}
