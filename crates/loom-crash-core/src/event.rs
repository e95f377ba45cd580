// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event records produced from a captured error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Function name used when the engine could not tell us one.
pub const ANONYMOUS_FUNCTION: &str = "<anonymous>";

/// A normalized stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lineno: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub colno: Option<u32>,
	pub function: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	#[serde(default)]
	pub in_app: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pre_context: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context_line: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_context: Option<Vec<String>>,
}

impl Default for Frame {
	fn default() -> Self {
		Self {
			filename: None,
			lineno: None,
			colno: None,
			function: ANONYMOUS_FUNCTION.to_string(),
			module: None,
			in_app: false,
			pre_context: None,
			context_line: None,
			post_context: None,
		}
	}
}

impl Frame {
	/// Whether any of the source context fields have been filled in.
	pub fn has_context(&self) -> bool {
		self.pre_context.is_some() || self.context_line.is_some() || self.post_context.is_some()
	}
}

/// Ordered frames of a single exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

/// One exception in an event.
///
/// Frames are ordered outermost caller first, so the frame where the fault
/// occurred is last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
	#[serde(rename = "type")]
	pub exception_type: String,
	pub value: String,
	pub stacktrace: Stacktrace,
}

impl ExceptionRecord {
	/// The innermost frame, where the fault happened.
	pub fn fault_frame(&self) -> Option<&Frame> {
		self.stacktrace.frames.last()
	}
}

/// The record handed to the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
	/// "TypeError: x is not a function"
	pub message: String,
	pub exception: Vec<ExceptionRecord>,
	/// Extra error properties keyed by exception type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extra: Option<BTreeMap<String, Map<String, Value>>>,
}

impl EventRecord {
	/// Serialize to the JSON text handed to transport.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Extra properties recorded for the given exception type.
	pub fn extra_for(&self, exception_type: &str) -> Option<&Map<String, Value>> {
		self.extra.as_ref()?.get(exception_type)
	}
}
