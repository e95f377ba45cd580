// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw stack extraction from captured errors.

use async_trait::async_trait;
use loom_crash_core::{Degradation, NameLookup, Outcome, RawStackEntry};
use serde_json::Value;
use tracing::trace;

use crate::error_object::{ErrorObject, PropertyValue};

/// Turns an error into engine call sites, innermost first.
///
/// Never fails: an error without a usable stack yields no entries.
#[async_trait]
pub trait StackExtractor: Send + Sync {
	async fn extract(&self, error: &ErrorObject) -> Outcome<Vec<RawStackEntry>>;
}

/// Extractor for V8 (Node.js, Chromium) errors.
///
/// Uses the host-supplied call sites when the error carries them, and parses
/// the `stack` string otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct V8StackExtractor;

#[async_trait]
impl StackExtractor for V8StackExtractor {
	async fn extract(&self, error: &ErrorObject) -> Outcome<Vec<RawStackEntry>> {
		if let Some(call_sites) = error.call_sites() {
			return Outcome::Complete(call_sites.to_vec());
		}

		match error.stack() {
			None | Some(PropertyValue::Json(Value::Null)) => Outcome::Complete(Vec::new()),
			Some(PropertyValue::Json(Value::String(stack))) => {
				Outcome::Complete(parse_v8_stack(stack))
			}
			Some(_) => Outcome::degraded(Vec::new(), Degradation::UnparsableStack),
		}
	}
}

/// Parse a V8 `stack` string into call sites.
///
/// The header (`TypeError: message`, possibly spanning several lines) and
/// anything else that is not an `at ...` line is skipped.
pub fn parse_v8_stack(stack: &str) -> Vec<RawStackEntry> {
	stack.lines().filter_map(parse_frame_line).collect()
}

/// Parse a single `    at ...` line.
fn parse_frame_line(line: &str) -> Option<RawStackEntry> {
	let Some(rest) = line.trim().strip_prefix("at ") else {
		trace!(line, "skipping non-frame line");
		return None;
	};
	let rest = rest.strip_prefix("async ").unwrap_or(rest);

	// "fn (location)" or a bare "location"
	let (function_part, location) = match rest
		.strip_suffix(')')
		.and_then(|r| r.split_once(" ("))
	{
		Some((function, location)) => (Some(function), location),
		None => (None, rest),
	};

	let mut entry = RawStackEntry::default();
	if let Some(function) = function_part {
		apply_function(&mut entry, function.trim());
	}
	apply_location(&mut entry, location.trim());
	Some(entry)
}

/// `Type.method [as alias]` into function, type and method names.
fn apply_function(entry: &mut RawStackEntry, text: &str) {
	let (name, alias) = match text.strip_suffix(']').and_then(|t| t.rsplit_once(" [as ")) {
		Some((name, alias)) => (name.trim(), Some(alias.trim())),
		None => (text, None),
	};

	if name.is_empty() {
		return;
	}
	entry.function_name = Some(name.to_string());

	let callee = name.strip_prefix("new ").unwrap_or(name);
	match callee.rsplit_once('.') {
		Some((type_name, method_name)) if !type_name.is_empty() => {
			entry.type_name = NameLookup::Resolved(type_name.to_string());
			entry.method_name = NameLookup::Resolved(alias.unwrap_or(method_name).to_string());
		}
		_ => {
			entry.method_name = alias.map(String::from).into();
		}
	}
}

fn apply_location(entry: &mut RawStackEntry, location: &str) {
	if location == "native" {
		entry.is_native = true;
		return;
	}
	if location.is_empty() || location == "unknown location" {
		return;
	}

	// "eval at outer (file:1:2), <anonymous>:3:4" reports the eval'd code position last
	let location = match location.strip_prefix("eval at ") {
		Some(eval) => eval.rsplit_once(", ").map_or(location, |(_, inner)| inner),
		None => location,
	};
	let location = location.strip_prefix("file://").unwrap_or(location);

	let (rest, last) = split_number(location);
	let (filename, lineno, colno) = match last {
		Some(last) => match split_number(rest) {
			(file, Some(line)) => (file, Some(line), Some(last)),
			(file, None) => (file, Some(last), None),
		},
		None => (location, None, None),
	};

	if !filename.is_empty() {
		entry.filename = Some(filename.to_string());
	}
	entry.lineno = lineno;
	entry.colno = colno;
}

/// Split a trailing `:<number>` off `text`.
fn split_number(text: &str) -> (&str, Option<u32>) {
	match text.rsplit_once(':') {
		Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => {
			match tail.parse() {
				Ok(number) => (head, Some(number)),
				Err(_) => (text, None),
			}
		}
		_ => (text, None),
	}
}
