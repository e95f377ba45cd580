// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Final event assembly.

use std::collections::BTreeMap;

use loom_crash_core::{Degradation, EventRecord, ExceptionRecord, Frame, Outcome, Stacktrace};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error_object::{ErrorObject, RESERVED_PROPERTIES};

/// Type label when the error has neither a name nor a constructor name.
pub const GENERIC_ERROR_TYPE: &str = "Error";

/// Summary placeholder for errors without a message.
pub const NO_MESSAGE: &str = "<no message>";

/// Build the event record.
///
/// `frames` are innermost first, as the engine reports them. The innermost
/// frame is dropped when it is the SDK's own capture call (its function name
/// contains one of `capture_markers`), then the order is reversed so the
/// fault frame ends up last.
pub fn assemble(
	error: &ErrorObject,
	mut frames: Vec<Frame>,
	capture_markers: &[String],
) -> Outcome<EventRecord> {
	let (exception_type, reasons) = match error.name().or(error.constructor_name()) {
		Some(name) => (name.to_string(), Vec::new()),
		None => (GENERIC_ERROR_TYPE.to_string(), vec![Degradation::UnknownErrorType]),
	};

	let message = error.message();
	let summary = format!(
		"{exception_type}: {}",
		message.as_deref().filter(|m| !m.is_empty()).unwrap_or(NO_MESSAGE)
	);

	if frames
		.first()
		.is_some_and(|frame| is_capture_frame(frame, capture_markers))
	{
		let dropped = frames.remove(0);
		debug!(function = %dropped.function, "dropping capture frame");
	}
	frames.reverse();

	let extra = extra_properties(error);
	let extra = (!extra.is_empty()).then(|| BTreeMap::from([(exception_type.clone(), extra)]));

	let event = EventRecord {
		message: summary,
		exception: vec![ExceptionRecord {
			exception_type,
			value: message.unwrap_or_default(),
			stacktrace: Stacktrace { frames },
		}],
		extra,
	};

	Outcome::with_reasons(event, reasons)
}

fn is_capture_frame(frame: &Frame, capture_markers: &[String]) -> bool {
	capture_markers
		.iter()
		.filter(|marker| !marker.is_empty())
		.any(|marker| frame.function.contains(marker.as_str()))
}

/// Own properties other than the reserved ones, keyed in sorted order.
/// Properties with no plain-data form are left out.
fn extra_properties(error: &ErrorObject) -> Map<String, Value> {
	error
		.properties()
		.filter(|(key, _)| !RESERVED_PROPERTIES.contains(key))
		.filter_map(|(key, value)| Some((key.to_string(), value.as_json()?.clone())))
		.collect()
}
