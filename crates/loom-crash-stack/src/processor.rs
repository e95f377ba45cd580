// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The full pipeline: extract, normalize, enrich, assemble.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use loom_crash_context::{ContextEnricher, FsSourceReader, SourceReader};
use loom_crash_core::{EventRecord, ExceptionRecord, Frame, Outcome};
use tracing::{debug, instrument, warn};

use crate::assemble::{assemble, GENERIC_ERROR_TYPE, NO_MESSAGE};
use crate::config::{StackConfig, StackConfigLayer};
use crate::error_object::ErrorObject;
use crate::extract::{StackExtractor, V8StackExtractor};
use crate::normalize::normalize_frame;

/// Turns captured errors into event records.
///
/// A processor holds no per-capture state; source files are read fresh for
/// every error and dropped once its event is built.
pub struct StackProcessor<E = V8StackExtractor, R = FsSourceReader> {
	config: StackConfig,
	extractor: E,
	enricher: ContextEnricher<R>,
}

impl StackProcessor {
	/// A processor for V8 errors reading sources from the local filesystem.
	pub fn new(config: StackConfig) -> Self {
		Self::with_parts(config, V8StackExtractor, FsSourceReader)
	}
}

impl<E: StackExtractor, R: SourceReader> StackProcessor<E, R> {
	pub fn with_parts(config: StackConfig, extractor: E, reader: R) -> Self {
		let enricher = ContextEnricher::new(reader, config.context_options());
		Self {
			config,
			extractor,
			enricher,
		}
	}

	pub fn config(&self) -> &StackConfig {
		&self.config
	}

	/// Build the event record for `error`. Never fails and never panics.
	///
	/// If a stage panics, a minimal record carrying only the error type and
	/// message is returned instead.
	pub async fn process(&self, error: &ErrorObject) -> EventRecord {
		match AssertUnwindSafe(self.process_with_outcome(error))
			.catch_unwind()
			.await
		{
			Ok(outcome) => outcome.into_inner(),
			Err(_) => {
				warn!("stack processing panicked, reporting error without frames");
				fallback_event(error)
			}
		}
	}

	/// Build the event record along with every degradation applied on the way.
	#[instrument(skip_all, fields(error_type = error.name().unwrap_or_default()))]
	pub async fn process_with_outcome(&self, error: &ErrorObject) -> Outcome<EventRecord> {
		let (entries, mut reasons) = self.extractor.extract(error).await.into_parts();
		debug!(entries = entries.len(), "extracted call sites");

		let (frames, mut more) = entries
			.iter()
			.map(|entry| normalize_frame(entry, &self.config))
			.collect::<Outcome<Vec<Frame>>>()
			.into_parts();
		reasons.append(&mut more);

		let (frames, mut more) = self.enricher.enrich(frames).await.into_parts();
		reasons.append(&mut more);

		let (event, mut more) = assemble(error, frames, &self.config.capture_markers).into_parts();
		reasons.append(&mut more);

		for reason in &reasons {
			debug!(%reason, "degraded");
		}
		Outcome::with_reasons(event, reasons)
	}
}

/// Build an event record for `error` with the default processor.
///
/// Reads configuration from `LOOM_CRASH_*` variables, falling back to defaults
/// when they are unset or invalid.
pub async fn event_from_error(error: &ErrorObject) -> EventRecord {
	let config = match StackConfigLayer::from_env() {
		Ok(layer) => layer.finalize(),
		Err(e) => {
			warn!(error = %e, "ignoring invalid crash stack configuration");
			StackConfig::default()
		}
	};
	StackProcessor::new(config).process(error).await
}

fn fallback_event(error: &ErrorObject) -> EventRecord {
	let exception_type = error
		.name()
		.or(error.constructor_name())
		.unwrap_or(GENERIC_ERROR_TYPE)
		.to_string();
	let value = error.message().unwrap_or_default();
	let summary = match value.as_str() {
		"" => NO_MESSAGE,
		message => message,
	};

	EventRecord {
		message: format!("{exception_type}: {summary}"),
		exception: vec![ExceptionRecord {
			exception_type,
			value,
			..Default::default()
		}],
		extra: None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use loom_crash_context::{ContextError, Result as ContextResult};
	use loom_crash_core::{Degradation, NameLookup, RawStackEntry};

	struct InMemoryReader(Vec<(&'static str, &'static str)>);

	#[async_trait]
	impl SourceReader for InMemoryReader {
		async fn read_source(&self, path: &str) -> ContextResult<String> {
			self.0
				.iter()
				.find(|(p, _)| *p == path)
				.map(|(_, content)| content.to_string())
				.ok_or_else(|| ContextError::NotFound(path.to_string()))
		}
	}

	struct PanickingExtractor;

	#[async_trait]
	impl StackExtractor for PanickingExtractor {
		async fn extract(&self, _error: &ErrorObject) -> Outcome<Vec<RawStackEntry>> {
			panic!("engine exploded");
		}
	}

	fn config() -> StackConfig {
		StackConfig::default().with_base_dir("/app")
	}

	fn processor() -> StackProcessor<V8StackExtractor, InMemoryReader> {
		StackProcessor::with_parts(
			config(),
			V8StackExtractor,
			InMemoryReader(vec![(
				"/app/lib/users.js",
				"const a = 1;\nfunction getUser(id) {\n  return db.find(id).name;\n}\n",
			)]),
		)
	}

	const STACK: &str = "TypeError: Cannot read properties of undefined (reading 'name')
    at getUser (/app/lib/users.js:3:22)
    at Server.handle (/app/server.js:10:5)
    at emit (node:events:517:28)";

	#[tokio::test]
	async fn processes_a_parsed_stack() {
		let error = ErrorObject::new()
			.with_name("TypeError")
			.with_message("Cannot read properties of undefined (reading 'name')")
			.with_stack(STACK);

		let outcome = processor().process_with_outcome(&error).await;
		let reasons = outcome.reasons().to_vec();
		let event = outcome.into_inner();

		assert_eq!(
			event.message,
			"TypeError: Cannot read properties of undefined (reading 'name')"
		);
		let frames = &event.exception[0].stacktrace.frames;
		assert_eq!(frames.len(), 3);
		assert_eq!(frames[0].function, "emit");
		assert!(!frames[0].in_app);

		let fault = event.exception[0].fault_frame().unwrap();
		assert_eq!(fault.function, "getUser");
		assert_eq!(fault.module.as_deref(), Some("lib:users"));
		assert_eq!(fault.context_line.as_deref(), Some("  return db.find(id).name;"));
		assert_eq!(
			fault.pre_context.as_deref(),
			Some(&["const a = 1;".to_string(), "function getUser(id) {".to_string()][..])
		);

		// server.js is in-app but unreadable
		assert!(frames[1].in_app);
		assert!(!frames[1].has_context());
		assert!(reasons
			.iter()
			.any(|r| matches!(r, Degradation::SourceUnavailable { filename, .. } if filename == "/app/server.js")));
	}

	#[tokio::test]
	async fn failed_name_lookup_is_reported() {
		let error = ErrorObject::new().with_name("Error").with_call_sites(vec![RawStackEntry {
			filename: Some("/app/lib/users.js".to_string()),
			lineno: Some(2),
			colno: Some(1),
			type_name: NameLookup::Failed("getter threw".to_string()),
			..Default::default()
		}]);

		let outcome = processor().process_with_outcome(&error).await;
		assert!(outcome.reasons().contains(&Degradation::FunctionName {
			reason: "getter threw".to_string()
		}));
		let event = outcome.into_inner();
		let fault = event.exception[0].fault_frame().unwrap();
		assert_eq!(fault.function, loom_crash_core::ANONYMOUS_FUNCTION);
		assert_eq!(fault.context_line.as_deref(), Some("function getUser(id) {"));
	}

	#[tokio::test]
	async fn panicking_stage_yields_minimal_event() {
		let processor = StackProcessor::with_parts(
			config(),
			PanickingExtractor,
			InMemoryReader(Vec::new()),
		);
		let error = ErrorObject::new()
			.with_name("RangeError")
			.with_property("limit", 3);

		let event = processor.process(&error).await;
		assert_eq!(event.message, "RangeError: <no message>");
		assert_eq!(event.exception.len(), 1);
		assert!(event.exception[0].stacktrace.frames.is_empty());
		assert!(event.extra.is_none());
	}

	#[tokio::test]
	async fn processing_is_repeatable() {
		let error = ErrorObject::new()
			.with_name("TypeError")
			.with_message("m")
			.with_stack(STACK)
			.with_property("customCode", 42);
		let processor = processor();

		let first = processor.process(&error).await.to_json().unwrap();
		let second = processor.process(&error).await.to_json().unwrap();
		assert_eq!(first, second);
	}
}
