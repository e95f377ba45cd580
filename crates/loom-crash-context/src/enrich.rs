// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attaching source context to in-app frames.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use loom_crash_core::{Degradation, Frame, Outcome};
use tracing::{debug, instrument, warn};

use crate::cache::SourceFileCache;
use crate::error::Result;
use crate::lines::{apply_context, source_lines};
use crate::reader::SourceReader;

/// Lines of context captured on each side of the fault line.
pub const LINES_OF_CONTEXT: usize = 7;
/// Source files read at the same time.
pub const DEFAULT_READ_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
	pub context_lines: usize,
	pub read_concurrency: usize,
}

impl Default for ContextOptions {
	fn default() -> Self {
		Self {
			context_lines: LINES_OF_CONTEXT,
			read_concurrency: DEFAULT_READ_CONCURRENCY,
		}
	}
}

/// Adds pre-context, context line and post-context to in-app frames.
///
/// Only frames that are in-app, have a filename and whose file could be read
/// get context. Nothing here fails the caller: if the step as a whole cannot
/// complete, the frames come back untouched.
pub struct ContextEnricher<R> {
	reader: R,
	options: ContextOptions,
}

impl<R: SourceReader> ContextEnricher<R> {
	pub fn new(reader: R, options: ContextOptions) -> Self {
		Self { reader, options }
	}

	pub fn options(&self) -> &ContextOptions {
		&self.options
	}

	#[instrument(skip_all, fields(frame_count = frames.len()))]
	pub async fn enrich(&self, frames: Vec<Frame>) -> Outcome<Vec<Frame>> {
		let original = frames.clone();

		match AssertUnwindSafe(self.try_enrich(frames)).catch_unwind().await {
			Ok(Ok(outcome)) => outcome,
			Ok(Err(e)) => {
				warn!(error = %e, "source context enrichment abandoned");
				Outcome::degraded(
					original,
					Degradation::EnrichmentSkipped {
						reason: e.to_string(),
					},
				)
			}
			Err(_) => {
				warn!("source context enrichment panicked");
				Outcome::degraded(
					original,
					Degradation::EnrichmentSkipped {
						reason: "panic while reading source".to_string(),
					},
				)
			}
		}
	}

	async fn try_enrich(&self, mut frames: Vec<Frame>) -> Result<Outcome<Vec<Frame>>> {
		let wanted: Vec<String> = frames
			.iter()
			.filter(|frame| frame.in_app)
			.filter_map(|frame| frame.filename.clone())
			.collect();

		if wanted.is_empty() {
			debug!("no in-app frames need source");
			return Ok(Outcome::Complete(frames));
		}

		let (cache, reasons) =
			SourceFileCache::load(&self.reader, wanted, self.options.read_concurrency)
				.await?
				.into_parts();

		let split: HashMap<&str, Vec<&str>> = cache
			.iter()
			.map(|(filename, content)| (filename, source_lines(content)))
			.collect();

		for frame in frames.iter_mut().filter(|frame| frame.in_app) {
			let Some(lines) = frame.filename.as_deref().and_then(|f| split.get(f)) else {
				continue;
			};
			apply_context(frame, lines, self.options.context_lines);
		}

		Ok(Outcome::with_reasons(frames, reasons))
	}
}
