// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-capture cache of source file contents.

use std::collections::{BTreeSet, HashMap};

use futures::stream::{self, StreamExt};
use loom_crash_core::{Degradation, Outcome};
use tracing::{debug, instrument};

use crate::error::{ContextError, Result};
use crate::reader::SourceReader;

/// Filename to content for one capture.
///
/// Files that could not be read are simply absent.
#[derive(Debug, Default, Clone)]
pub struct SourceFileCache {
	files: HashMap<String, String>,
}

impl SourceFileCache {
	/// Read every distinct filename, at most `concurrency` at a time.
	///
	/// All reads run to completion. Per-file failures are reported as
	/// degradations; a fatal reader error is returned once every read has
	/// settled.
	#[instrument(skip_all, fields(concurrency = concurrency))]
	pub async fn load<R, I>(reader: &R, filenames: I, concurrency: usize) -> Result<Outcome<Self>>
	where
		R: SourceReader + ?Sized,
		I: IntoIterator<Item = String>,
	{
		let unique: BTreeSet<String> = filenames.into_iter().collect();
		debug!(file_count = unique.len(), "reading source files");

		let results: Vec<(String, Result<String>)> = stream::iter(unique)
			.map(|filename| async move {
				let result = reader.read_source(&filename).await;
				(filename, result)
			})
			.buffer_unordered(concurrency.max(1))
			.collect()
			.await;

		let mut files = HashMap::with_capacity(results.len());
		let mut reasons = Vec::new();
		let mut fatal: Option<ContextError> = None;

		for (filename, result) in results {
			match result {
				Ok(content) => {
					files.insert(filename, content);
				}
				Err(e) if e.is_fatal() => {
					fatal.get_or_insert(e);
				}
				Err(e) => {
					debug!(filename = %filename, error = %e, "source file unavailable");
					reasons.push(Degradation::SourceUnavailable {
						filename,
						reason: e.to_string(),
					});
				}
			}
		}

		if let Some(e) = fatal {
			return Err(e);
		}

		reasons.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
		Ok(Outcome::with_reasons(Self { files }, reasons))
	}

	pub fn get(&self, filename: &str) -> Option<&str> {
		self.files.get(filename).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.files
			.iter()
			.map(|(filename, content)| (filename.as_str(), content.as_str()))
	}

	pub fn contains(&self, filename: &str) -> bool {
		self.files.contains_key(filename)
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}
}
