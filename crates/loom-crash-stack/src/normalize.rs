// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw call sites to normalized frames.

use loom_crash_core::{Degradation, Frame, NameLookup, Outcome, RawStackEntry, ANONYMOUS_FUNCTION};
use serde::{Deserialize, Serialize};

use crate::config::StackConfig;
use crate::module_name::module_name;

/// Decides whether a frame belongs to the application.
///
/// A frame is internal when the engine marks it native, or when its filename
/// does not look like a filesystem path: it starts with none of
/// `path_prefixes` and has no Windows drive separator at
/// `drive_separator_offset` (`C:\...`). Bare specifiers such as
/// `node:internal/process` or `events.js` are internal under this rule, and
/// so are URLs and relative paths without a leading `.`.
///
/// A frame is in-app when it is not internal, has a filename, and that
/// filename is not under `dependency_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InAppHeuristic {
	pub path_prefixes: Vec<String>,
	pub drive_separator: String,
	pub drive_separator_offset: usize,
	pub dependency_dir: String,
}

impl Default for InAppHeuristic {
	fn default() -> Self {
		Self {
			path_prefixes: vec!["/".to_string(), ".".to_string()],
			drive_separator: ":\\".to_string(),
			drive_separator_offset: 1,
			dependency_dir: "node_modules".to_string(),
		}
	}
}

impl InAppHeuristic {
	pub fn is_path_like(&self, filename: &str) -> bool {
		self.path_prefixes
			.iter()
			.any(|prefix| filename.starts_with(prefix.as_str()))
			|| filename
				.get(self.drive_separator_offset..)
				.is_some_and(|rest| rest.starts_with(self.drive_separator.as_str()))
	}

	pub fn is_internal(&self, entry: &RawStackEntry) -> bool {
		entry.is_native
			|| entry
				.filename
				.as_deref()
				.is_some_and(|filename| !self.is_path_like(filename))
	}

	/// Whether `filename` has a dependency directory segment.
	pub fn is_dependency(&self, filename: &str) -> bool {
		let dir = &self.dependency_dir;
		filename.contains(&format!("{dir}/")) || filename.contains(&format!("{dir}\\"))
	}

	pub fn is_in_app(&self, entry: &RawStackEntry) -> bool {
		!self.is_internal(entry)
			&& entry
				.filename
				.as_deref()
				.is_some_and(|filename| !self.is_dependency(filename))
	}
}

/// Normalize one call site. Always yields a frame.
pub fn normalize_frame(entry: &RawStackEntry, config: &StackConfig) -> Outcome<Frame> {
	let in_app = config.in_app.is_in_app(entry);
	let module = entry
		.filename
		.as_deref()
		.map(|filename| module_name(filename, &config.base_dir, &config.in_app.dependency_dir));

	function_name(entry).map(|function| Frame {
		filename: entry.filename.clone(),
		lineno: entry.lineno,
		colno: entry.colno,
		function,
		module,
		in_app,
		..Frame::default()
	})
}

/// The reported function name, else `Type.method`, else the sentinel.
pub fn function_name(entry: &RawStackEntry) -> Outcome<String> {
	if let Some(name) = entry.function_name.as_deref().filter(|name| !name.is_empty()) {
		return Outcome::Complete(name.to_string());
	}

	if let (Some(type_name), Some(method_name)) =
		(entry.type_name.resolved(), entry.method_name.resolved())
	{
		return Outcome::Complete(format!("{type_name}.{method_name}"));
	}

	let failure = [&entry.type_name, &entry.method_name]
		.into_iter()
		.find_map(|lookup| match lookup {
			NameLookup::Failed(reason) => Some(reason.clone()),
			_ => None,
		});

	match failure {
		Some(reason) => Outcome::degraded(
			ANONYMOUS_FUNCTION.to_string(),
			Degradation::FunctionName { reason },
		),
		None => Outcome::Complete(ANONYMOUS_FUNCTION.to_string()),
	}
}
