// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack processing configuration.
//!
//! Environment convention: `LOOM_CRASH_<FIELD>`.

use std::path::Path;

use loom_crash_context::{ContextOptions, DEFAULT_READ_CONCURRENCY, LINES_OF_CONTEXT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StackError};
use crate::normalize::InAppHeuristic;

pub const ENV_BASE_DIR: &str = "LOOM_CRASH_BASE_DIR";
pub const ENV_CONTEXT_LINES: &str = "LOOM_CRASH_CONTEXT_LINES";
pub const ENV_DEPENDENCY_DIR: &str = "LOOM_CRASH_DEPENDENCY_DIR";
pub const ENV_CAPTURE_MARKERS: &str = "LOOM_CRASH_CAPTURE_MARKERS";
pub const ENV_READ_CONCURRENCY: &str = "LOOM_CRASH_READ_CONCURRENCY";

/// Function name fragments of the SDK's own capture entry points.
pub const DEFAULT_CAPTURE_MARKERS: &[&str] = &["captureException", "captureMessage"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StackConfigLayer {
	pub base_dir: Option<String>,
	pub context_lines: Option<usize>,
	pub read_concurrency: Option<usize>,
	pub capture_markers: Option<Vec<String>>,
	pub dependency_dir: Option<String>,
	pub path_prefixes: Option<Vec<String>>,
	pub drive_separator: Option<String>,
	pub drive_separator_offset: Option<usize>,
}

impl StackConfigLayer {
	/// Load overrides from `LOOM_CRASH_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	/// Load overrides through an arbitrary variable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		debug!("loading crash stack config from environment");
		Ok(Self {
			base_dir: lookup(ENV_BASE_DIR),
			context_lines: parse_usize(ENV_CONTEXT_LINES, lookup(ENV_CONTEXT_LINES))?,
			read_concurrency: parse_usize(ENV_READ_CONCURRENCY, lookup(ENV_READ_CONCURRENCY))?,
			capture_markers: lookup(ENV_CAPTURE_MARKERS).map(|raw| {
				raw.split(',')
					.map(str::trim)
					.filter(|marker| !marker.is_empty())
					.map(String::from)
					.collect()
			}),
			dependency_dir: lookup(ENV_DEPENDENCY_DIR),
			..Default::default()
		})
	}

	pub fn merge(&mut self, other: Self) {
		if other.base_dir.is_some() {
			self.base_dir = other.base_dir;
		}
		if other.context_lines.is_some() {
			self.context_lines = other.context_lines;
		}
		if other.read_concurrency.is_some() {
			self.read_concurrency = other.read_concurrency;
		}
		if other.capture_markers.is_some() {
			self.capture_markers = other.capture_markers;
		}
		if other.dependency_dir.is_some() {
			self.dependency_dir = other.dependency_dir;
		}
		if other.path_prefixes.is_some() {
			self.path_prefixes = other.path_prefixes;
		}
		if other.drive_separator.is_some() {
			self.drive_separator = other.drive_separator;
		}
		if other.drive_separator_offset.is_some() {
			self.drive_separator_offset = other.drive_separator_offset;
		}
	}

	pub fn finalize(self) -> StackConfig {
		let defaults = InAppHeuristic::default();
		StackConfig {
			base_dir: self
				.base_dir
				.map(with_trailing_separator)
				.unwrap_or_else(StackConfig::working_dir_base),
			context_lines: self.context_lines.unwrap_or(LINES_OF_CONTEXT),
			read_concurrency: self
				.read_concurrency
				.unwrap_or(DEFAULT_READ_CONCURRENCY)
				.max(1),
			capture_markers: self.capture_markers.unwrap_or_else(default_capture_markers),
			in_app: InAppHeuristic {
				path_prefixes: self.path_prefixes.unwrap_or(defaults.path_prefixes),
				drive_separator: self.drive_separator.unwrap_or(defaults.drive_separator),
				drive_separator_offset: self
					.drive_separator_offset
					.unwrap_or(defaults.drive_separator_offset),
				dependency_dir: self.dependency_dir.unwrap_or(defaults.dependency_dir),
			},
		}
	}
}

/// Finalized configuration, computed once by the host and passed down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackConfig {
	/// Application root with a trailing separator. Module names are relative to it.
	pub base_dir: String,
	pub context_lines: usize,
	pub read_concurrency: usize,
	pub capture_markers: Vec<String>,
	pub in_app: InAppHeuristic,
}

impl Default for StackConfig {
	fn default() -> Self {
		StackConfigLayer::default().finalize()
	}
}

impl StackConfig {
	/// Base directory for an application started from `entry`: the entry
	/// file's directory, or the working directory when there is none.
	pub fn base_dir_for_entry(entry: Option<&Path>) -> String {
		entry
			.and_then(Path::parent)
			.filter(|dir| !dir.as_os_str().is_empty())
			.map(|dir| with_trailing_separator(dir.to_string_lossy().into_owned()))
			.unwrap_or_else(Self::working_dir_base)
	}

	pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
		self.base_dir = with_trailing_separator(base_dir.into());
		self
	}

	pub fn context_options(&self) -> ContextOptions {
		ContextOptions {
			context_lines: self.context_lines,
			read_concurrency: self.read_concurrency,
		}
	}

	fn working_dir_base() -> String {
		std::env::current_dir()
			.map(|dir| with_trailing_separator(dir.to_string_lossy().into_owned()))
			.unwrap_or_else(|_| "/".to_string())
	}
}

fn default_capture_markers() -> Vec<String> {
	DEFAULT_CAPTURE_MARKERS.iter().map(|m| m.to_string()).collect()
}

fn with_trailing_separator(mut dir: String) -> String {
	if !dir.ends_with('/') && !dir.ends_with('\\') {
		dir.push('/');
	}
	dir
}

fn parse_usize(var: &'static str, raw: Option<String>) -> Result<Option<usize>> {
	raw.map(|value| {
		let parsed = value.trim().parse::<usize>();
		parsed.map_err(|_| StackError::InvalidEnv { var, value })
	})
	.transpose()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn test_default_values() {
		let config = StackConfig::default();
		assert_eq!(config.context_lines, 7);
		assert_eq!(config.read_concurrency, DEFAULT_READ_CONCURRENCY);
		assert_eq!(config.capture_markers, vec!["captureException", "captureMessage"]);
		assert_eq!(config.in_app, InAppHeuristic::default());
		assert!(config.base_dir.ends_with('/') || config.base_dir.ends_with('\\'));
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let layer = StackConfigLayer {
			base_dir: Some("/srv/app".to_string()),
			context_lines: Some(3),
			dependency_dir: Some("vendor".to_string()),
			..Default::default()
		};
		let config = layer.finalize();
		assert_eq!(config.base_dir, "/srv/app/");
		assert_eq!(config.context_lines, 3);
		assert_eq!(config.in_app.dependency_dir, "vendor");
		assert_eq!(config.in_app.drive_separator_offset, 1);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = StackConfigLayer {
			base_dir: Some("/old/".to_string()),
			context_lines: Some(7),
			..Default::default()
		};
		let overlay = StackConfigLayer {
			base_dir: None,
			context_lines: Some(2),
			..Default::default()
		};
		base.merge(overlay);
		assert_eq!(base.base_dir.as_deref(), Some("/old/"));
		assert_eq!(base.context_lines, Some(2));
	}

	#[test]
	fn test_from_lookup() {
		let layer = StackConfigLayer::from_lookup(lookup(&[
			(ENV_BASE_DIR, "/srv/app/"),
			(ENV_CONTEXT_LINES, " 5 "),
			(ENV_CAPTURE_MARKERS, "report, ,notify"),
			(ENV_READ_CONCURRENCY, "4"),
		]))
		.unwrap();

		assert_eq!(layer.base_dir.as_deref(), Some("/srv/app/"));
		assert_eq!(layer.context_lines, Some(5));
		assert_eq!(layer.read_concurrency, Some(4));
		assert_eq!(
			layer.capture_markers,
			Some(vec!["report".to_string(), "notify".to_string()])
		);
		assert_eq!(layer.dependency_dir, None);
	}

	#[test]
	fn test_from_lookup_rejects_bad_numbers() {
		let result = StackConfigLayer::from_lookup(lookup(&[(ENV_CONTEXT_LINES, "seven")]));
		assert!(matches!(
			result,
			Err(StackError::InvalidEnv { var: ENV_CONTEXT_LINES, ref value }) if value == "seven"
		));
	}

	#[test]
	fn test_zero_concurrency_is_raised_to_one() {
		let config = StackConfigLayer {
			read_concurrency: Some(0),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.read_concurrency, 1);
	}

	#[test]
	fn test_base_dir_for_entry() {
		assert_eq!(
			StackConfig::base_dir_for_entry(Some(Path::new("/app/bin/server.js"))),
			"/app/bin/"
		);
		assert_eq!(
			StackConfig::base_dir_for_entry(Some(Path::new("server.js"))),
			StackConfig::working_dir_base()
		);
		assert_eq!(
			StackConfig::base_dir_for_entry(None),
			StackConfig::working_dir_base()
		);
	}

	#[test]
	fn test_layer_deserializes_from_json() {
		let layer: StackConfigLayer =
			serde_json::from_str(r#"{"context_lines": 4, "path_prefixes": ["/"]}"#).unwrap();
		let config = layer.finalize();
		assert_eq!(config.context_lines, 4);
		assert_eq!(config.in_app.path_prefixes, vec!["/"]);
	}
}
