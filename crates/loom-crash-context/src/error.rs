// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source context extraction.

use std::io;

use thiserror::Error;

/// Errors that can occur while reading source for context lines.
#[derive(Debug, Error)]
pub enum ContextError {
	#[error("source file not found: {0}")]
	NotFound(String),

	#[error("permission denied reading {0}")]
	PermissionDenied(String),

	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: io::Error,
	},

	/// The environment does not allow file access at all.
	#[error("file access forbidden: {0}")]
	AccessForbidden(String),
}

impl ContextError {
	pub fn from_io(path: &str, source: io::Error) -> Self {
		match source.kind() {
			io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
			io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
			_ => Self::Io {
				path: path.to_string(),
				source,
			},
		}
	}

	/// Fatal errors abandon enrichment for every frame instead of one file.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::AccessForbidden(_))
	}
}

pub type Result<T> = std::result::Result<T, ContextError>;
