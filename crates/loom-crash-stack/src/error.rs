// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the stack pipeline.
//!
//! Processing an error never fails; these only cover configuration.

use thiserror::Error;

/// Result type alias for stack pipeline setup.
pub type Result<T> = std::result::Result<T, StackError>;

#[derive(Debug, Error)]
pub enum StackError {
	/// An environment variable held a value that could not be parsed.
	#[error("invalid value for {var}: {value:?}")]
	InvalidEnv {
		/// Variable name.
		var: &'static str,
		/// Raw value.
		value: String,
	},
}
