// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for crash stack processing.

use thiserror::Error;

/// Errors that can occur when handling crash records.
#[derive(Debug, Error)]
pub enum CrashError {
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for crash record operations.
pub type Result<T> = std::result::Result<T, CrashError>;
