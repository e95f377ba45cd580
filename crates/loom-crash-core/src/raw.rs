// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Engine-reported call sites before normalization.

use serde::{Deserialize, Serialize};

/// Result of asking the engine for a type or method name.
///
/// Some call sites (unusual prototype chains, proxies) make the lookup itself
/// fail. That is recorded as `Failed` rather than an error so the frame can
/// still be normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum NameLookup {
	Resolved(String),
	#[default]
	Unknown,
	Failed(String),
}

impl NameLookup {
	/// The resolved name, if any. Empty names count as unresolved.
	pub fn resolved(&self) -> Option<&str> {
		match self {
			Self::Resolved(name) if !name.is_empty() => Some(name),
			_ => None,
		}
	}

	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed(_))
	}
}

impl From<Option<String>> for NameLookup {
	fn from(name: Option<String>) -> Self {
		match name {
			Some(name) => Self::Resolved(name),
			None => Self::Unknown,
		}
	}
}

/// One engine-reported call site, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStackEntry {
	/// Absolute path, URL or pseudo name such as `<anonymous>`.
	#[serde(default)]
	pub filename: Option<String>,
	/// 1-based.
	#[serde(default)]
	pub lineno: Option<u32>,
	/// As reported by the engine.
	#[serde(default)]
	pub colno: Option<u32>,
	#[serde(default)]
	pub function_name: Option<String>,
	#[serde(default)]
	pub type_name: NameLookup,
	#[serde(default)]
	pub method_name: NameLookup,
	#[serde(default)]
	pub is_native: bool,
}
