// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Best-effort results.
//!
//! Crash processing must never fail the host, so every stage hands back a
//! value. [`Outcome`] records whether that value is complete or was produced
//! by falling back somewhere along the way.

use std::fmt;

/// Something that was skipped or replaced by a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
	/// Type or method name lookup failed; the function name fell back to the sentinel.
	FunctionName { reason: String },
	/// The error had no usable name or constructor.
	UnknownErrorType,
	/// The `stack` property was present but not a string.
	UnparsableStack,
	/// A source file could not be read.
	SourceUnavailable { filename: String, reason: String },
	/// Source context enrichment was abandoned for all frames.
	EnrichmentSkipped { reason: String },
}

impl fmt::Display for Degradation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FunctionName { reason } => write!(f, "function name unresolved: {reason}"),
			Self::UnknownErrorType => write!(f, "error type unknown"),
			Self::UnparsableStack => write!(f, "stack is not a string"),
			Self::SourceUnavailable { filename, reason } => {
				write!(f, "source unavailable for {filename}: {reason}")
			}
			Self::EnrichmentSkipped { reason } => write!(f, "source context skipped: {reason}"),
		}
	}
}

/// A value plus the degradations that went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
	Complete(T),
	Degraded { value: T, reasons: Vec<Degradation> },
}

impl<T> Outcome<T> {
	pub fn degraded(value: T, reason: Degradation) -> Self {
		Self::Degraded {
			value,
			reasons: vec![reason],
		}
	}

	/// Build from a value and a possibly empty list of reasons.
	pub fn with_reasons(value: T, reasons: Vec<Degradation>) -> Self {
		if reasons.is_empty() {
			Self::Complete(value)
		} else {
			Self::Degraded { value, reasons }
		}
	}

	pub fn is_degraded(&self) -> bool {
		matches!(self, Self::Degraded { .. })
	}

	pub fn value(&self) -> &T {
		match self {
			Self::Complete(value) | Self::Degraded { value, .. } => value,
		}
	}

	pub fn reasons(&self) -> &[Degradation] {
		match self {
			Self::Complete(_) => &[],
			Self::Degraded { reasons, .. } => reasons,
		}
	}

	pub fn into_inner(self) -> T {
		match self {
			Self::Complete(value) | Self::Degraded { value, .. } => value,
		}
	}

	pub fn into_parts(self) -> (T, Vec<Degradation>) {
		match self {
			Self::Complete(value) => (value, Vec::new()),
			Self::Degraded { value, reasons } => (value, reasons),
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
		match self {
			Self::Complete(value) => Outcome::Complete(f(value)),
			Self::Degraded { value, reasons } => Outcome::Degraded {
				value: f(value),
				reasons,
			},
		}
	}
}

impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
	fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
		let mut values = Vec::new();
		let mut reasons = Vec::new();
		for outcome in iter {
			let (value, mut more) = outcome.into_parts();
			values.push(value);
			reasons.append(&mut more);
		}
		Outcome::with_reasons(values, reasons)
	}
}
