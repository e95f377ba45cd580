// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context line extraction around a fault position.

use loom_crash_core::Frame;

use crate::snip::snip_line;

/// Lines surrounding a fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
	pub pre_context: Vec<String>,
	pub context_line: Option<String>,
	pub post_context: Vec<String>,
}

/// Split file content into lines, dropping the `\r` of CRLF endings.
///
/// A trailing newline yields a final empty line.
pub fn source_lines(content: &str) -> Vec<&str> {
	content
		.split('\n')
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.collect()
}

/// Extract the lines around `lineno` (1-based).
///
/// An unknown or zero line number yields no context at all. A line number
/// past the end of the file clamps to the last line. Context lines are
/// snipped around column 0 and the fault line around `colno`.
pub fn extract_context(
	lines: &[&str],
	lineno: Option<u32>,
	colno: Option<u32>,
	context_lines: usize,
) -> SourceContext {
	let Some(lineno) = known_line(lineno) else {
		return SourceContext::default();
	};
	let Some(last_idx) = lines.len().checked_sub(1) else {
		return SourceContext::default();
	};
	let max_lines = lines.len();
	let fault_idx = (lineno as usize - 1).min(last_idx);

	let pre_start = fault_idx.saturating_sub(context_lines);
	let pre_context = lines[pre_start..fault_idx]
		.iter()
		.map(|line| snip_line(line, 0))
		.collect();

	let context_line = Some(snip_line(lines[fault_idx], colno.unwrap_or(0) as usize));

	let post_start = (fault_idx + 1).min(max_lines);
	let post_end = (fault_idx + 1 + context_lines).min(max_lines);
	let post_context = lines[post_start..post_end]
		.iter()
		.map(|line| snip_line(line, 0))
		.collect();

	SourceContext {
		pre_context,
		context_line,
		post_context,
	}
}

/// Fill the context fields of `frame` from the lines of its source file.
///
/// Frames without a known line are left untouched.
pub fn apply_context(frame: &mut Frame, lines: &[&str], context_lines: usize) {
	if known_line(frame.lineno).is_none() {
		return;
	}
	let context = extract_context(lines, frame.lineno, frame.colno, context_lines);
	frame.pre_context = Some(context.pre_context);
	frame.context_line = context.context_line;
	frame.post_context = Some(context.post_context);
}

fn known_line(lineno: Option<u32>) -> Option<u32> {
	lineno.filter(|&line| line > 0)
}
