// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded truncation of long source lines.

/// Lines up to this many characters are kept whole.
pub const MAX_LINE_LENGTH: usize = 150;
/// Marker placed where text was cut.
pub const SNIP_MARKER: &str = "{snip}";

const WINDOW: usize = 140;
const LEAD: usize = 60;
const EDGE_SLACK: usize = 5;

/// Cut `line` down to a window around `colno`.
///
/// Counts characters, not bytes.
pub fn snip_line(line: &str, colno: usize) -> String {
	let len = line.chars().count();
	if len <= MAX_LINE_LENGTH {
		return line.to_string();
	}

	let colno = colno.min(len);
	let mut start = colno.saturating_sub(LEAD);
	if start < EDGE_SLACK {
		start = 0;
	}

	let mut end = (start + WINDOW).min(len);
	if end > len - EDGE_SLACK {
		end = len;
	}
	if end == len {
		start = end.saturating_sub(WINDOW);
	}

	let window: String = line.chars().skip(start).take(end - start).collect();

	let mut snipped = String::with_capacity(window.len() + 2 * (SNIP_MARKER.len() + 1));
	if start > 0 {
		snipped.push_str(SNIP_MARKER);
		snipped.push(' ');
	}
	snipped.push_str(&window);
	if end < len {
		snipped.push(' ');
		snipped.push_str(SNIP_MARKER);
	}
	snipped
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn numbered_line(len: usize) -> String {
		(0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect()
	}

	#[test]
	fn short_lines_are_untouched() {
		assert_eq!(snip_line("const a = 1;", 5), "const a = 1;");
		let exact = numbered_line(MAX_LINE_LENGTH);
		assert_eq!(snip_line(&exact, 0), exact);
	}

	#[test]
	fn snips_tail_when_column_at_start() {
		let line = numbered_line(400);
		let snipped = snip_line(&line, 0);

		assert!(!snipped.starts_with(SNIP_MARKER));
		assert!(snipped.ends_with(" {snip}"));
		assert_eq!(&snipped[..WINDOW], &line[..WINDOW]);
	}

	#[test]
	fn snips_head_when_column_at_end() {
		let line = numbered_line(400);
		let snipped = snip_line(&line, 400);

		assert!(snipped.starts_with("{snip} "));
		assert!(!snipped.ends_with(SNIP_MARKER));
		assert!(snipped.ends_with(&line[400 - WINDOW..]));
	}

	#[test]
	fn snips_both_sides_around_middle_column() {
		let line = numbered_line(400);
		let snipped = snip_line(&line, 200);

		let expected = format!("{{snip}} {} {{snip}}", &line[140..280]);
		assert_eq!(snipped, expected);
	}

	#[test]
	fn column_past_end_is_clamped() {
		let line = numbered_line(300);
		assert_eq!(snip_line(&line, 10_000), snip_line(&line, 300));
	}

	#[test]
	fn multibyte_lines_do_not_split_characters() {
		let line = "é".repeat(300);
		let snipped = snip_line(&line, 150);
		assert!(snipped.contains(SNIP_MARKER));
		assert!(snipped.chars().filter(|c| *c == 'é').count() <= WINDOW);
	}

	proptest! {
		#[test]
		fn snipped_length_is_bounded(line in "\\PC{0,600}", col in 0usize..800) {
			let snipped = snip_line(&line, col);
			let markers = 2 * (SNIP_MARKER.len() + 1);
			prop_assert!(snipped.chars().count() <= MAX_LINE_LENGTH.max(WINDOW + markers));
		}
	}
}
