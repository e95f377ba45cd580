// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Module names derived from source file paths.

/// Derive a module name for `filename`.
///
/// - Files under a dependency directory are named by the path after the
///   innermost dependency segment: `/app/node_modules/pkg/sub/bar.js` is
///   `pkg.sub:bar`.
/// - Files under `base_dir` are named by their path relative to it:
///   `/app/lib/foo.js` is `lib:foo`, `/app/index.js` is `index`.
/// - Anything else is just the file stem.
///
/// Backslashes are treated as path separators.
pub fn module_name(filename: &str, base_dir: &str, dependency_dir: &str) -> String {
	let filename = filename.replace('\\', "/");
	let (dir, file) = filename.rsplit_once('/').unwrap_or(("", filename.as_str()));
	let stem = file_stem(file);

	let marker = format!("/{dependency_dir}/");
	if let Some(idx) = dir.rfind(&marker) {
		let package = dir[idx + marker.len()..].replace('/', ".");
		return format!("{package}:{stem}");
	}

	let mut base = base_dir.replace('\\', "/");
	if !base.ends_with('/') {
		base.push('/');
	}

	let dir_with_slash = format!("{dir}/");
	if let Some(relative) = dir_with_slash.strip_prefix(&base) {
		let relative = relative.strip_suffix('/').unwrap_or(relative);
		if relative.is_empty() {
			return stem.to_string();
		}
		return format!("{}:{stem}", relative.replace('/', "."));
	}

	stem.to_string()
}

/// Strip the last extension. Dotfiles keep their name.
fn file_stem(file: &str) -> &str {
	match file.rsplit_once('.') {
		Some((stem, _)) if !stem.is_empty() => stem,
		_ => file,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const BASE: &str = "/app/";
	const DEPS: &str = "node_modules";

	#[test]
	fn file_in_base_is_stem() {
		assert_eq!(module_name("/app/index.js", BASE, DEPS), "index");
	}

	#[test]
	fn file_below_base_joins_relative_dir() {
		assert_eq!(module_name("/app/lib/foo.js", BASE, DEPS), "lib:foo");
		assert_eq!(module_name("/app/lib/util/foo.mjs", BASE, DEPS), "lib.util:foo");
	}

	#[test]
	fn dependency_uses_innermost_package_path() {
		assert_eq!(
			module_name("/app/node_modules/pkg/sub/bar.js", BASE, DEPS),
			"pkg.sub:bar"
		);
		assert_eq!(
			module_name("/app/node_modules/a/node_modules/b/lib/c.js", BASE, DEPS),
			"b.lib:c"
		);
	}

	#[test]
	fn dependency_wins_over_base() {
		assert_eq!(
			module_name("/elsewhere/node_modules/pkg/x.js", BASE, DEPS),
			"pkg:x"
		);
	}

	#[test]
	fn outside_base_is_stem() {
		assert_eq!(module_name("/usr/lib/node/thing.js", BASE, DEPS), "thing");
	}

	#[test]
	fn base_without_trailing_separator() {
		assert_eq!(module_name("/app/lib/foo.js", "/app", DEPS), "lib:foo");
	}

	#[test]
	fn sibling_directory_sharing_prefix_is_outside_base() {
		assert_eq!(module_name("/application/foo.js", BASE, DEPS), "foo");
	}

	#[test]
	fn windows_paths() {
		assert_eq!(
			module_name("C:\\app\\lib\\foo.js", "C:\\app\\", DEPS),
			"lib:foo"
		);
		assert_eq!(
			module_name("C:\\app\\node_modules\\pkg\\bar.js", "C:\\app\\", DEPS),
			"pkg:bar"
		);
	}

	#[test]
	fn stems() {
		assert_eq!(module_name("/app/foo.test.js", BASE, DEPS), "foo.test");
		assert_eq!(module_name("/app/Makefile", BASE, DEPS), "Makefile");
		assert_eq!(module_name("/app/.eslintrc", BASE, DEPS), ".eslintrc");
		assert_eq!(module_name("bare.js", BASE, DEPS), "bare");
	}

	#[test]
	fn custom_dependency_dir() {
		assert_eq!(
			module_name("/app/vendor/pkg/x.js", BASE, "vendor"),
			"pkg:x"
		);
	}

	proptest! {
		#[test]
		fn never_panics_and_never_contains_separators(path in "[a-z/\\\\.:]{0,40}") {
			let name = module_name(&path, BASE, DEPS);
			prop_assert!(!name.contains('/'));
			prop_assert!(!name.contains('\\'));
		}
	}
}
