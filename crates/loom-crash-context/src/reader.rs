// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source file access.

use async_trait::async_trait;

use crate::error::{ContextError, Result};

/// Reads the text of a source file referenced by a frame.
///
/// Implementations return [`ContextError::AccessForbidden`] when the
/// environment refuses file access altogether; any other error only affects
/// the file being read.
#[async_trait]
pub trait SourceReader: Send + Sync {
	async fn read_source(&self, path: &str) -> Result<String>;
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

#[async_trait]
impl SourceReader for FsSourceReader {
	/// Invalid UTF-8 is replaced rather than failing the whole file.
	async fn read_source(&self, path: &str) -> Result<String> {
		let bytes = tokio::fs::read(path)
			.await
			.map_err(|e| ContextError::from_io(path, e))?;
		Ok(String::from_utf8_lossy(&bytes).into_owned())
	}
}

#[async_trait]
impl<R: SourceReader + ?Sized> SourceReader for std::sync::Arc<R> {
	async fn read_source(&self, path: &str) -> Result<String> {
		(**self).read_source(path).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[tokio::test]
	async fn reads_existing_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "module.exports = 1;").unwrap();
		let path = file.path().to_str().unwrap().to_string();

		let content = FsSourceReader.read_source(&path).await.unwrap();
		assert_eq!(content, "module.exports = 1;\n");
	}

	#[tokio::test]
	async fn missing_file_is_not_found() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.js");

		let err = FsSourceReader
			.read_source(path.to_str().unwrap())
			.await
			.unwrap_err();
		assert!(matches!(err, ContextError::NotFound(_)));
		assert!(!err.is_fatal());
	}

	#[tokio::test]
	async fn non_utf8_bytes_are_replaced() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"// caf\xe9\nmain();\n").unwrap();
		let path = file.path().to_str().unwrap().to_string();

		let content = FsSourceReader.read_source(&path).await.unwrap();
		assert_eq!(content, "// caf\u{fffd}\nmain();\n");
	}
}
