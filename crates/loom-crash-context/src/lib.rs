// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source context extraction for Loom crash stack frames.
//!
//! This crate provides functionality for:
//! - Reading the source files referenced by in-app frames, deduplicated and
//!   concurrently, with per-file failures tolerated
//! - Extracting the lines around a fault position
//! - Snipping very long (usually minified) lines around a target column
//!
//! # Example
//!
//! ```no_run
//! use loom_crash_context::{ContextEnricher, ContextOptions, FsSourceReader};
//! use loom_crash_core::Frame;
//!
//! # async fn run() {
//! let enricher = ContextEnricher::new(FsSourceReader, ContextOptions::default());
//!
//! let frames = vec![Frame {
//!     filename: Some("/app/lib/server.js".to_string()),
//!     lineno: Some(42),
//!     colno: Some(7),
//!     in_app: true,
//!     ..Frame::default()
//! }];
//!
//! let frames = enricher.enrich(frames).await.into_inner();
//! # }
//! ```

pub mod cache;
pub mod enrich;
pub mod error;
pub mod lines;
pub mod reader;
pub mod snip;

pub use cache::SourceFileCache;
pub use enrich::{ContextEnricher, ContextOptions, DEFAULT_READ_CONCURRENCY, LINES_OF_CONTEXT};
pub use error::{ContextError, Result};
pub use lines::{apply_context, extract_context, source_lines, SourceContext};
pub use reader::{FsSourceReader, SourceReader};
pub use snip::{snip_line, MAX_LINE_LENGTH, SNIP_MARKER};
