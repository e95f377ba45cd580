// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack processing for JavaScript errors captured by Loom crash reporting.
//!
//! This crate turns an `Error`-like object into an [`EventRecord`]:
//! - Extracting engine call sites from the error (V8 `stack` strings or
//!   host-supplied call sites)
//! - Normalizing them into frames with function names, module names and an
//!   in-app flag
//! - Attaching source context to in-app frames
//! - Assembling the summary message, exception and extra properties
//!
//! Processing never fails. Anything that cannot be determined is replaced by
//! a placeholder and reported as a [`Degradation`].
//!
//! # Example
//!
//! ```no_run
//! use loom_crash_stack::{ErrorObject, StackConfig, StackProcessor};
//!
//! # async fn run() {
//! let config = StackConfig::default().with_base_dir("/srv/app");
//! let processor = StackProcessor::new(config);
//!
//! let error = ErrorObject::new()
//!     .with_name("TypeError")
//!     .with_message("x is not a function")
//!     .with_stack("TypeError: x is not a function\n    at main (/srv/app/index.js:3:5)");
//!
//! let event = processor.process(&error).await;
//! assert_eq!(event.message, "TypeError: x is not a function");
//! # }
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod error_object;
pub mod extract;
pub mod module_name;
pub mod normalize;
pub mod processor;

pub use assemble::{assemble, GENERIC_ERROR_TYPE, NO_MESSAGE};
pub use config::{StackConfig, StackConfigLayer, DEFAULT_CAPTURE_MARKERS};
pub use error::{Result, StackError};
pub use error_object::{ErrorObject, PropertyValue, RESERVED_PROPERTIES};
pub use extract::{parse_v8_stack, StackExtractor, V8StackExtractor};
pub use module_name::module_name;
pub use normalize::{function_name, normalize_frame, InAppHeuristic};
pub use processor::{event_from_error, StackProcessor};

pub use loom_crash_core::{Degradation, EventRecord, Frame, Outcome, RawStackEntry};
