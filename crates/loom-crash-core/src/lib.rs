// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom crash stack processing.
//!
//! This crate provides the shared data model used when turning a captured
//! runtime error into an event record. It is used by both the source context
//! enricher (`loom-crash-context`) and the stack pipeline (`loom-crash-stack`).
//!
//! # Overview
//!
//! - [`RawStackEntry`]: one engine-reported call site, innermost first
//! - [`Frame`]: a normalized frame with location, module and in-app flag
//! - [`ExceptionRecord`] and [`EventRecord`]: the output handed to transport
//! - [`Outcome`]: a value tagged with the degradations that produced it

pub mod error;
pub mod event;
pub mod outcome;
pub mod raw;

pub use error::{CrashError, Result};
pub use event::{EventRecord, ExceptionRecord, Frame, Stacktrace, ANONYMOUS_FUNCTION};
pub use outcome::{Degradation, Outcome};
pub use raw::{NameLookup, RawStackEntry};
