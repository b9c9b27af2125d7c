// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, log forwarding, and JSON-lines recording for backdrop
//! diagnostics.
//!
//! This crate provides [`TraceSink`](backdrop_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`log_sink::LogSink`] — forwards events to the [`log`] facade, failures
//!   at `warn`, everything else at `debug`/`trace`.
//! - [`jsonl::JsonLinesSink`] — one JSON object per event, for offline
//!   analysis.

pub mod jsonl;
pub mod log_sink;
pub mod pretty;
