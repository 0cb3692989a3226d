// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON export for stratum display-list dumps.
//!
//! This crate provides [`DumpSink`](stratum_core::dump::DumpSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable indented one-line-per-op
//!   output.
//! - [`json::JsonSink`] — structured JSON array output for tooling.

pub mod json;
pub mod pretty;
