// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded drawing-operation model and two-pass execution.
//!
//! `stratum_core` stores canvas operations (transform changes, clips, and
//! draw calls) in an index-addressed, allocation-once list, and later
//! executes them in one of two modes: an immediate *replay* that issues each
//! operation directly to a renderer, or a *defer* pass that applies state
//! operations live while handing draw operations to a batching buffer for
//! out-of-order flush. It is `no_std` compatible (with `alloc`) and owns no
//! rendering resources; paths, bitmaps, shaders, and nested lists are opaque
//! handles resolved by the renderer.
//!
//! # Architecture
//!
//! ```text
//!   caller records ──► DisplayList (Vec-backed op arena, OpId handles)
//!                           │
//!            ┌──────────────┴───────────────┐
//!            ▼                              ▼
//!   replay(ReplayContext)          defer(DeferContext)
//!     ops issued in order            state ops applied live,
//!     to the Renderer,               draw ops handed by reference
//!     DrawStatus accumulated         to a DeferTarget for batched flush
//! ```
//!
//! **[`op`]** — The closed [`Op`](op::Op) sum type: state operations
//! (transform, clip, save/restore, shader/filter/shadow setup) and draw
//! operations with local bounds, quick-reject flags, and batch
//! classification.
//!
//! **[`list`]** — [`DisplayList`](list::DisplayList), the arena that owns
//! every recorded operation by value, plus the record, replace-in-place,
//! and two-pass driver APIs.
//!
//! **[`pass`]** — [`ReplayContext`](pass::ReplayContext) and
//! [`DeferContext`](pass::DeferContext), which thread the renderer, replay
//! flags, dirty rectangle, and root save-count baseline through a pass, and
//! the [`DeferTarget`](pass::DeferTarget) contract for the batching buffer.
//!
//! **[`renderer`]** — The [`Renderer`](renderer::Renderer) capability trait
//! that backends implement, and the [`DrawStatus`](renderer::DrawStatus)
//! bitmask draws report.
//!
//! **[`batch`]** — [`BatchId`](batch::BatchId), the classification that
//! decides which draw operations may be reordered past each other.
//!
//! **[`paint`]** — The paint descriptor read by draws and by batch
//! classification.
//!
//! **[`resource`]** — Opaque handles for externally owned resources.
//!
//! **[`dump`]** — [`DumpSink`](dump::DumpSink) trait for diagnostic output
//! of a recorded list.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod batch;
pub mod dump;
pub mod list;
pub mod op;
pub mod paint;
pub mod pass;
pub mod renderer;
pub mod resource;
