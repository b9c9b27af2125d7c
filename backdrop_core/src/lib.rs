// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform-and-blit core for camera-frame background layers.
//!
//! `backdrop_core` paints a captured camera frame as the background of a
//! live-preview overlay, scaled and positioned so that it lines up with the
//! graphics drawn on top of it (for example a pose-detection skeleton). It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! Each display refresh, the host hands the overlay a drawable surface and the
//! latest captured frame:
//!
//! ```text
//!   capture thread ──► FrameSlot::publish(SourceImage)
//!                              │
//!                              ▼
//!   host refresh ──► OverlayStack::draw(surface)
//!                              │  back-to-front
//!                              ▼
//!          CameraBackground ──► FrameTransformBlitter::draw()
//!                                      │
//!                 TransformProvider ◄──┤ (source size, surface geometry)
//!                                      ▼
//!                               Surface::blit(image, affine)
//! ```
//!
//! **[`blitter`]** — [`FrameTransformBlitter`](blitter::FrameTransformBlitter)
//! validates the frame, obtains the transform (cached per geometry), and
//! issues exactly one blit.
//!
//! **[`provider`]** — The [`TransformProvider`](provider::TransformProvider)
//! seam and [`FitTransform`](provider::FitTransform), which fits source pixel
//! space into surface space under an explicit [`FitPolicy`](provider::FitPolicy)
//! with optional mirroring.
//!
//! **[`transform`]** — Transform parameters and corner mapping on top of
//! [`kurbo::Affine`].
//!
//! **[`geometry`]** — Image and surface sizes plus capture metadata
//! (rotation, lens facing).
//!
//! **[`image`]** — Immutable, cheaply clonable RGBA8 frames.
//!
//! **[`surface`]** — The host [`Surface`](surface::Surface) contract.
//!
//! **[`pixmap`]** — A CPU [`Pixmap`](pixmap::Pixmap) surface.
//!
//! **[`layer`]** — The [`OverlayLayer`](layer::OverlayLayer) trait, the
//! camera background layer, and the ordered [`OverlayStack`](layer::OverlayStack).
//!
//! **[`slot`]** — Cross-thread frame hand-off (requires `std`).
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types with
//! the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies and
//!   the [`slot`] module.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod blitter;
pub mod error;
pub mod geometry;
pub mod image;
pub mod layer;
pub mod pixmap;
pub mod provider;
#[cfg(feature = "std")]
pub mod slot;
pub mod surface;
pub mod trace;
pub mod transform;
