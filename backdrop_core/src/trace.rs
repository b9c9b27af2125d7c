// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for draw passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! blitter, the overlay stack, and the frame slot call as they work. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.

use kurbo::Affine;

use crate::error::DrawError;
use crate::geometry::{ImageSize, SurfaceGeometry};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the blitter settles on a transform for a draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformEvent {
    /// Source image size.
    pub source: ImageSize,
    /// Target surface size.
    pub surface: SurfaceGeometry,
    /// The source-to-surface transform.
    pub transform: Affine,
    /// `true` if the cached transform was reused instead of recomputed.
    pub reused: bool,
}

/// Emitted after a successful blit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitEvent {
    /// Source image size.
    pub source: ImageSize,
    /// Target surface size.
    pub surface: SurfaceGeometry,
}

/// Emitted when a draw is rejected or the surface fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawFailedEvent {
    /// Position of the failing layer in its stack, if drawn through one.
    pub layer: Option<usize>,
    /// What went wrong.
    pub error: DrawError,
}

/// Emitted once per [`OverlayStack::draw`](crate::layer::OverlayStack::draw).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackSummary {
    /// Layers in the stack.
    pub layers: usize,
    /// Layers that drew successfully.
    pub drawn: usize,
    /// Layers whose draw failed and were skipped.
    pub failed: usize,
}

/// Emitted when a capture thread publishes a new frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePublishedEvent {
    /// Generation number of the new frame (starts at 1).
    pub generation: u64,
    /// Size of the published frame.
    pub size: ImageSize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from draw passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a transform is chosen for a draw.
    fn on_transform(&mut self, e: &TransformEvent) {
        _ = e;
    }

    /// Called after a successful blit.
    fn on_blit(&mut self, e: &BlitEvent) {
        _ = e;
    }

    /// Called when a draw fails.
    fn on_draw_failed(&mut self, e: &DrawFailedEvent) {
        _ = e;
    }

    /// Called after an overlay stack finished a pass.
    fn on_stack_summary(&mut self, s: &StackSummary) {
        _ = s;
    }

    /// Called when a frame is published for hand-off.
    fn on_frame_published(&mut self, e: &FramePublishedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransformEvent`].
    #[inline]
    pub fn transform(&mut self, e: &TransformEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transform(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BlitEvent`].
    #[inline]
    pub fn blit(&mut self, e: &BlitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_blit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawFailedEvent`].
    #[inline]
    pub fn draw_failed(&mut self, e: &DrawFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StackSummary`].
    #[inline]
    pub fn stack_summary(&mut self, s: &StackSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_stack_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`FramePublishedEvent`].
    #[inline]
    pub fn frame_published(&mut self, e: &FramePublishedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_published(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
