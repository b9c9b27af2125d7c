// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use backdrop_core::trace::{
    BlitEvent, DrawFailedEvent, FramePublishedEvent, StackSummary, TraceSink, TransformEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transform(&mut self, e: &TransformEvent) {
        let [a, b, c, d, tx, ty] = e.transform.as_coeffs();
        let _ = writeln!(
            self.writer,
            "[transform] {}x{} -> {}x{} [{a:.3} {b:.3} {c:.3} {d:.3} {tx:.1} {ty:.1}]{}",
            e.source.width,
            e.source.height,
            e.surface.width,
            e.surface.height,
            if e.reused { " (cached)" } else { "" },
        );
    }

    fn on_blit(&mut self, e: &BlitEvent) {
        let _ = writeln!(
            self.writer,
            "[blit] {}x{} onto {}x{}",
            e.source.width, e.source.height, e.surface.width, e.surface.height,
        );
    }

    fn on_draw_failed(&mut self, e: &DrawFailedEvent) {
        let layer = e
            .layer
            .map_or_else(|| "-".to_owned(), |index| index.to_string());
        let _ = writeln!(self.writer, "[failed] layer={layer} {}", e.error);
    }

    fn on_stack_summary(&mut self, s: &StackSummary) {
        let _ = writeln!(
            self.writer,
            "[stack] layers={} drawn={} failed={}",
            s.layers, s.drawn, s.failed,
        );
    }

    fn on_frame_published(&mut self, e: &FramePublishedEvent) {
        let _ = writeln!(
            self.writer,
            "[publish] gen={} {}x{}",
            e.generation, e.size.width, e.size.height,
        );
    }
}
