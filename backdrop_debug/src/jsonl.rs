// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace recording.
//!
//! [`JsonLinesSink`] writes one self-describing JSON object per event, one
//! object per line, so recordings can be grepped, streamed, or loaded with
//! any JSON tooling.

use std::io::{self, Write};

use serde_json::{Value, json};

use backdrop_core::trace::{
    BlitEvent, DrawFailedEvent, FramePublishedEvent, StackSummary, TraceSink, TransformEvent,
};

/// Writes trace events as newline-delimited JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    sequence: u64,
    error: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("sequence", &self.sequence)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sequence: 0,
            error: None,
        }
    }

    /// Number of events written.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.sequence
    }

    /// Returns `true` if no events were written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence == 0
    }

    /// Flushes the writer and returns it, or the first write error seen.
    ///
    /// Trace hooks cannot fail, so write errors are held until here. After
    /// the first error no further events are written.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn emit(&mut self, kind: &str, payload: Value) {
        if self.error.is_some() {
            return;
        }
        let line = json!({
            "seq": self.sequence,
            "event": kind,
            "data": payload,
        });
        let result = serde_json::to_writer(&mut self.writer, &line)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => self.sequence += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_transform(&mut self, e: &TransformEvent) {
        self.emit(
            "transform",
            json!({
                "source": [e.source.width, e.source.height],
                "surface": [e.surface.width, e.surface.height],
                "coeffs": e.transform.as_coeffs(),
                "reused": e.reused,
            }),
        );
    }

    fn on_blit(&mut self, e: &BlitEvent) {
        self.emit(
            "blit",
            json!({
                "source": [e.source.width, e.source.height],
                "surface": [e.surface.width, e.surface.height],
            }),
        );
    }

    fn on_draw_failed(&mut self, e: &DrawFailedEvent) {
        self.emit(
            "draw_failed",
            json!({
                "layer": e.layer,
                "error": e.error.to_string(),
            }),
        );
    }

    fn on_stack_summary(&mut self, s: &StackSummary) {
        self.emit(
            "stack_summary",
            json!({
                "layers": s.layers,
                "drawn": s.drawn,
                "failed": s.failed,
            }),
        );
    }

    fn on_frame_published(&mut self, e: &FramePublishedEvent) {
        self.emit(
            "frame_published",
            json!({
                "generation": e.generation,
                "size": [e.size.width, e.size.height],
            }),
        );
    }
}
