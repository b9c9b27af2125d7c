// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding trace events to the [`log`] facade.
//!
//! Hosts that already run a logger (`env_logger`, `android_logger`, ...) can
//! install [`LogSink`] to get backdrop diagnostics alongside their own.
//! Skipped frames log at `warn`; recomputed transforms at `debug`; the
//! per-frame chatter (cached transforms, blits, publishes) at `trace`.

use backdrop_core::trace::{
    BlitEvent, DrawFailedEvent, FramePublishedEvent, StackSummary, TraceSink, TransformEvent,
};
use log::Level;

/// Default log target.
pub const TARGET: &str = "backdrop";

/// A [`TraceSink`] that emits [`log`] records.
#[derive(Clone, Copy, Debug)]
pub struct LogSink {
    target: &'static str,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    /// Creates a sink logging under [`TARGET`].
    #[must_use]
    pub const fn new() -> Self {
        Self { target: TARGET }
    }

    /// Creates a sink logging under a custom target.
    #[must_use]
    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl TraceSink for LogSink {
    fn on_transform(&mut self, e: &TransformEvent) {
        let level = if e.reused { Level::Trace } else { Level::Debug };
        log::log!(
            target: self.target,
            level,
            "transform {:?} -> {:?}: {:?}{}",
            e.source,
            e.surface,
            e.transform.as_coeffs(),
            if e.reused { " (cached)" } else { "" },
        );
    }

    fn on_blit(&mut self, e: &BlitEvent) {
        log::trace!(target: self.target, "blit {:?} onto {:?}", e.source, e.surface);
    }

    fn on_draw_failed(&mut self, e: &DrawFailedEvent) {
        match e.layer {
            Some(index) => {
                log::warn!(target: self.target, "layer {index} skipped: {}", e.error);
            }
            None => log::warn!(target: self.target, "draw skipped: {}", e.error),
        }
    }

    fn on_stack_summary(&mut self, s: &StackSummary) {
        let level = if s.failed > 0 {
            Level::Debug
        } else {
            Level::Trace
        };
        log::log!(
            target: self.target,
            level,
            "stack drew {}/{} layers ({} failed)",
            s.drawn,
            s.layers,
            s.failed,
        );
    }

    fn on_frame_published(&mut self, e: &FramePublishedEvent) {
        log::trace!(target: self.target, "frame {} published ({:?})", e.generation, e.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::error::DrawError;
    use backdrop_core::surface::SurfaceUnavailable;
    use log::{LevelFilter, Log, Metadata, Record};
    use std::sync::{Mutex, Once};

    struct Capture;

    static RECORDS: Mutex<Vec<(Level, String, String)>> = Mutex::new(Vec::new());
    static INIT: Once = Once::new();

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            RECORDS.lock().unwrap().push((
                record.level(),
                record.target().to_owned(),
                record.args().to_string(),
            ));
        }

        fn flush(&self) {}
    }

    fn install() {
        INIT.call_once(|| {
            log::set_logger(&Capture).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
    }

    #[test]
    fn failures_log_at_warn_with_target() {
        install();
        let mut sink = LogSink::with_target("backdrop-test-warn");
        sink.on_draw_failed(&DrawFailedEvent {
            layer: Some(2),
            error: DrawError::SurfaceUnavailable(SurfaceUnavailable::Lost),
        });
        let records = RECORDS.lock().unwrap();
        let (level, _, message) = records
            .iter()
            .find(|(_, target, _)| target == "backdrop-test-warn")
            .expect("record should be captured");
        assert_eq!(*level, Level::Warn);
        assert!(message.contains("layer 2 skipped"), "got: {message}");
        assert!(message.contains("backing store was lost"), "got: {message}");
    }

    #[test]
    fn clean_summary_logs_at_trace() {
        install();
        let mut sink = LogSink::with_target("backdrop-test-summary");
        sink.on_stack_summary(&StackSummary {
            layers: 2,
            drawn: 2,
            failed: 0,
        });
        let records = RECORDS.lock().unwrap();
        let (level, _, message) = records
            .iter()
            .find(|(_, target, _)| target == "backdrop-test-summary")
            .expect("record should be captured");
        assert_eq!(*level, Level::Trace);
        assert_eq!(message, "stack drew 2/2 layers (0 failed)");
    }
}
