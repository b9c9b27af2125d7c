// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame hand-off from the capture thread to the render thread.
//!
//! Captured frames are immutable [`SourceImage`]s, so handing one over is a
//! matter of swapping which frame is current. [`FrameSlot`] holds the latest
//! frame behind a short critical section; readers get their own clone (an
//! Arc bump) and draw from it without holding any lock. A reader can never
//! observe a partially written frame.

use core::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::image::SourceImage;
use crate::trace::{FramePublishedEvent, Tracer};

/// Latest-frame mailbox shared between a producer and a renderer.
///
/// Share it with `Arc<FrameSlot>`. Publishing replaces any frame the renderer
/// has not picked up yet; there is no queue.
#[derive(Debug, Default)]
pub struct FrameSlot {
    current: Mutex<Option<SourceImage>>,
    generation: AtomicU64,
}

impl FrameSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `image` the current frame and returns its generation.
    pub fn publish(&self, image: SourceImage) -> u64 {
        self.publish_traced(image, &mut Tracer::none())
    }

    /// Like [`publish`](Self::publish), reporting to `tracer`.
    pub fn publish_traced(&self, image: SourceImage, tracer: &mut Tracer<'_>) -> u64 {
        let size = image.size();
        let generation = {
            let mut current = self.current.lock();
            *current = Some(image);
            // Bumped under the lock so generation and frame never disagree.
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };
        tracer.frame_published(&FramePublishedEvent { generation, size });
        generation
    }

    /// Snapshot of the current frame, if one was published.
    #[must_use]
    pub fn latest(&self) -> Option<SourceImage> {
        self.current.lock().clone()
    }

    /// The current frame and its generation, if newer than `seen`.
    ///
    /// Pass `0` to accept any published frame.
    #[must_use]
    pub fn latest_since(&self, seen: u64) -> Option<(u64, SourceImage)> {
        let current = self.current.lock();
        let generation = self.generation.load(Ordering::Acquire);
        if generation <= seen {
            return None;
        }
        current.clone().map(|image| (generation, image))
    }

    /// Number of frames published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
