// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay layers and the ordered layer stack.
//!
//! An overlay is a stack of [`OverlayLayer`]s drawn back-to-front onto one
//! host surface each refresh. The camera frame is the bottom layer
//! ([`CameraBackground`]); detection graphics such as skeletons go on top.
//! The stack, not the layers, owns the ordering.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::blitter::FrameTransformBlitter;
use crate::error::DrawError;
use crate::image::SourceImage;
use crate::provider::TransformProvider;
use crate::surface::Surface;
use crate::trace::{DrawFailedEvent, StackSummary, Tracer};

/// One drawable unit in an [`OverlayStack`].
pub trait OverlayLayer {
    /// Draws this layer onto `surface`.
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DrawError>;

    /// Like [`draw`](Self::draw), reporting events to `tracer`.
    ///
    /// The default ignores the tracer.
    fn draw_traced(
        &mut self,
        surface: &mut dyn Surface,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), DrawError> {
        _ = tracer;
        self.draw(surface)
    }
}

/// Paints the current camera frame as the overlay background.
///
/// The layer shares ownership of its frame for as long as it exists; use
/// [`set_image`](Self::set_image) to move to the next frame.
#[derive(Clone, Debug)]
pub struct CameraBackground<P> {
    image: SourceImage,
    blitter: FrameTransformBlitter<P>,
}

impl<P: TransformProvider> CameraBackground<P> {
    /// Creates a background layer showing `image`.
    #[must_use]
    pub fn new(provider: P, image: SourceImage) -> Self {
        Self::with_blitter(FrameTransformBlitter::new(provider), image)
    }

    /// Creates a background layer around a configured blitter.
    #[must_use]
    pub fn with_blitter(blitter: FrameTransformBlitter<P>, image: SourceImage) -> Self {
        Self { image, blitter }
    }

    /// The frame currently shown.
    #[must_use]
    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// Replaces the frame, returning the previous one.
    pub fn set_image(&mut self, image: SourceImage) -> SourceImage {
        core::mem::replace(&mut self.image, image)
    }

    /// The underlying blitter.
    #[must_use]
    pub fn blitter(&self) -> &FrameTransformBlitter<P> {
        &self.blitter
    }

    /// Mutable access to the underlying blitter.
    pub fn blitter_mut(&mut self) -> &mut FrameTransformBlitter<P> {
        &mut self.blitter
    }
}

impl<P: TransformProvider> OverlayLayer for CameraBackground<P> {
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        self.blitter.draw(surface, &self.image)
    }

    fn draw_traced(
        &mut self,
        surface: &mut dyn Surface,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), DrawError> {
        self.blitter.draw_traced(surface, &self.image, tracer)
    }
}

/// Outcome of one [`OverlayStack::draw`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Layers that drew successfully.
    pub drawn: usize,
    /// Stack position and error of every layer that failed.
    pub failed: Vec<(usize, DrawError)>,
}

impl DrawReport {
    /// Returns `true` if every layer drew.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// An ordered stack of overlay layers, drawn back-to-front.
#[derive(Default)]
pub struct OverlayStack {
    layers: Vec<Box<dyn OverlayLayer>>,
}

impl fmt::Debug for OverlayStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayStack")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl OverlayStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer on top of the existing ones.
    pub fn push(&mut self, layer: impl OverlayLayer + 'static) {
        self.layers.push(Box::new(layer));
    }

    /// Adds a layer beneath all existing ones.
    pub fn insert_background(&mut self, layer: impl OverlayLayer + 'static) {
        self.layers.insert(0, Box::new(layer));
    }

    /// Removes all layers.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Draws every layer, bottom first.
    ///
    /// A failing layer is skipped and recorded; the layers above it still
    /// draw.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> DrawReport {
        self.draw_traced(surface, &mut Tracer::none())
    }

    /// Like [`draw`](Self::draw), reporting layer events, failures, and a
    /// summary to `tracer`.
    pub fn draw_traced(
        &mut self,
        surface: &mut dyn Surface,
        tracer: &mut Tracer<'_>,
    ) -> DrawReport {
        let mut report = DrawReport::default();
        for (index, layer) in self.layers.iter_mut().enumerate() {
            match layer.draw_traced(surface, tracer) {
                Ok(()) => report.drawn += 1,
                Err(error) => {
                    tracer.draw_failed(&DrawFailedEvent {
                        layer: Some(index),
                        error,
                    });
                    report.failed.push((index, error));
                }
            }
        }
        tracer.stack_summary(&StackSummary {
            layers: self.layers.len(),
            drawn: report.drawn,
            failed: report.failed.len(),
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ImageSize, SurfaceGeometry};
    use crate::image::Rgba8;
    use crate::pixmap::Pixmap;
    use crate::provider::{FitPolicy, FitTransform};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Affine;

    /// Appends its tag to a shared log when drawn.
    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: Option<DrawError>,
    }

    impl OverlayLayer for Tagged {
        fn draw(&mut self, _: &mut dyn Surface) -> Result<(), DrawError> {
            self.log.borrow_mut().push(self.tag);
            self.fail.map_or(Ok(()), Err)
        }
    }

    /// Paints a small solid square at a fixed position.
    struct Marker {
        at: (f64, f64),
        image: SourceImage,
    }

    impl OverlayLayer for Marker {
        fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DrawError> {
            surface.ensure_drawable()?;
            surface.blit(&self.image, Affine::translate(self.at))?;
            Ok(())
        }
    }

    fn tagged(tag: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Tagged {
        Tagged {
            tag,
            log: Rc::clone(log),
            fail: None,
        }
    }

    #[test]
    fn layers_draw_back_to_front() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = OverlayStack::new();
        stack.push(tagged("skeleton", &log));
        stack.push(tagged("labels", &log));
        stack.insert_background(tagged("camera", &log));
        assert_eq!(stack.len(), 3);

        let report = stack.draw(&mut Pixmap::new(4, 4));
        assert!(report.is_clean());
        assert_eq!(report.drawn, 3);
        assert_eq!(*log.borrow(), vec!["camera", "skeleton", "labels"]);
    }

    #[test]
    fn failing_layer_is_skipped_and_reported() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = OverlayStack::new();
        stack.push(Tagged {
            fail: Some(DrawError::InvalidTransform),
            ..tagged("broken", &log)
        });
        stack.push(tagged("on-top", &log));

        let report = stack.draw(&mut Pixmap::new(4, 4));
        assert_eq!(report.drawn, 1);
        assert_eq!(report.failed, vec![(0, DrawError::InvalidTransform)]);
        assert_eq!(*log.borrow(), vec!["broken", "on-top"]);
    }

    #[test]
    fn background_is_painted_under_marker() {
        let frame = SourceImage::filled(4, 4, Rgba8::opaque(0, 0, 255)).unwrap();
        let mut stack = OverlayStack::new();
        stack.push(Marker {
            at: (2.0, 2.0),
            image: SourceImage::filled(1, 1, Rgba8::WHITE).unwrap(),
        });
        stack.insert_background(CameraBackground::new(
            FitTransform::new(FitPolicy::Stretch),
            frame,
        ));

        let mut pixmap = Pixmap::new(8, 8);
        assert!(stack.draw(&mut pixmap).is_clean());
        assert_eq!(pixmap.pixel(0, 0), Some(Rgba8::opaque(0, 0, 255)));
        assert_eq!(pixmap.pixel(2, 2), Some(Rgba8::WHITE));
        assert_eq!(pixmap.pixel(7, 7), Some(Rgba8::opaque(0, 0, 255)));
    }

    #[test]
    fn degenerate_background_does_not_block_overlay() {
        let mut stack = OverlayStack::new();
        stack.push(CameraBackground::new(
            FitTransform::new(FitPolicy::Letterbox),
            SourceImage::new(0, 0, vec![]).unwrap(),
        ));
        stack.push(Marker {
            at: (0.0, 0.0),
            image: SourceImage::filled(1, 1, Rgba8::WHITE).unwrap(),
        });

        let mut pixmap = Pixmap::new(2, 2);
        let report = stack.draw(&mut pixmap);
        assert_eq!(
            report.failed,
            vec![(
                0,
                DrawError::InvalidImage {
                    width: 0,
                    height: 0
                }
            )]
        );
        assert_eq!(pixmap.pixel(0, 0), Some(Rgba8::WHITE));
        assert_eq!(pixmap.pixel(1, 1), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn set_image_swaps_frames() {
        let first = SourceImage::filled(2, 2, Rgba8::BLACK).unwrap();
        let second = SourceImage::filled(4, 4, Rgba8::WHITE).unwrap();
        let mut layer = CameraBackground::new(FitTransform::new(FitPolicy::Stretch), first.clone());
        let previous = layer.set_image(second.clone());
        assert!(previous.shares_pixels(&first));
        assert!(layer.image().shares_pixels(&second));

        let mut pixmap = Pixmap::new(8, 8);
        layer.draw(&mut pixmap).unwrap();
        assert!(pixmap.pixels().iter().all(|p| *p == Rgba8::WHITE));
        assert_eq!(
            layer.blitter().cached_transform(),
            Some(Affine::scale(2.0)),
            "transform follows the new frame size"
        );
    }

    #[test]
    fn clear_empties_the_stack() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = OverlayStack::new();
        stack.push(tagged("a", &log));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.draw(&mut Pixmap::new(1, 1)), DrawReport::default());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn blitter_mut_reaches_provider() {
        let mut layer = CameraBackground::new(
            FitTransform::new(FitPolicy::Stretch),
            SourceImage::filled(2, 1, Rgba8::WHITE).unwrap(),
        );
        layer.blitter_mut().provider_mut().mirrored = true;
        let t = layer
            .blitter()
            .current_transform(ImageSize::new(2, 1), SurfaceGeometry::new(2, 1))
            .unwrap();
        assert_eq!(t.as_coeffs(), [-1.0, 0.0, 0.0, 1.0, 2.0, 0.0]);
    }
}
