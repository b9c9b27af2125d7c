// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame transform blitter.
//!
//! [`FrameTransformBlitter`] paints one source image onto one surface per
//! call. It validates the image, asks its [`TransformProvider`] where the
//! image goes, and issues exactly one [`Surface::blit`]. The transform is
//! cached per `(source size, surface geometry)` pair, so a steady preview
//! queries the provider once and a rotation recomputes it on the next draw.

use kurbo::Affine;

use crate::error::DrawError;
use crate::geometry::{ImageSize, SurfaceGeometry};
use crate::image::SourceImage;
use crate::provider::TransformProvider;
use crate::surface::Surface;
use crate::trace::{BlitEvent, TraceSink, Tracer, TransformEvent};
use crate::transform::is_drawable;

/// Configuration for a [`FrameTransformBlitter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitterConfig {
    /// Reuse the last transform while source size and surface geometry are
    /// unchanged.
    pub cache_transform: bool,
}

impl BlitterConfig {
    /// Caches transforms between draws.
    #[must_use]
    pub const fn cached() -> Self {
        Self {
            cache_transform: true,
        }
    }

    /// Queries the provider on every draw.
    #[must_use]
    pub const fn uncached() -> Self {
        Self {
            cache_transform: false,
        }
    }
}

impl Default for BlitterConfig {
    fn default() -> Self {
        Self::cached()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CachedTransform {
    source: ImageSize,
    surface: SurfaceGeometry,
    transform: Affine,
}

/// Paints a source image onto a surface through a provided transform.
#[derive(Clone, Debug)]
pub struct FrameTransformBlitter<P> {
    provider: P,
    config: BlitterConfig,
    cache: Option<CachedTransform>,
}

impl<P: TransformProvider> FrameTransformBlitter<P> {
    /// Creates a blitter with the default (cached) configuration.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, BlitterConfig::default())
    }

    /// Creates a blitter with an explicit configuration.
    #[must_use]
    pub fn with_config(provider: P, config: BlitterConfig) -> Self {
        Self {
            provider,
            config,
            cache: None,
        }
    }

    /// The transform provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the transform provider.
    ///
    /// Drops the cached transform, since the provider may answer differently
    /// afterwards (for example after a camera switch toggles mirroring).
    pub fn provider_mut(&mut self) -> &mut P {
        self.cache = None;
        &mut self.provider
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> BlitterConfig {
        self.config
    }

    /// Drops the cached transform.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// The cached transform, if any.
    #[must_use]
    pub fn cached_transform(&self) -> Option<Affine> {
        self.cache.map(|c| c.transform)
    }

    /// Returns the transform the next draw of a `source`-sized image onto a
    /// `surface`-sized target would use.
    pub fn current_transform(
        &self,
        source: ImageSize,
        surface: SurfaceGeometry,
    ) -> Result<Affine, DrawError> {
        check_image(source)?;
        self.resolve(source, surface).map(|(transform, _)| transform)
    }

    /// Paints `image` onto `surface`.
    ///
    /// Fails without touching the surface or the cached transform if the
    /// image is degenerate, the surface is not drawable, or the provider
    /// returns an unusable transform.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &SourceImage,
    ) -> Result<(), DrawError> {
        self.draw_traced(surface, image, &mut Tracer::none())
    }

    /// Like [`draw`](Self::draw), reporting transform and blit events to
    /// `tracer`.
    ///
    /// Failures are returned, not traced; the caller decides whether a
    /// skipped frame is worth reporting.
    pub fn draw_traced<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &SourceImage,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), DrawError> {
        let source = image.size();
        check_image(source)?;
        surface.ensure_drawable()?;

        let geometry = surface.geometry();
        let (transform, reused) = self.resolve(source, geometry)?;
        tracer.transform(&TransformEvent {
            source,
            surface: geometry,
            transform,
            reused,
        });

        surface.blit(image, transform)?;

        if self.config.cache_transform && !reused {
            self.cache = Some(CachedTransform {
                source,
                surface: geometry,
                transform,
            });
        }
        tracer.blit(&BlitEvent {
            source,
            surface: geometry,
        });
        Ok(())
    }

    /// Convenience wrapper over [`draw_traced`](Self::draw_traced) taking a
    /// bare sink.
    pub fn draw_with_sink<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &SourceImage,
        sink: &mut dyn TraceSink,
    ) -> Result<(), DrawError> {
        self.draw_traced(surface, image, &mut Tracer::new(sink))
    }

    fn resolve(
        &self,
        source: ImageSize,
        surface: SurfaceGeometry,
    ) -> Result<(Affine, bool), DrawError> {
        if self.config.cache_transform
            && let Some(cached) = self.cache
            && cached.source == source
            && cached.surface == surface
        {
            return Ok((cached.transform, true));
        }
        let transform = self.provider.current_transform(source, surface);
        if !is_drawable(transform) {
            return Err(DrawError::InvalidTransform);
        }
        Ok((transform, false))
    }
}

fn check_image(size: ImageSize) -> Result<(), DrawError> {
    if size.is_degenerate() {
        return Err(DrawError::InvalidImage {
            width: size.width,
            height: size.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Rgba8;
    use crate::pixmap::Pixmap;
    use crate::provider::{FitPolicy, FitTransform};
    use crate::surface::SurfaceUnavailable;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use proptest::prelude::*;

    /// Records blits instead of painting.
    struct RecordingSurface {
        geometry: SurfaceGeometry,
        available: bool,
        blits: Vec<Affine>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                geometry: SurfaceGeometry::new(width, height),
                available: true,
                blits: Vec::new(),
            }
        }
    }

    impl Surface for RecordingSurface {
        fn geometry(&self) -> SurfaceGeometry {
            self.geometry
        }

        fn ensure_drawable(&self) -> Result<(), SurfaceUnavailable> {
            if self.available {
                Ok(())
            } else {
                Err(SurfaceUnavailable::Lost)
            }
        }

        fn blit(&mut self, _: &SourceImage, transform: Affine) -> Result<(), SurfaceUnavailable> {
            self.blits.push(transform);
            Ok(())
        }
    }

    fn pattern_pixel(x: u32, y: u32) -> Rgba8 {
        Rgba8::opaque((x * 7 % 256) as u8, (y * 13 % 256) as u8, 128)
    }

    fn pattern(width: u32, height: u32) -> SourceImage {
        SourceImage::from_fn(width, height, pattern_pixel).unwrap()
    }

    #[test]
    fn identity_case_copies_pixels() {
        let image = pattern(640, 480);
        let mut pixmap = Pixmap::new(640, 480);
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::CropToFill));
        blitter.draw(&mut pixmap, &image).unwrap();
        assert_eq!(blitter.cached_transform(), Some(Affine::IDENTITY));
        assert_eq!(pixmap.pixels(), image.pixels());
    }

    #[test]
    fn uniform_double_scale() {
        let mut surface = RecordingSurface::new(1280, 960);
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Letterbox));
        blitter.draw(&mut surface, &pattern(640, 480)).unwrap();
        assert_eq!(surface.blits.len(), 1);
        assert_eq!(surface.blits[0].as_coeffs(), [2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn degenerate_image_is_rejected_before_provider() {
        let calls = Cell::new(0);
        let provider = |_: ImageSize, _: SurfaceGeometry| {
            calls.set(calls.get() + 1);
            Affine::IDENTITY
        };
        let mut surface = RecordingSurface::new(64, 64);
        let mut blitter = FrameTransformBlitter::new(provider);

        for (w, h) in [(0, 10), (10, 0), (0, 0)] {
            let image = SourceImage::new(w, h, vec![]).unwrap();
            assert_eq!(
                blitter.draw(&mut surface, &image),
                Err(DrawError::InvalidImage {
                    width: w,
                    height: h
                })
            );
        }
        assert!(surface.blits.is_empty(), "no blit for degenerate images");
        assert_eq!(calls.get(), 0, "provider must not be queried");
        assert!(blitter.cached_transform().is_none());
    }

    #[test]
    fn unavailable_surface_propagates() {
        let mut surface = RecordingSurface::new(64, 64);
        surface.available = false;
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Stretch));
        assert_eq!(
            blitter.draw(&mut surface, &pattern(8, 8)),
            Err(DrawError::SurfaceUnavailable(SurfaceUnavailable::Lost))
        );
        assert!(surface.blits.is_empty());
    }

    #[test]
    fn failed_draw_leaves_cache_untouched() {
        let mut pixmap = Pixmap::new(1080, 1920);
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Letterbox));
        let image = pattern(64, 48);
        blitter.draw(&mut pixmap, &image).unwrap();
        let before = blitter.cached_transform();
        let snapshot = pixmap.clone();

        pixmap.set_available(false);
        assert!(blitter.draw(&mut pixmap, &image).is_err());
        assert_eq!(blitter.cached_transform(), before);
        pixmap.set_available(true);
        assert_eq!(pixmap, snapshot, "surface must be untouched");

        // A different geometry that fails must not replace the cache either.
        let mut rotated = RecordingSurface::new(1920, 1080);
        rotated.available = false;
        assert!(blitter.draw(&mut rotated, &image).is_err());
        assert_eq!(blitter.cached_transform(), before);
    }

    #[test]
    fn singular_transform_is_rejected() {
        let provider = |_: ImageSize, _: SurfaceGeometry| Affine::scale_non_uniform(1.0, 0.0);
        let mut surface = RecordingSurface::new(16, 16);
        let mut blitter = FrameTransformBlitter::new(provider);
        assert_eq!(
            blitter.draw(&mut surface, &pattern(4, 4)),
            Err(DrawError::InvalidTransform)
        );
        assert!(surface.blits.is_empty());
    }

    #[test]
    fn translucent_frame_accumulates_without_clear() {
        let image = SourceImage::filled(4, 4, Rgba8::new(255, 0, 0, 128)).unwrap();
        let mut surface = Pixmap::filled(4, 4, Rgba8::BLACK);
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Stretch));
        blitter.draw(&mut surface, &image).unwrap();
        let once = surface.pixel(0, 0).unwrap();
        blitter.draw(&mut surface, &image).unwrap();
        let twice = surface.pixel(0, 0).unwrap();
        assert!(twice.r > once.r, "second draw composites over the first");
        surface.fill(Rgba8::BLACK);
        blitter.draw(&mut surface, &image).unwrap();
        assert_eq!(surface.pixel(0, 0), Some(once));
    }

    #[test]
    fn transform_with_overflowing_inverse_is_rejected() {
        let provider =
            |_: ImageSize, _: SurfaceGeometry| Affine::new([1e-160, 0.0, 0.0, 1e-160, 0.0, 0.0]);
        let image = SourceImage::filled(4, 4, Rgba8::WHITE).unwrap();
        let mut surface = Pixmap::filled(4, 4, Rgba8::BLACK);
        let mut blitter = FrameTransformBlitter::new(provider);
        assert_eq!(
            blitter.draw(&mut surface, &image),
            Err(DrawError::InvalidTransform)
        );
        assert_eq!(surface.pixel(0, 0), Some(Rgba8::BLACK));
        assert!(blitter.cached_transform().is_none());
    }

    #[test]
    fn zero_sized_surface_yields_invalid_transform() {
        let mut surface = RecordingSurface::new(0, 0);
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Letterbox));
        assert_eq!(
            blitter.draw(&mut surface, &pattern(4, 4)),
            Err(DrawError::InvalidTransform)
        );
    }

    #[test]
    fn cached_transform_is_reused_for_same_geometry() {
        let calls = Cell::new(0);
        let fit = FitTransform::new(FitPolicy::Letterbox);
        let provider = |s: ImageSize, g: SurfaceGeometry| {
            calls.set(calls.get() + 1);
            fit.current_transform(s, g)
        };
        let mut surface = RecordingSurface::new(1080, 1920);
        let mut blitter = FrameTransformBlitter::new(provider);
        let image = pattern(64, 48);
        blitter.draw(&mut surface, &image).unwrap();
        blitter.draw(&mut surface, &image).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(surface.blits[0], surface.blits[1]);
    }

    #[test]
    fn uncached_config_queries_every_draw() {
        let calls = Cell::new(0);
        let provider = |_: ImageSize, _: SurfaceGeometry| {
            calls.set(calls.get() + 1);
            Affine::IDENTITY
        };
        let mut surface = RecordingSurface::new(8, 8);
        let mut blitter = FrameTransformBlitter::with_config(provider, BlitterConfig::uncached());
        let image = pattern(8, 8);
        blitter.draw(&mut surface, &image).unwrap();
        blitter.draw(&mut surface, &image).unwrap();
        assert_eq!(calls.get(), 2);
        assert!(blitter.cached_transform().is_none());
    }

    #[test]
    fn rotation_recomputes_transform() {
        let fit = FitTransform::new(FitPolicy::Letterbox);
        let mut blitter = FrameTransformBlitter::new(fit);
        let image = pattern(640, 480);

        let mut portrait = RecordingSurface::new(1080, 1920);
        blitter.draw(&mut portrait, &image).unwrap();
        let mut landscape = RecordingSurface::new(1920, 1080);
        blitter.draw(&mut landscape, &image).unwrap();

        assert_ne!(portrait.blits[0], landscape.blits[0]);
        assert_eq!(
            landscape.blits[0],
            fit.current_transform(image.size(), SurfaceGeometry::new(1920, 1080))
        );
        assert_eq!(blitter.cached_transform(), Some(landscape.blits[0]));
    }

    #[test]
    fn new_source_size_recomputes_transform() {
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Stretch));
        let mut surface = RecordingSurface::new(100, 100);
        blitter.draw(&mut surface, &pattern(50, 50)).unwrap();
        blitter.draw(&mut surface, &pattern(25, 50)).unwrap();
        assert_eq!(surface.blits[0].as_coeffs()[0], 2.0);
        assert_eq!(surface.blits[1].as_coeffs()[0], 4.0);
    }

    #[test]
    fn provider_mut_invalidates_cache() {
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Stretch));
        let mut surface = RecordingSurface::new(10, 10);
        let image = pattern(10, 10);
        blitter.draw(&mut surface, &image).unwrap();
        assert!(blitter.cached_transform().is_some());

        blitter.provider_mut().mirrored = true;
        assert!(blitter.cached_transform().is_none());
        blitter.draw(&mut surface, &image).unwrap();
        assert_eq!(surface.blits[1].as_coeffs(), [-1.0, 0.0, 0.0, 1.0, 10.0, 0.0]);
    }

    #[test]
    fn current_transform_matches_next_draw() {
        let blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::CropToFill));
        let t = blitter
            .current_transform(ImageSize::new(640, 480), SurfaceGeometry::new(1280, 960))
            .unwrap();
        assert_eq!(t, Affine::scale(2.0));
        assert!(matches!(
            blitter.current_transform(ImageSize::new(0, 1), SurfaceGeometry::new(1, 1)),
            Err(DrawError::InvalidImage { .. })
        ));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_reports_reuse() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Sink {
            reused: Vec<bool>,
            blits: usize,
        }
        impl TraceSink for Sink {
            fn on_transform(&mut self, e: &TransformEvent) {
                self.reused.push(e.reused);
            }
            fn on_blit(&mut self, _: &BlitEvent) {
                self.blits += 1;
            }
        }

        let mut sink = Sink::default();
        let mut blitter = FrameTransformBlitter::new(FitTransform::new(FitPolicy::Stretch));
        let mut surface = RecordingSurface::new(10, 10);
        let image = pattern(5, 5);
        blitter.draw_with_sink(&mut surface, &image, &mut sink).unwrap();
        blitter.draw_with_sink(&mut surface, &image, &mut sink).unwrap();
        assert_eq!(sink.reused, &[false, true]);
        assert_eq!(sink.blits, 2);
    }

    proptest! {
        #[test]
        fn repeated_draws_are_identical(
            w in 1_u32..24,
            h in 1_u32..24,
            sw in 1_u32..48,
            sh in 1_u32..48,
            policy in prop_oneof![
                Just(FitPolicy::Stretch),
                Just(FitPolicy::Letterbox),
                Just(FitPolicy::CropToFill),
            ],
            mirrored in any::<bool>(),
            alpha in any::<u8>(),
        ) {
            let image = SourceImage::from_fn(w, h, |x, y| Rgba8 {
                a: alpha,
                ..pattern_pixel(x, y)
            })
            .unwrap();
            let mut blitter =
                FrameTransformBlitter::new(FitTransform::new(policy).with_mirrored(mirrored));
            let mut surface = Pixmap::filled(sw, sh, Rgba8::BLACK);
            blitter.draw(&mut surface, &image).unwrap();
            let first = surface.clone();
            surface.fill(Rgba8::BLACK);
            blitter.draw(&mut surface, &image).unwrap();
            prop_assert_eq!(first, surface);
        }
    }
}
