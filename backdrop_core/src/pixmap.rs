// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU RGBA8 surface.
//!
//! [`Pixmap`] blits by inverse mapping: each destination pixel centre inside
//! the transformed image bounds is mapped back into source space and the
//! nearest source pixel is composited over it. Destination pixels that map
//! outside the image are left untouched.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect};
#[cfg(not(any(feature = "std", test)))]
use kurbo::common::FloatFuncs as _;

use crate::geometry::SurfaceGeometry;
use crate::image::{ImageError, Rgba8, SourceImage};
use crate::surface::{Surface, SurfaceUnavailable};

/// An owned RGBA8 drawing surface.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    geometry: SurfaceGeometry,
    pixels: Vec<Rgba8>,
    available: bool,
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("geometry", &self.geometry)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Creates a transparent pixmap.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Creates a pixmap filled with `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            geometry: SurfaceGeometry::new(width, height),
            pixels: vec![color; width as usize * height as usize],
            available: true,
        }
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Resizes the pixmap, clearing it to transparent.
    ///
    /// Hosts use this when the display is rotated or resized.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.geometry = SurfaceGeometry::new(width, height);
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba8::TRANSPARENT);
    }

    /// Marks the pixmap as acquired (`true`) or not (`false`).
    ///
    /// While unavailable, [`Surface::blit`] fails with
    /// [`SurfaceUnavailable::NotAcquired`].
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.geometry.width as usize + x as usize)
            .copied()
    }

    /// Row-major pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Copies the current contents into a [`SourceImage`].
    pub fn to_image(&self) -> Result<SourceImage, ImageError> {
        SourceImage::new(
            self.geometry.width,
            self.geometry.height,
            self.pixels.clone(),
        )
    }

    /// Destination pixel span `[x0, x1) × [y0, y1)` touched by `bounds`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coordinates are clamped to the surface size, which fits in u32"
    )]
    fn pixel_span(&self, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = bounds.intersect(self.geometry.bounds());
        if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
            return None;
        }
        let x0 = clipped.x0.floor().max(0.0) as u32;
        let y0 = clipped.y0.floor().max(0.0) as u32;
        let x1 = (clipped.x1.ceil() as u32).min(self.geometry.width);
        let y1 = (clipped.y1.ceil() as u32).min(self.geometry.height);
        Some((x0, y0, x1, y1))
    }
}

impl Surface for Pixmap {
    fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    fn ensure_drawable(&self) -> Result<(), SurfaceUnavailable> {
        if self.available {
            Ok(())
        } else {
            Err(SurfaceUnavailable::NotAcquired)
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source coordinates are range-checked against the image size first"
    )]
    fn blit(&mut self, image: &SourceImage, transform: Affine) -> Result<(), SurfaceUnavailable> {
        self.ensure_drawable()?;
        let src_bounds = image.size().to_size().to_rect();
        let Some((x0, y0, x1, y1)) = self.pixel_span(transform.transform_rect_bbox(src_bounds))
        else {
            return Ok(());
        };
        let inverse = transform.inverse();
        let src_w = f64::from(image.width());
        let src_h = f64::from(image.height());
        let stride = self.geometry.width as usize;
        for y in y0..y1 {
            let row = y as usize * stride;
            for x in x0..x1 {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let (sx, sy) = (p.x.floor(), p.y.floor());
                // NaN samples fail `contains` and are skipped.
                if !((0.0..src_w).contains(&sx) && (0.0..src_h).contains(&sy)) {
                    continue;
                }
                let Some(src) = image.pixel(sx as u32, sy as u32) else {
                    continue;
                };
                let dst = &mut self.pixels[row + x as usize];
                *dst = src.over(*dst);
            }
        }
        Ok(())
    }
}
