// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable RGBA8 frames.
//!
//! A [`SourceImage`] owns its pixels through an `Arc`, so cloning is an Arc
//! bump. A background layer can keep the current frame for as long as the
//! layer exists while the capture pipeline keeps producing new ones.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::geometry::ImageSize;

/// A straight-alpha RGBA pixel with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Creates a pixel from its four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Composites `self` over `dst` (source-over, straight alpha).
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "channel values are clamped to 0..=255 before narrowing"
    )]
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = u32::from(sa);
                let inv = 255 - sa;
                let da = u32::from(dst.a) * inv / 255;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| {
                    let num = u32::from(s) * sa + u32::from(d) * da;
                    // `out_a > 0` because `sa > 0`; the quotient never exceeds 255.
                    ((num + out_a / 2) / out_a).min(255) as u8
                };
                Self {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: out_a.min(255) as u8,
                }
            }
        }
    }
}

/// Errors from constructing a [`SourceImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// The pixel buffer length does not equal `width * height`.
    LengthMismatch {
        /// Expected number of pixels.
        expected: usize,
        /// Number of pixels supplied.
        actual: usize,
    },
    /// `width * height` does not fit in `usize`.
    TooLarge,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels, got {actual}")
            }
            Self::TooLarge => f.write_str("image dimensions overflow"),
        }
    }
}

impl core::error::Error for ImageError {}

/// An immutable 2-D pixel buffer in row-major order.
///
/// Zero-sized images can be constructed (a capture may legitimately report
/// one), but drawing them fails with
/// [`DrawError::InvalidImage`](crate::error::DrawError::InvalidImage).
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    size: ImageSize,
    pixels: Arc<[Rgba8]>,
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl SourceImage {
    /// Wraps a row-major pixel buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self, ImageError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(ImageError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            size: ImageSize::new(width, height),
            pixels: pixels.into(),
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgba8,
    ) -> Result<Self, ImageError> {
        let mut pixels = Vec::with_capacity(pixel_count(width, height)?);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Creates an image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Result<Self, ImageError> {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixel dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        self.pixels.get(idx).copied()
    }

    /// Row-major pixel data.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Returns `true` if both images share the same pixel allocation.
    #[must_use]
    pub fn shares_pixels(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, ImageError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(ImageError::TooLarge)
}
