// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source-to-surface transforms.
//!
//! Transforms are plain [`kurbo::Affine`] values: six coefficients
//! `[a, b, c, d, e, f]` mapping `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
//! [`TransformParameters`] is the decomposed form a fit computation
//! produces (scale, translate, optional mirror) before it is baked into an
//! `Affine`.

use kurbo::{Affine, Point, Vec2};

use crate::geometry::{ImageSize, SurfaceGeometry};
use crate::provider::FitPolicy;

/// Decomposed source-to-surface transform.
///
/// Applied in order: scale by `(scale_x, scale_y)`, translate by
/// `(translate_x, translate_y)`, then, if `mirrored`, flip horizontally about
/// the vertical centre line of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParameters {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal offset in surface pixels, applied after scaling.
    pub translate_x: f64,
    /// Vertical offset in surface pixels, applied after scaling.
    pub translate_y: f64,
    /// Flip horizontally about `x = surface.width / 2`.
    pub mirrored: bool,
}

impl TransformParameters {
    /// Parameters that leave coordinates unchanged.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        mirrored: false,
    };

    /// Fits `source` into `surface` under `policy`.
    #[must_use]
    pub fn fit(
        policy: FitPolicy,
        source: ImageSize,
        surface: SurfaceGeometry,
        mirrored: bool,
    ) -> Self {
        Self {
            mirrored,
            ..policy.parameters(source, surface)
        }
    }

    /// Bakes the parameters into an [`Affine`] for the given surface.
    ///
    /// The surface is only consulted for the mirror axis.
    #[must_use]
    pub fn to_affine(self, surface: SurfaceGeometry) -> Affine {
        let fitted = Affine::translate(Vec2::new(self.translate_x, self.translate_y))
            * Affine::scale_non_uniform(self.scale_x, self.scale_y);
        if self.mirrored {
            mirror_about(f64::from(surface.width) / 2.0) * fitted
        } else {
            fitted
        }
    }
}

impl Default for TransformParameters {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Horizontal flip about the vertical line `x = axis`.
#[must_use]
pub fn mirror_about(axis: f64) -> Affine {
    Affine::new([-1.0, 0.0, 0.0, 1.0, 2.0 * axis, 0.0])
}

/// Maps the four corners of an image through `transform`.
///
/// Corners are returned clockwise from the origin: top-left, top-right,
/// bottom-right, bottom-left (in source space).
#[must_use]
pub fn map_corners(transform: Affine, size: ImageSize) -> [Point; 4] {
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    [
        transform * Point::new(0.0, 0.0),
        transform * Point::new(w, 0.0),
        transform * Point::new(w, h),
        transform * Point::new(0.0, h),
    ]
}

/// Returns `true` if `transform` and its inverse both have finite
/// coefficients.
///
/// A tiny but nonzero determinant can still overflow on inversion, so the
/// inverse is checked directly.
#[must_use]
pub fn is_drawable(transform: Affine) -> bool {
    transform.is_finite() && transform.determinant() != 0.0 && transform.inverse().is_finite()
}
