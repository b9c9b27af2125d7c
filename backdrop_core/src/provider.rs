// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform providers.
//!
//! The blitter never decides how a frame is fitted to the surface. It asks an
//! injected [`TransformProvider`], which owns the fit policy and any mirroring.
//! [`FitTransform`] is the stock provider; closures work too:
//!
//! ```
//! use backdrop_core::geometry::{ImageSize, SurfaceGeometry};
//! use backdrop_core::provider::TransformProvider;
//! use kurbo::Affine;
//!
//! let pinned = |_: ImageSize, _: SurfaceGeometry| Affine::translate((8.0, 8.0));
//! let t = pinned.current_transform(ImageSize::new(4, 4), SurfaceGeometry::new(16, 16));
//! assert_eq!(t, Affine::translate((8.0, 8.0)));
//! ```

use kurbo::Affine;

use crate::geometry::{ImageSize, ImageSourceInfo, SurfaceGeometry};
use crate::transform::TransformParameters;

/// Computes the transform from source pixel space to surface space.
///
/// Implementations account for device rotation, lens mirroring, and the fit
/// policy. They are queried once per geometry change (or once per draw when
/// caching is disabled) and must be deterministic for equal inputs.
pub trait TransformProvider {
    /// Returns the transform for a source of size `source` drawn onto a
    /// surface of size `surface`.
    fn current_transform(&self, source: ImageSize, surface: SurfaceGeometry) -> Affine;
}

impl<F> TransformProvider for F
where
    F: Fn(ImageSize, SurfaceGeometry) -> Affine,
{
    #[inline]
    fn current_transform(&self, source: ImageSize, surface: SurfaceGeometry) -> Affine {
        self(source, surface)
    }
}

/// How a source image is fitted into a surface of a different size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FitPolicy {
    /// Scale each axis independently to fill the surface exactly.
    Stretch,
    /// Scale uniformly so the whole image is visible, centred, with bars on
    /// the leftover axis.
    Letterbox,
    /// Scale uniformly so the image covers the whole surface, centred, with
    /// the overflowing axis cropped.
    CropToFill,
}

impl FitPolicy {
    /// Computes unmirrored fit parameters.
    #[must_use]
    pub fn parameters(self, source: ImageSize, surface: SurfaceGeometry) -> TransformParameters {
        let src = source.to_size();
        let dst = surface.to_size();
        let sx = dst.width / src.width;
        let sy = dst.height / src.height;
        let (scale_x, scale_y) = match self {
            Self::Stretch => (sx, sy),
            Self::Letterbox => {
                let s = sx.min(sy);
                (s, s)
            }
            Self::CropToFill => {
                let s = sx.max(sy);
                (s, s)
            }
        };
        TransformParameters {
            scale_x,
            scale_y,
            translate_x: (dst.width - src.width * scale_x) / 2.0,
            translate_y: (dst.height - src.height * scale_y) / 2.0,
            mirrored: false,
        }
    }
}

/// A [`TransformProvider`] that fits frames with an explicit [`FitPolicy`].
///
/// Has no `Default`; hosts pick a policy explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitTransform {
    /// The fit policy.
    pub policy: FitPolicy,
    /// Mirror horizontally (front-facing cameras).
    pub mirrored: bool,
}

impl FitTransform {
    /// Creates an unmirrored provider.
    #[must_use]
    pub const fn new(policy: FitPolicy) -> Self {
        Self {
            policy,
            mirrored: false,
        }
    }

    /// Creates a provider whose mirroring follows the capture metadata.
    #[must_use]
    pub const fn for_source(policy: FitPolicy, info: &ImageSourceInfo) -> Self {
        Self {
            policy,
            mirrored: info.mirrored,
        }
    }

    /// Returns a copy with mirroring set.
    #[must_use]
    pub const fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Computes the decomposed parameters for the given sizes.
    #[must_use]
    pub fn parameters(&self, source: ImageSize, surface: SurfaceGeometry) -> TransformParameters {
        TransformParameters::fit(self.policy, source, surface, self.mirrored)
    }
}

impl TransformProvider for FitTransform {
    fn current_transform(&self, source: ImageSize, surface: SurfaceGeometry) -> Affine {
        self.parameters(source, surface).to_affine(surface)
    }
}
