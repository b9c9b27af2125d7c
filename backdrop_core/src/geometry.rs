// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image and surface sizes, plus capture metadata.
//!
//! A camera sensor reports frames in its own orientation. When the device is
//! rotated by 90° or 270°, the frame as seen by the user is transposed, so the
//! *effective* source size used for fitting swaps width and height. See
//! [`ImageSourceInfo::from_capture`].

use core::fmt;

use kurbo::{Rect, Size};

/// Pixel dimensions of a source image.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Creates a size from a width and height in pixels.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the size with width and height exchanged.
    #[inline]
    #[must_use]
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Converts to a floating-point [`Size`].
    #[inline]
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl fmt::Debug for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageSize({}x{})", self.width, self.height)
    }
}

/// Pixel dimensions of the target surface, supplied by the host at draw time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceGeometry {
    /// Creates a geometry from a width and height in pixels.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts to a floating-point [`Size`].
    #[inline]
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// The surface bounds `[0, width] × [0, height]`.
    #[inline]
    #[must_use]
    pub fn bounds(self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.to_size())
    }
}

impl fmt::Debug for SurfaceGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceGeometry({}x{})", self.width, self.height)
    }
}

/// Clockwise rotation reported by the camera for a captured frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Upright.
    #[default]
    Deg0,
    /// Rotated a quarter turn.
    Deg90,
    /// Upside down.
    Deg180,
    /// Rotated three quarter turns.
    Deg270,
}

impl Rotation {
    /// Converts a rotation in degrees, normalizing negative and full-turn
    /// values. Returns `None` if `degrees` is not a multiple of 90.
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            _ => Some(Self::Deg270),
        }
    }

    /// Returns the rotation in degrees (0, 90, 180 or 270).
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Returns `true` for quarter-turn rotations, which transpose the frame.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Which way the capturing camera faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LensFacing {
    /// Rear camera. Frames are shown as captured.
    #[default]
    Back,
    /// Selfie camera. Frames are shown mirrored.
    Front,
}

/// Source metadata the overlay uses to fit captured frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSourceInfo {
    /// Effective size after accounting for rotation.
    pub size: ImageSize,
    /// Whether frames should be mirrored horizontally.
    pub mirrored: bool,
}

impl ImageSourceInfo {
    /// Creates source info from an already-upright size.
    #[must_use]
    pub const fn new(size: ImageSize, mirrored: bool) -> Self {
        Self { size, mirrored }
    }

    /// Derives source info from raw capture dimensions.
    ///
    /// Quarter-turn rotations swap `width` and `height`; front-facing lenses
    /// mirror the frame.
    #[must_use]
    pub const fn from_capture(
        width: u32,
        height: u32,
        rotation: Rotation,
        facing: LensFacing,
    ) -> Self {
        let raw = ImageSize::new(width, height);
        let size = if rotation.swaps_axes() {
            raw.transposed()
        } else {
            raw
        };
        Self {
            size,
            mirrored: matches!(facing, LensFacing::Front),
        }
    }
}
