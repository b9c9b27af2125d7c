// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame draw errors.
//!
//! Every error here is local to one draw call. A failed draw leaves the
//! surface and any cached transform untouched, so the next frame proceeds
//! normally.

use core::fmt;

use crate::surface::SurfaceUnavailable;

/// Errors from [`FrameTransformBlitter::draw`](crate::blitter::FrameTransformBlitter::draw)
/// and [`OverlayLayer::draw`](crate::layer::OverlayLayer::draw).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawError {
    /// The source image has a zero width or height.
    InvalidImage {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },
    /// The host surface is not in a drawable state.
    SurfaceUnavailable(SurfaceUnavailable),
    /// The transform provider returned a non-finite or singular transform.
    InvalidTransform,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage { width, height } => {
                write!(f, "cannot draw a degenerate {width}x{height} image")
            }
            Self::SurfaceUnavailable(reason) => write!(f, "surface unavailable: {reason}"),
            Self::InvalidTransform => f.write_str("transform is not finite or not invertible"),
        }
    }
}

impl core::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::SurfaceUnavailable(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<SurfaceUnavailable> for DrawError {
    fn from(reason: SurfaceUnavailable) -> Self {
        Self::SurfaceUnavailable(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_dimensions() {
        let err = DrawError::InvalidImage {
            width: 0,
            height: 480,
        };
        assert_eq!(err.to_string(), "cannot draw a degenerate 0x480 image");
    }

    #[test]
    fn surface_error_converts_and_chains() {
        use core::error::Error as _;

        let err = DrawError::from(SurfaceUnavailable::NotAcquired);
        assert_eq!(
            err,
            DrawError::SurfaceUnavailable(SurfaceUnavailable::NotAcquired)
        );
        assert!(err.source().is_some(), "surface error should be the source");
        assert!(DrawError::InvalidTransform.source().is_none());
    }
}
