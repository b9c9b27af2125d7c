// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surface contract.
//!
//! The host acquires a drawable surface for each refresh (a canvas, a mapped
//! buffer, a GPU texture view) and hands it to the overlay. The core never
//! acquires or releases surfaces; it only asks for their geometry and issues
//! blits.

use core::fmt;

use kurbo::Affine;

use crate::geometry::SurfaceGeometry;
use crate::image::SourceImage;

/// Why a host surface cannot be drawn to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceUnavailable {
    /// The host has not acquired the surface for this draw pass.
    NotAcquired,
    /// The backing store was lost (e.g. the window was destroyed).
    Lost,
}

impl fmt::Display for SurfaceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAcquired => f.write_str("surface is not acquired for drawing"),
            Self::Lost => f.write_str("surface backing store was lost"),
        }
    }
}

impl core::error::Error for SurfaceUnavailable {}

/// A drawable target supplied by the host.
///
/// Both CPU pixmaps and platform canvases implement this trait, enabling
/// generic layers and test doubles.
pub trait Surface {
    /// Current size of the surface in pixels.
    fn geometry(&self) -> SurfaceGeometry;

    /// Checks that the surface is in a drawable state.
    fn ensure_drawable(&self) -> Result<(), SurfaceUnavailable>;

    /// Paints the full `image` through `transform` (source pixel space to
    /// surface space) with opaque paint and source-over compositing.
    ///
    /// Translucent pixels blend with whatever the surface already holds, so
    /// repeated blits give identical output only when the host clears the
    /// surface between refreshes.
    ///
    /// Callers guarantee `transform` and its inverse are finite.
    fn blit(&mut self, image: &SourceImage, transform: Affine) -> Result<(), SurfaceUnavailable>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    #[inline]
    fn geometry(&self) -> SurfaceGeometry {
        (**self).geometry()
    }

    #[inline]
    fn ensure_drawable(&self) -> Result<(), SurfaceUnavailable> {
        (**self).ensure_drawable()
    }

    #[inline]
    fn blit(&mut self, image: &SourceImage, transform: Affine) -> Result<(), SurfaceUnavailable> {
        (**self).blit(image, transform)
    }
}
