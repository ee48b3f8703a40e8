//! Pixel interpolation and resampling by coordinate maps.
//!
//! A coordinate map is a pair of single channel images `(map_x, map_y)` holding,
//! for every output pixel, the 0-based source coordinates to sample. Samples that
//! fall outside the source image read as zero.

mod bilinear;

/// Grid generation and coordinate mapping utilities.
pub mod grid;

mod remap;

pub use bilinear::bilinear_interpolate;
pub use remap::{interp2, remap};
