#![deny(missing_docs)]
//! Image types and pixel operations for sampled video frames

/// Error types for the image module.
pub mod error;

/// Raster image representation.
pub mod image;

/// Color space conversions.
pub mod color;

/// Image resizing.
pub mod resize;

mod parallel;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
