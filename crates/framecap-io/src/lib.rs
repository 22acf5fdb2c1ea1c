#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for frame sources.
pub mod error;

/// Sequential frame sources.
///
/// See [`source::FrameSource`] for the decoding seam used by the sampler.
pub mod source;

/// Interval sampling of decoded frames.
pub mod sampler;

/// GStreamer video file decoding (feature-gated).
///
/// Requires the `gstreamer` feature flag and system GStreamer libraries.
/// See [`gstreamer::VideoReader`].
#[cfg(feature = "gstreamer")]
pub mod gstreamer;

pub use crate::error::StreamCaptureError;
pub use crate::sampler::{sample_frames, SampledFrame, SamplerError, DEFAULT_FRAME_INTERVAL};
pub use crate::source::{FrameSource, MemorySource};

#[cfg(feature = "gstreamer")]
pub use crate::sampler::sample_video_file;
