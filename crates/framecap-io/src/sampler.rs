use std::path::PathBuf;

use framecap_image::Image;

use crate::{error::StreamCaptureError, source::FrameSource};

/// The default spacing, in decoded frames, between two sampled frames.
pub const DEFAULT_FRAME_INTERVAL: usize = 60;

/// A frame retained by the sampler.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    /// Position of the frame in the decoded stream, starting at 0.
    pub source_index: usize,
    /// The decoded frame in BGR order.
    pub image: Image<u8, 3>,
}

/// An error type for frame sampling.
#[derive(thiserror::Error, Debug)]
pub enum SamplerError {
    /// The video file does not exist.
    #[error("Video file not found: {0}")]
    FileNotFound(PathBuf),

    /// The sampling interval must be positive.
    #[error("The sampling interval must be greater than zero")]
    InvalidInterval,

    /// The source yielded no frames.
    #[error("No frames extracted")]
    NoFrames,

    /// The source failed while decoding.
    #[error(transparent)]
    Source(#[from] StreamCaptureError),
}

/// Drain a frame source and keep every `interval`-th frame.
///
/// A frame at decode position `p` is kept when `p % interval == 0`, so the first
/// frame is always kept when the source yields anything.
///
/// # Arguments
///
/// * `source` - The frame source, drained until exhausted.
/// * `interval` - The spacing between kept frames. Must be greater than zero.
///
/// # Returns
///
/// The kept frames in decode order, or [`SamplerError::NoFrames`] when the source is empty.
///
/// # Example
///
/// ```
/// use framecap_image::Image;
/// use framecap_io::{sample_frames, MemorySource};
///
/// let frames = (0..150).map(|_| Image::<u8, 3>::from_size_val([2, 2].into(), 0).unwrap());
/// let mut source = MemorySource::new(frames);
///
/// let sampled = sample_frames(&mut source, 60).unwrap();
/// let indices: Vec<_> = sampled.iter().map(|f| f.source_index).collect();
///
/// assert_eq!(indices, vec![0, 60, 120]);
/// ```
pub fn sample_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    interval: usize,
) -> Result<Vec<SampledFrame>, SamplerError> {
    if interval == 0 {
        return Err(SamplerError::InvalidInterval);
    }

    let mut frames = Vec::new();
    let mut position = 0usize;

    while let Some(image) = source.next_frame()? {
        if position % interval == 0 {
            frames.push(SampledFrame {
                source_index: position,
                image,
            });
        }
        position += 1;
    }

    log::debug!(
        "decoded {position} frames, sampled {} with interval {interval}",
        frames.len()
    );

    if frames.is_empty() {
        return Err(SamplerError::NoFrames);
    }

    Ok(frames)
}

/// Decode a video file and keep every `interval`-th frame.
///
/// The decoder is closed before returning, whether sampling succeeded or not.
///
/// # Errors
///
/// * [`SamplerError::FileNotFound`] - checked before any decoding.
/// * [`SamplerError::NoFrames`] - the video decoded to zero frames.
/// * [`SamplerError::Source`] - the video could not be opened or decoded.
#[cfg(feature = "gstreamer")]
pub fn sample_video_file(
    path: impl AsRef<std::path::Path>,
    interval: usize,
) -> Result<Vec<SampledFrame>, SamplerError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SamplerError::FileNotFound(path.to_path_buf()));
    }
    if interval == 0 {
        return Err(SamplerError::InvalidInterval);
    }

    let mut reader = crate::gstreamer::VideoReader::new(path)?;
    reader.start()?;

    let frames = sample_frames(&mut reader, interval);

    if let Err(e) = reader.close() {
        log::warn!("Failed to close the video reader: {e}");
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::{sample_frames, SamplerError};
    use crate::{FrameSource, MemorySource, StreamCaptureError};
    use framecap_image::Image;

    fn make_source(num_frames: usize) -> MemorySource {
        MemorySource::new((0..num_frames).map(|i| {
            Image::<u8, 3>::from_size_val([4, 2].into(), (i % 256) as u8)
                .expect("valid image size")
        }))
    }

    fn indices(num_frames: usize, interval: usize) -> Result<Vec<usize>, SamplerError> {
        let frames = sample_frames(&mut make_source(num_frames), interval)?;
        Ok(frames.iter().map(|f| f.source_index).collect())
    }

    #[test]
    fn sample_every_sixtieth_frame() -> Result<(), SamplerError> {
        assert_eq!(indices(150, 60)?, vec![0, 60, 120]);
        assert_eq!(indices(121, 60)?, vec![0, 60, 120]);
        assert_eq!(indices(120, 60)?, vec![0, 60]);
        Ok(())
    }

    #[test]
    fn sample_keeps_decode_order() -> Result<(), SamplerError> {
        let frames = sample_frames(&mut make_source(10), 3)?;
        let values: Vec<u8> = frames.iter().map(|f| f.image.as_slice()[0]).collect();
        assert_eq!(values, vec![0, 3, 6, 9]);
        Ok(())
    }

    #[test]
    fn sample_matches_arithmetic_progression() -> Result<(), SamplerError> {
        for num_frames in [1, 2, 7, 59, 60, 61, 200] {
            for interval in [1, 2, 5, 60, 1000] {
                let expected: Vec<usize> = (0..num_frames).step_by(interval).collect();
                assert_eq!(indices(num_frames, interval)?, expected);
            }
        }
        Ok(())
    }

    #[test]
    fn sample_short_video_keeps_first_frame() -> Result<(), SamplerError> {
        assert_eq!(indices(5, 60)?, vec![0]);
        Ok(())
    }

    #[test]
    fn sample_is_idempotent() -> Result<(), SamplerError> {
        assert_eq!(indices(150, 60)?, indices(150, 60)?);
        Ok(())
    }

    #[test]
    fn sample_empty_source() {
        let res = sample_frames(&mut make_source(0), 60);
        assert!(matches!(res, Err(SamplerError::NoFrames)));
    }

    #[test]
    fn sample_zero_interval() {
        let mut source = make_source(10);
        let res = sample_frames(&mut source, 0);
        assert!(matches!(res, Err(SamplerError::InvalidInterval)));
        assert_eq!(source.remaining(), 10);
    }

    struct FailingSource {
        decoded: usize,
        fail_at: usize,
    }

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> Result<Option<Image<u8, 3>>, StreamCaptureError> {
            if self.decoded == self.fail_at {
                return Err(StreamCaptureError::PipelineError("corrupted stream".into()));
            }
            self.decoded += 1;
            Ok(Some(Image::from_size_val([2, 2].into(), 0)?))
        }
    }

    #[test]
    fn sample_source_error_discards_partial_frames() {
        let mut source = FailingSource {
            decoded: 0,
            fail_at: 90,
        };
        let res = sample_frames(&mut source, 60);
        assert!(matches!(
            res,
            Err(SamplerError::Source(StreamCaptureError::PipelineError(_)))
        ));
    }
}
