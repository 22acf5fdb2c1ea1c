use std::collections::VecDeque;

use framecap_image::Image;

use crate::error::StreamCaptureError;

/// A sequential source of decoded frames in BGR order.
///
/// Frames are yielded in decode order until the source is exhausted.
pub trait FrameSource {
    /// Decode the next frame.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(frame))` - the next frame in decode order.
    /// * `Ok(None)` - the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Image<u8, 3>>, StreamCaptureError>;
}

/// A frame source over frames already held in memory.
///
/// # Examples
///
/// ```
/// use framecap_image::Image;
/// use framecap_io::{FrameSource, MemorySource};
///
/// let frame = Image::<u8, 3>::from_size_val([2, 2].into(), 0).unwrap();
/// let mut source = MemorySource::new(vec![frame]);
///
/// assert!(source.next_frame().unwrap().is_some());
/// assert!(source.next_frame().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<Image<u8, 3>>,
}

impl MemorySource {
    /// Create a new source yielding `frames` in order.
    pub fn new(frames: impl IntoIterator<Item = Image<u8, 3>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// The number of frames not yet yielded.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<Image<u8, 3>>, StreamCaptureError> {
        Ok(self.frames.pop_front())
    }
}
