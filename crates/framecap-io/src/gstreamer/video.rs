use std::path::Path;

use framecap_image::{Image, ImageSize};
use gstreamer::prelude::*;

use crate::{error::StreamCaptureError, source::FrameSource};

/// How long a single pull waits for a sample before checking the bus again.
const PULL_TIMEOUT_MS: u64 = 100;

/// A struct for decoding video files frame by frame.
///
/// Frames are decoded to packed BGR and pulled synchronously, without dropping any.
///
/// # Examples
///
/// ```no_run
/// use framecap_io::{gstreamer::VideoReader, FrameSource};
///
/// let mut reader = VideoReader::new("video.mp4").unwrap();
/// reader.start().unwrap();
///
/// while let Some(frame) = reader.next_frame().unwrap() {
///     println!("{}", frame.size());
/// }
///
/// reader.close().unwrap();
/// ```
pub struct VideoReader {
    pipeline: gstreamer::Pipeline,
    appsink: gstreamer_app::AppSink,
    running: bool,
}

impl VideoReader {
    /// Creates a new `VideoReader`.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the video file to be read.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StreamCaptureError> {
        super::ensure_init()?;

        let pipeline_desc = "filesrc name=src ! \
            decodebin ! \
            videoconvert ! \
            video/x-raw,format=BGR ! \
            appsink name=sink sync=false max-buffers=4 drop=false";

        let pipeline = gstreamer::parse::launch(pipeline_desc)?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        // set as a property so the path is never parsed as pipeline syntax
        let location = path.as_ref().to_string_lossy();
        log::debug!("Reader pipeline: {pipeline_desc} (location: {location})");
        pipeline
            .by_name("src")
            .ok_or(StreamCaptureError::GetElementByNameError)?
            .set_property("location", &*location);

        let appsink = pipeline
            .by_name("sink")
            .ok_or(StreamCaptureError::GetElementByNameError)?
            .dynamic_cast::<gstreamer_app::AppSink>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        Ok(Self {
            pipeline,
            appsink,
            running: false,
        })
    }

    /// Starts the decoding pipeline.
    pub fn start(&mut self) -> Result<(), StreamCaptureError> {
        self.pipeline.set_state(gstreamer::State::Playing)?;
        self.running = true;
        Ok(())
    }

    /// Stops the decoding pipeline and releases the decoder.
    pub fn close(&mut self) -> Result<(), StreamCaptureError> {
        self.running = false;
        self.pipeline.set_state(gstreamer::State::Null)?;
        Ok(())
    }

    /// Pops the first error message posted on the pipeline bus, if any.
    fn pop_bus_error(&self) -> Option<StreamCaptureError> {
        let bus = self.pipeline.bus()?;
        let msg = bus.pop_filtered(&[gstreamer::MessageType::Error])?;
        match msg.view() {
            gstreamer::MessageView::Error(err) => {
                let description = format!(
                    "{} from {:?} ({:?})",
                    err.error(),
                    msg.src().map(|s| s.path_string()),
                    err.debug()
                );
                log::error!("gstreamer error: {description}");
                Some(StreamCaptureError::PipelineError(description))
            }
            _ => None,
        }
    }

    /// Copies the pixels of a BGR sample into an image, dropping any row padding.
    fn extract_image_frame(sample: &gstreamer::Sample) -> Result<Image<u8, 3>, StreamCaptureError> {
        let caps = sample
            .caps()
            .ok_or_else(|| StreamCaptureError::GetCapsError("sample has no caps".to_string()))?;

        let info = gstreamer_video::VideoInfo::from_caps(caps)
            .map_err(|e| StreamCaptureError::GetCapsError(e.to_string()))?;

        if info.format() != gstreamer_video::VideoFormat::Bgr {
            return Err(StreamCaptureError::InvalidImageFormat(format!(
                "expected BGR, got {:?}",
                info.format()
            )));
        }

        let size = ImageSize {
            width: info.width() as usize,
            height: info.height() as usize,
        };
        let row_bytes = size.width * 3;
        let stride = info.stride()[0] as usize;

        let buffer = sample
            .buffer()
            .ok_or(StreamCaptureError::GetBufferError)?
            .map_readable()
            .map_err(|_| StreamCaptureError::GetBufferError)?;

        let data = buffer.as_slice();

        let pixels = if stride == row_bytes {
            data.get(..row_bytes * size.height)
                .ok_or_else(|| truncated_buffer(data.len(), size))?
                .to_vec()
        } else {
            let mut pixels = Vec::with_capacity(row_bytes * size.height);
            for row in 0..size.height {
                let start = row * stride;
                let row_data = data
                    .get(start..start + row_bytes)
                    .ok_or_else(|| truncated_buffer(data.len(), size))?;
                pixels.extend_from_slice(row_data);
            }
            pixels
        };

        Ok(Image::new(size, pixels)?)
    }
}

fn truncated_buffer(len: usize, size: ImageSize) -> StreamCaptureError {
    StreamCaptureError::InvalidImageFormat(format!("buffer of {len} bytes is too small for {size}"))
}

impl FrameSource for VideoReader {
    fn next_frame(&mut self) -> Result<Option<Image<u8, 3>>, StreamCaptureError> {
        if !self.running {
            return Err(StreamCaptureError::PipelineNotRunning);
        }

        let timeout = gstreamer::ClockTime::from_mseconds(PULL_TIMEOUT_MS);
        loop {
            if let Some(sample) = self.appsink.try_pull_sample(timeout) {
                return Self::extract_image_frame(&sample).map(Some);
            }

            // errors take precedence over the end of stream
            if let Some(err) = self.pop_bus_error() {
                return Err(err);
            }

            if self.appsink.is_eos() {
                return Ok(None);
            }
        }
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            log::error!("Error setting reader pipeline to NULL in drop: {e}");
        }
    }
}
