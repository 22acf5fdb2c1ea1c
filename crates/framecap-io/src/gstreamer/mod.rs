/// Video file reader built on a GStreamer decoding pipeline.
pub mod video;

pub use crate::gstreamer::video::VideoReader;

/// Initialize GStreamer once per process.
pub(crate) fn ensure_init() -> Result<(), crate::StreamCaptureError> {
    // make sure that we do not initialize gstreamer several times
    if !gstreamer::INITIALIZED.load(std::sync::atomic::Ordering::Relaxed) {
        gstreamer::init()?;
    }
    Ok(())
}
