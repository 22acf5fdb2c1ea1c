/// An error type for frame sources.
#[derive(thiserror::Error, Debug)]
pub enum StreamCaptureError {
    /// An error occurred during GStreamer initialization or pipeline parsing.
    #[cfg(feature = "gstreamer")]
    #[error(transparent)]
    GStreamerError(#[from] gstreamer::glib::Error),

    /// An error occurred during GStreamer downcast of a pipeline element.
    #[cfg(feature = "gstreamer")]
    #[error("Failed to downcast pipeline")]
    DowncastPipelineError(gstreamer::Element),

    /// An error occurred during GStreamer to set the pipeline state.
    #[cfg(feature = "gstreamer")]
    #[error(transparent)]
    SetPipelineStateError(#[from] gstreamer::StateChangeError),

    /// An element could not be found in the pipeline.
    #[error("Failed to get an element by name")]
    GetElementByNameError,

    /// The caps of a sample are missing or cannot be parsed.
    #[error("Failed caps: {0}")]
    GetCapsError(String),

    /// The buffer of a sample is missing or cannot be mapped.
    #[error("Failed to get the buffer from the sample")]
    GetBufferError,

    /// The pipeline posted an error on its bus.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// A frame was requested before the pipeline was started.
    #[error("Pipeline is not running")]
    PipelineNotRunning,

    /// A decoded frame does not have the expected layout.
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// A decoded frame could not be wrapped into an image.
    #[error(transparent)]
    ImageError(#[from] framecap_image::ImageError),
}
