/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the pixel data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the source and destination sizes are incompatible.
    #[error("Invalid image size: src ({0}x{1}), dst ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when an image has a zero width or height.
    #[error("Image has an empty dimension: {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when wrapping a buffer for resizing.
    #[error(transparent)]
    ImageBufferError(#[from] fast_image_resize::ImageBufferError),

    /// Error while resizing.
    #[error(transparent)]
    ResizeError(#[from] fast_image_resize::ResizeError),
}
