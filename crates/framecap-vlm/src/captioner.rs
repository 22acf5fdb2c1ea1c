use framecap_image::Image;

/// A model that produces a short natural-language description of a single frame.
pub trait Captioner {
    /// The error returned when a frame cannot be captioned.
    type Error: std::error::Error;

    /// Generate a caption for a frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - The bgr8 frame to describe with shape [H, W, 3], as produced by the decoder.
    ///
    /// # Returns
    ///
    /// The generated caption, with special tokens stripped.
    fn caption(&mut self, frame: &Image<u8, 3>) -> Result<String, Self::Error>;
}
