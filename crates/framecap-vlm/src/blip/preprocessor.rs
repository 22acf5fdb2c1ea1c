use candle_core::{DType, Device, Tensor};
use framecap_image::{
    color::rgb_from_bgr,
    resize::{resize_fast, InterpolationMode},
    Image, ImageSize,
};

use super::BlipError;

// CLIP mean and std used by the BLIP image processor
const MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];
const STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Image preprocessor for the BLIP vision encoder.
///
/// Converts a bgr8 frame into normalized `[1, 3, S, S]` pixel values.
pub(crate) struct BlipImagePreprocessor {
    // reused across frames of the same size
    buf_rgb: Option<Image<u8, 3>>,
    buf_resized: Image<u8, 3>,
}

impl BlipImagePreprocessor {
    pub fn new(image_size: usize) -> Result<Self, BlipError> {
        let buf_resized = Image::from_size_val(
            ImageSize {
                width: image_size,
                height: image_size,
            },
            0,
        )?;

        Ok(Self {
            buf_rgb: None,
            buf_resized,
        })
    }

    pub fn preprocess(
        &mut self,
        frame: &Image<u8, 3>,
        device: &Device,
        dtype: DType,
    ) -> Result<Tensor, BlipError> {
        let mut rgb = match self.buf_rgb.take() {
            Some(buf) if buf.size() == frame.size() => buf,
            _ => Image::from_size_val(frame.size(), 0)?,
        };

        rgb_from_bgr(frame, &mut rgb)?;
        resize_fast(&rgb, &mut self.buf_resized, InterpolationMode::Bicubic)?;
        self.buf_rgb = Some(rgb);

        let mean = Tensor::from_slice(&MEAN, (3, 1, 1), device)?;
        let std = Tensor::from_slice(&STD, (3, 1, 1), device)?;

        // convert to tensor with shape [1, 3, S, S]
        let pixel_values = Tensor::from_raw_buffer(
            self.buf_resized.as_slice(),
            DType::U8,
            &[self.buf_resized.rows(), self.buf_resized.cols(), 3],
            device,
        )?
        .to_dtype(DType::F32)?
        .permute((2, 0, 1))?
        .affine(1. / 255., 0.)?
        .broadcast_sub(&mean)?
        .broadcast_div(&std)?
        .unsqueeze(0)?
        .to_dtype(dtype)?;

        Ok(pixel_values)
    }
}
