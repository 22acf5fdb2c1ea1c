use fast_image_resize::{
    images::{Image as FirImage, ImageRef},
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
};

use crate::{Image, ImageError};

/// Interpolation mode for the resize operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Bicubic (Catmull-Rom) interpolation.
    Bicubic,
    /// Bilinear interpolation.
    Bilinear,
    /// Nearest neighbor interpolation.
    Nearest,
}

/// Resize an rgb8 image using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The destination image size defines the output resolution.
///
/// # Arguments
///
/// * `src` - The input image container with 3 channels.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use framecap_image::{Image, ImageSize};
/// use framecap_image::resize::{resize_fast, InterpolationMode};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut image_resized = Image::<u8, 3>::from_size_val([2, 3].into(), 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(image_resized.width(), 2);
/// assert_eq!(image_resized.height(), 3);
/// ```
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::EmptyImage(src.width(), src.height()));
    }
    if dst.width() == 0 || dst.height() == 0 {
        return Err(ImageError::EmptyImage(dst.width(), dst.height()));
    }

    let src_image = ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        PixelType::U8x3,
    )?;

    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);
    let mut dst_image =
        FirImage::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), PixelType::U8x3)?;

    let resize_alg = match interpolation {
        InterpolationMode::Bicubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        InterpolationMode::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        InterpolationMode::Nearest => ResizeAlg::Nearest,
    };
    let options = ResizeOptions::new().resize_alg(resize_alg);

    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{resize_fast, InterpolationMode};
    use crate::{Image, ImageError, ImageSize};

    #[test]
    fn resize_constant_image() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([8, 6].into(), 42)?;
        let mut resized = Image::<u8, 3>::from_size_val([4, 3].into(), 0)?;

        resize_fast(&image, &mut resized, InterpolationMode::Bilinear)?;

        assert_eq!(
            resized.size(),
            ImageSize {
                width: 4,
                height: 3
            }
        );
        assert!(resized.as_slice().iter().all(|&v| v == 42));
        Ok(())
    }

    #[test]
    fn resize_bicubic() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([10, 7].into(), 200)?;
        let mut resized = Image::<u8, 3>::from_size_val([384, 384].into(), 0)?;

        resize_fast(&image, &mut resized, InterpolationMode::Bicubic)?;
        assert!(resized.as_slice().iter().all(|&v| v == 200));

        // dark left half, bright right half
        let data = (0..4)
            .flat_map(|_| (0..8).flat_map(|x| [if x < 4 { 0u8 } else { 255 }; 3]))
            .collect();
        let image = Image::<u8, 3>::new([8, 4].into(), data)?;
        let mut resized = Image::<u8, 3>::from_size_val([4, 2].into(), 0)?;

        resize_fast(&image, &mut resized, InterpolationMode::Bicubic)?;
        for y in 0..2 {
            let row = &resized.as_slice()[y * 4 * 3..(y + 1) * 4 * 3];
            assert!(row[..3].iter().all(|&v| v < 64));
            assert!(row[9..].iter().all(|&v| v > 191));
        }
        Ok(())
    }

    #[test]
    fn resize_upscale_nearest() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([1, 1].into(), vec![1, 2, 3])?;
        let mut resized = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;

        resize_fast(&image, &mut resized, InterpolationMode::Nearest)?;

        assert_eq!(resized.as_slice(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn resize_empty_source() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([0, 4].into(), vec![])?;
        let mut resized = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;

        let res = resize_fast(&image, &mut resized, InterpolationMode::Bilinear);
        assert!(matches!(res, Err(ImageError::EmptyImage(0, 4))));
        Ok(())
    }
}
