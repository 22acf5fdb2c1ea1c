use crate::{parallel, Image, ImageError};

/// Convert a BGR image to RGB by swapping the blue and red channels.
///
/// # Arguments
///
/// * `src` - The input BGR image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use framecap_image::{color::rgb_from_bgr, Image, ImageSize};
///
/// let bgr = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![10, 20, 30]).unwrap();
/// let mut rgb = Image::<u8, 3>::from_size_val(bgr.size(), 0).unwrap();
///
/// rgb_from_bgr(&bgr, &mut rgb).unwrap();
///
/// assert_eq!(rgb.as_slice(), &[30, 20, 10]);
/// ```
pub fn rgb_from_bgr<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.as_slice().is_empty() {
        return Ok(());
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter().rev())
            .for_each(|(d, s)| {
                *d = *s;
            });
    });

    Ok(())
}
