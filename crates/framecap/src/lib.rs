#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use framecap_image as image;

#[doc(inline)]
pub use framecap_io as io;

#[doc(inline)]
pub use framecap_vlm as vlm;

/// Frame sampling and captioning, from a video path to the printed report.
pub mod pipeline;
