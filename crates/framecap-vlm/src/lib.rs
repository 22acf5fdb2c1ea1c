//! # Frame captioning models
//!
//! Pretrained image-to-text models that describe a single video frame in natural language.
//!
//! - **BLIP**: Salesforce's bootstrapped language-image model, in its base and large
//!   image-captioning variants, running on [candle](https://github.com/huggingface/candle).
//!
//! Models are loaded once into an owned context (see [`blip::Blip::new`]) that fixes the
//! compute device for its whole lifetime, and are driven frame by frame through the
//! [`Captioner`] trait.

/// BLIP image captioning model integration.
pub mod blip;

mod captioner;
mod device;

pub use captioner::Captioner;
