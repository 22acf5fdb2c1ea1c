mod generation;
mod preprocessor;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::blip;
use framecap_image::Image;
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;

use crate::{captioner::Captioner, device::select_device};
use generation::TokenSampler;
use preprocessor::BlipImagePreprocessor;

/// The `[DEC]` token that starts every generated caption.
const BOS_TOKEN_ID: u32 = 30522;
/// The `[SEP]` token that ends a caption.
const SEP_TOKEN_ID: u32 = 102;

/// The checkpoints generate up to `max_length = 20` tokens, `[DEC]` included.
pub const DEFAULT_MAX_NEW_TOKENS: usize = 19;

#[derive(thiserror::Error, Debug)]
pub enum BlipError {
    #[error(transparent)]
    FailedToLoadModel(#[from] hf_hub::api::sync::ApiError),

    #[error(transparent)]
    CandleError(#[from] candle_core::Error),

    #[error(transparent)]
    ImageError(#[from] framecap_image::ImageError),

    #[error(transparent)]
    TokenizerError(#[from] tokenizers::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    #[error("Unknown BLIP variant: {0} (expected `base` or `large`)")]
    UnknownVariant(String),
}

/// The pretrained BLIP image-captioning checkpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlipVariant {
    /// `Salesforce/blip-image-captioning-base`, ViT-B/16 vision encoder.
    #[default]
    Base,
    /// `Salesforce/blip-image-captioning-large`, ViT-L/16 vision encoder.
    Large,
}

impl BlipVariant {
    /// The Hugging Face Hub identifier of the checkpoint.
    pub fn model_id(&self) -> &'static str {
        match self {
            BlipVariant::Base => "Salesforce/blip-image-captioning-base",
            BlipVariant::Large => "Salesforce/blip-image-captioning-large",
        }
    }

    /// The architecture of the checkpoint.
    pub fn config(&self) -> blip::Config {
        let mut config = blip::Config::image_captioning_large();
        if *self == BlipVariant::Base {
            config.vision_config.hidden_size = 768;
            config.vision_config.intermediate_size = 3072;
            config.vision_config.num_hidden_layers = 12;
            config.vision_config.num_attention_heads = 12;
            config.text_config.encoder_hidden_size = 768;
        }
        config
    }
}

impl FromStr for BlipVariant {
    type Err = BlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(BlipVariant::Base),
            "large" => Ok(BlipVariant::Large),
            _ => Err(BlipError::UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for the BLIP model
#[derive(Clone, Debug)]
pub struct BlipConfig {
    pub variant: BlipVariant,
    /// Overrides the Hub repository of `variant`, which still defines the architecture.
    pub model_id: Option<String>,
    pub revision: String,
    /// Local `model.safetensors` to use instead of downloading it.
    pub weights_path: Option<PathBuf>,
    /// Local `tokenizer.json` to use instead of downloading it.
    pub tokenizer_path: Option<PathBuf>,
    pub max_new_tokens: usize,
    pub do_sample: bool,
    pub seed: u64,
    pub temp: f64,
    pub top_p: f64,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
    pub force_cpu: bool,
}

impl Default for BlipConfig {
    fn default() -> Self {
        Self {
            variant: BlipVariant::Base,
            model_id: None,
            revision: "main".to_string(),
            weights_path: None,
            tokenizer_path: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            do_sample: false,
            seed: 299792458,
            temp: 1.0,
            top_p: 0.9,
            repeat_penalty: 1.0,
            repeat_last_n: 64,
            force_cpu: false,
        }
    }
}

/// The BLIP captioning model
///
/// Owns the weights, tokenizer and compute device. The device is selected once in [`Blip::new`]
/// and every frame tensor is created on it.
///
/// NOTE: to run the model with Cuda, you need to pass the `--features cuda` flag to the `cargo run` command.
pub struct Blip {
    model: blip::BlipForConditionalGeneration,
    tokenizer: Tokenizer,
    preprocessor: BlipImagePreprocessor,
    sampler: TokenSampler,
    max_new_tokens: usize,
    device: Device,
    dtype: DType,
}

impl Blip {
    /// Create a new BLIP model
    ///
    /// Downloads the weights and tokenizer from the Hugging Face Hub unless local paths are
    /// given in the configuration.
    pub fn new(config: BlipConfig) -> Result<Self, BlipError> {
        let (device, dtype) = select_device(config.force_cpu);
        log::debug!("loading {:?} on {device:?} ({dtype:?})", config.variant);

        let architecture = config.variant.config();
        let (model, tokenizer) = Self::load_model(&config, &architecture, dtype, &device)?;
        let preprocessor = BlipImagePreprocessor::new(architecture.vision_config.image_size)?;

        Ok(Self {
            model,
            tokenizer,
            preprocessor,
            sampler: TokenSampler::new(&config),
            max_new_tokens: config.max_new_tokens,
            device,
            dtype,
        })
    }

    /// The device the model and every frame tensor live on.
    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Run the inference of the BLIP model
    ///
    /// # Arguments
    ///
    /// * `frame` - The bgr8 frame to generate a caption for with shape [H, W, 3]
    ///
    /// # Returns
    ///
    /// * `caption` - The generated caption
    pub fn inference(&mut self, frame: &Image<u8, 3>) -> Result<String, BlipError> {
        let start = Instant::now();

        let pixel_values = self
            .preprocessor
            .preprocess(frame, &self.device, self.dtype)?;
        let image_embeds = pixel_values.apply(self.model.vision_model())?;

        // the cache is cleared even on failure so the next frame starts fresh
        let tokens = self.generate(&image_embeds);
        self.model.reset_kv_cache();
        let tokens = tokens?;

        let caption = self.tokenizer.decode(&tokens, true)?;
        log::debug!(
            "generated {} tokens in {:.2?}",
            tokens.len().saturating_sub(1),
            start.elapsed()
        );

        Ok(caption.trim().to_string())
    }

    fn generate(&mut self, image_embeds: &Tensor) -> Result<Vec<u32>, BlipError> {
        let mut token_ids = vec![BOS_TOKEN_ID];

        for index in 0..self.max_new_tokens {
            let context_size = if index > 0 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self
                .model
                .text_decoder()
                .forward(&input_ids, image_embeds)?
                .squeeze(0)?;
            let last_logits = logits.get(logits.dim(0)? - 1)?;

            let token = self.sampler.sample(&last_logits, &token_ids)?;
            if token == SEP_TOKEN_ID {
                break;
            }
            token_ids.push(token);
        }

        Ok(token_ids)
    }

    // utility function to load the model
    fn load_model(
        config: &BlipConfig,
        architecture: &blip::Config,
        dtype: DType,
        device: &Device,
    ) -> Result<(blip::BlipForConditionalGeneration, Tokenizer), BlipError> {
        for path in [&config.weights_path, &config.tokenizer_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(BlipError::FileNotFound(path.clone()));
            }
        }

        let (weights_filename, tokenizer_filename) =
            match (&config.weights_path, &config.tokenizer_path) {
                (Some(weights), Some(tokenizer)) => (weights.clone(), tokenizer.clone()),
                (weights, tokenizer) => {
                    let model_id = config
                        .model_id
                        .clone()
                        .unwrap_or_else(|| config.variant.model_id().to_string());
                    log::debug!("fetching {model_id}@{} from the hub", config.revision);

                    let api = Api::new()?;
                    let repo = api.repo(Repo::with_revision(
                        model_id,
                        RepoType::Model,
                        config.revision.clone(),
                    ));

                    let weights = match weights {
                        Some(weights) => weights.clone(),
                        None => repo.get("model.safetensors")?,
                    };
                    let tokenizer = match tokenizer {
                        Some(tokenizer) => tokenizer.clone(),
                        None => repo.get("tokenizer.json")?,
                    };
                    (weights, tokenizer)
                }
            };

        let tokenizer = Tokenizer::from_file(tokenizer_filename)?;

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_filename], dtype, device)? };
        let model = blip::BlipForConditionalGeneration::new(architecture, vb)?;

        Ok((model, tokenizer))
    }
}

impl Captioner for Blip {
    type Error = BlipError;

    fn caption(&mut self, frame: &Image<u8, 3>) -> Result<String, BlipError> {
        self.inference(frame)
    }
}
