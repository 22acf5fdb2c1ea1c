use candle_core::{DType, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};

use super::{BlipConfig, BlipError};

/// Picks the next token from the decoder logits.
pub(crate) struct TokenSampler {
    logits_processor: LogitsProcessor,
    repeat_penalty: f32,
    repeat_last_n: usize,
}

impl TokenSampler {
    pub fn new(config: &BlipConfig) -> Self {
        let sampling = if config.do_sample {
            Sampling::TopP {
                p: config.top_p,
                temperature: config.temp,
            }
        } else {
            Sampling::ArgMax
        };

        Self {
            logits_processor: LogitsProcessor::from_sampling(config.seed, sampling),
            repeat_penalty: config.repeat_penalty,
            repeat_last_n: config.repeat_last_n,
        }
    }

    /// Sample a token from the logits of the last position, penalizing recent `history`.
    pub fn sample(&mut self, logits: &Tensor, history: &[u32]) -> Result<u32, BlipError> {
        let logits = logits.to_dtype(DType::F32)?;

        let logits = if self.repeat_penalty == 1. {
            logits
        } else {
            let start_at = history.len().saturating_sub(self.repeat_last_n);
            candle_transformers::utils::apply_repeat_penalty(
                &logits,
                self.repeat_penalty,
                &history[start_at..],
            )?
        };

        Ok(self.logits_processor.sample(&logits)?)
    }
}

#[cfg(test)]
mod tests {
    use super::TokenSampler;
    use crate::blip::BlipConfig;
    use candle_core::{Device, Tensor};

    #[test]
    fn greedy_picks_max_logit() -> Result<(), Box<dyn std::error::Error>> {
        let mut sampler = TokenSampler::new(&BlipConfig::default());
        let logits = Tensor::new(&[0.1f32, 2.0, 0.5, -1.0], &Device::Cpu)?;

        assert_eq!(sampler.sample(&logits, &[])?, 1);
        assert_eq!(sampler.sample(&logits, &[0, 3])?, 1);

        Ok(())
    }

    #[test]
    fn repeat_penalty_demotes_history() -> Result<(), Box<dyn std::error::Error>> {
        let config = BlipConfig {
            repeat_penalty: 10.,
            ..Default::default()
        };
        let mut sampler = TokenSampler::new(&config);
        let logits = Tensor::new(&[0.1f32, 2.0, 0.5, -1.0], &Device::Cpu)?;

        // 2.0 / 10 falls below 0.5
        assert_eq!(sampler.sample(&logits, &[1])?, 2);

        Ok(())
    }

    #[test]
    fn repeat_penalty_window() -> Result<(), Box<dyn std::error::Error>> {
        let config = BlipConfig {
            repeat_penalty: 10.,
            repeat_last_n: 1,
            ..Default::default()
        };
        let mut sampler = TokenSampler::new(&config);
        let logits = Tensor::new(&[0.1f32, 2.0, 0.5, -1.0], &Device::Cpu)?;

        // token 1 is outside of the penalized window
        assert_eq!(sampler.sample(&logits, &[1, 3])?, 1);

        Ok(())
    }
}
