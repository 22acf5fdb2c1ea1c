use argh::FromArgs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use framecap::io::DEFAULT_FRAME_INTERVAL;
use framecap::pipeline::{self, FrameLabel, Outcome};
use framecap::vlm::blip::{Blip, BlipConfig, BlipVariant, DEFAULT_MAX_NEW_TOKENS};

#[derive(FromArgs)]
/// Caption every Nth frame of a video using a pretrained BLIP model
struct Args {
    /// path to the input video file
    #[argh(positional)]
    video_path: Option<PathBuf>,

    /// keep one frame out of every `interval` decoded frames
    #[argh(option, short = 'n', default = "DEFAULT_FRAME_INTERVAL")]
    interval: usize,

    /// the pretrained checkpoint: base or large
    #[argh(option, default = "BlipVariant::Base")]
    variant: BlipVariant,

    /// hub repository to download the weights from instead of the variant's
    #[argh(option)]
    model_id: Option<String>,

    /// hub revision of the model repository
    #[argh(option, default = "String::from(\"main\")")]
    revision: String,

    /// local model.safetensors file
    #[argh(option)]
    weights: Option<PathBuf>,

    /// local tokenizer.json file
    #[argh(option)]
    tokenizer: Option<PathBuf>,

    /// the maximum number of tokens generated per caption
    #[argh(option, default = "DEFAULT_MAX_NEW_TOKENS")]
    max_new_tokens: usize,

    /// run on the cpu even if a gpu is available
    #[argh(switch)]
    cpu: bool,

    /// label lines with the decoded frame index instead of the sample position
    #[argh(switch)]
    source_index: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Args = argh::from_env();

    let Some(video_path) = args.video_path else {
        println!("❌ Usage: framecap <video_path>");
        return ExitCode::from(2);
    };

    let Some(interval) = NonZeroUsize::new(args.interval) else {
        println!("❌ The frame interval must be at least 1.");
        return ExitCode::from(2);
    };

    let label = if args.source_index {
        FrameLabel::SourceIndex
    } else {
        FrameLabel::Ordinal
    };

    // before the model is loaded
    if !video_path.exists() {
        println!("{}", Outcome::FileNotFound(video_path).render(label));
        return ExitCode::FAILURE;
    }

    let config = BlipConfig {
        variant: args.variant,
        model_id: args.model_id,
        revision: args.revision,
        weights_path: args.weights,
        tokenizer_path: args.tokenizer,
        max_new_tokens: args.max_new_tokens,
        force_cpu: args.cpu,
        ..Default::default()
    };

    let mut blip = match Blip::new(config) {
        Ok(blip) => blip,
        Err(e) => {
            println!("❌ Failed to load the captioning model: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("captioning model ready on {:?}", blip.device());

    let outcome = pipeline::run(&video_path, interval, &mut blip);
    println!("{}", outcome.render(label));

    if outcome.is_captioned() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
