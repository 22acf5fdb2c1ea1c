use std::fmt::Display;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use framecap_io::{sample_frames, FrameSource, SampledFrame, SamplerError};
use framecap_vlm::Captioner;

/// The result of captioning one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptionOutcome {
    /// The generated caption.
    Caption(String),
    /// The description of the error that prevented captioning.
    Failed(String),
}

impl<E: Display> From<Result<String, E>> for CaptionOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(caption) => CaptionOutcome::Caption(single_line(&caption)),
            Err(e) => CaptionOutcome::Failed(single_line(&e.to_string())),
        }
    }
}

// one report line per frame, whatever the text contains
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which number a report line is labeled with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameLabel {
    /// Position in the sampled sequence: 0, 1, 2, ...
    #[default]
    Ordinal,
    /// Position in the decoded stream: 0, N, 2N, ...
    SourceIndex,
}

/// A caption or captioning failure for one sampled frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionRecord {
    /// Position of the frame in the sampled sequence, starting at 0.
    pub ordinal: usize,
    /// Position of the frame in the decoded stream.
    pub source_index: usize,
    /// The caption or the failure.
    pub outcome: CaptionOutcome,
}

impl CaptionRecord {
    /// Render the record as a single report line.
    ///
    /// # Examples
    ///
    /// ```
    /// use framecap::pipeline::{CaptionOutcome, CaptionRecord, FrameLabel};
    ///
    /// let record = CaptionRecord {
    ///     ordinal: 2,
    ///     source_index: 120,
    ///     outcome: CaptionOutcome::Caption("a dog on a beach".to_string()),
    /// };
    ///
    /// assert_eq!(record.render(FrameLabel::Ordinal), "[Frame 2] a dog on a beach");
    /// assert_eq!(record.render(FrameLabel::SourceIndex), "[Frame 120] a dog on a beach");
    /// ```
    pub fn render(&self, label: FrameLabel) -> String {
        let number = match label {
            FrameLabel::Ordinal => self.ordinal,
            FrameLabel::SourceIndex => self.source_index,
        };
        match &self.outcome {
            CaptionOutcome::Caption(caption) => format!("[Frame {number}] {caption}"),
            CaptionOutcome::Failed(error) => format!("[Frame {number}] Caption failed: {error}"),
        }
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The video path does not exist. Nothing was decoded.
    FileNotFound(PathBuf),
    /// Extraction produced no frames. Nothing was captioned.
    NoFrames,
    /// Every sampled frame went through the captioner, in order.
    Captioned(Vec<CaptionRecord>),
}

impl Outcome {
    /// Whether captioning ran, regardless of per-frame failures.
    pub fn is_captioned(&self) -> bool {
        matches!(self, Outcome::Captioned(_))
    }

    /// Render the report printed for this outcome.
    ///
    /// Captioned runs produce one line per sampled frame, other outcomes a single warning line.
    pub fn render(&self, label: FrameLabel) -> String {
        match self {
            Outcome::FileNotFound(path) => {
                format!("⚠️ Video file not found: {}", path.display())
            }
            Outcome::NoFrames => "⚠️ No frames extracted.".to_string(),
            Outcome::Captioned(records) => records
                .iter()
                .map(|record| record.render(label))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Caption every sampled frame in order.
///
/// A failure on one frame becomes a [`CaptionOutcome::Failed`] record and does not stop the
/// remaining frames.
pub fn caption_frames<C: Captioner + ?Sized>(
    captioner: &mut C,
    frames: &[SampledFrame],
) -> Vec<CaptionRecord> {
    frames
        .iter()
        .enumerate()
        .map(|(ordinal, frame)| {
            let result = captioner.caption(&frame.image);
            if let Err(e) = &result {
                log::warn!(
                    "caption failed for frame {ordinal} (decoded #{}): {e}",
                    frame.source_index
                );
            }
            CaptionRecord {
                ordinal,
                source_index: frame.source_index,
                outcome: result.into(),
            }
        })
        .collect()
}

fn captioned_or_warning<C: Captioner + ?Sized>(
    sampled: Result<Vec<SampledFrame>, SamplerError>,
    captioner: &mut C,
) -> Outcome {
    match sampled {
        Ok(frames) => {
            log::debug!("captioning {} frames", frames.len());
            Outcome::Captioned(caption_frames(captioner, &frames))
        }
        Err(SamplerError::FileNotFound(path)) => Outcome::FileNotFound(path),
        Err(SamplerError::NoFrames) => Outcome::NoFrames,
        Err(e) => {
            log::error!("frame extraction failed: {e}");
            Outcome::NoFrames
        }
    }
}

/// Sample a frame source and caption the sampled frames.
pub fn run_with_source<S, C>(source: &mut S, interval: NonZeroUsize, captioner: &mut C) -> Outcome
where
    S: FrameSource + ?Sized,
    C: Captioner + ?Sized,
{
    captioned_or_warning(sample_frames(source, interval.get()), captioner)
}

/// Decode a video file, keep every `interval`-th frame and caption each of them.
///
/// # Arguments
///
/// * `path` - The video file to decode.
/// * `interval` - The spacing between sampled frames.
/// * `captioner` - The loaded captioning model, reused for every frame.
#[cfg(feature = "gstreamer")]
pub fn run<C: Captioner + ?Sized>(
    path: impl AsRef<std::path::Path>,
    interval: NonZeroUsize,
    captioner: &mut C,
) -> Outcome {
    let sampled = framecap_io::sample_video_file(path, interval.get());
    captioned_or_warning(sampled, captioner)
}
