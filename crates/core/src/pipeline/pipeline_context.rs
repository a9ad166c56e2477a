use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::region_detector::RegionDetector;
use crate::notification::domain::notifier::Notifier;
use crate::recording::domain::episode_recorder::{EpisodeRecorder, RecordingEvent};
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

use super::pipeline_error::PipelineError;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// The components one watch run is assembled from.
pub struct PipelineParts {
    pub source: Box<dyn FrameSource>,
    pub detector: Box<dyn RegionDetector>,
    /// `None` disables annotation; detection and recording are unaffected.
    pub annotator: Option<Box<dyn FrameAnnotator>>,
    pub recorder: EpisodeRecorder,
    pub notifier: Box<dyn Notifier>,
    pub logger: Box<dyn PipelineLogger>,
}

impl PipelineParts {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn RegionDetector>,
        annotator: Option<Box<dyn FrameAnnotator>>,
        recorder: EpisodeRecorder,
        notifier: Box<dyn Notifier>,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Self {
        Self {
            source,
            detector,
            annotator,
            recorder,
            notifier,
            logger: logger.unwrap_or_else(|| Box::new(NullPipelineLogger)),
        }
    }
}

/// Everything the host needs to display one processed frame.
#[derive(Debug)]
pub struct FrameReport {
    /// The frame as recorded: annotated unless annotation is disabled.
    pub frame: Frame,
    pub regions: Vec<Region>,
    /// Transition raised by this frame, if any.
    pub event: Option<RecordingEvent>,
    pub recording: bool,
}

#[derive(Debug)]
pub enum StepOutcome {
    Frame(FrameReport),
    EndOfStream,
    ReadFailure(String),
}

/// An open stream plus the detection/recording state for it.
///
/// Hosts that schedule frames themselves call [`step`](Self::step) once per
/// tick and [`stop`](Self::stop) when done; after any `Err` from `step` the
/// host must still call `stop` to release the source.
pub struct PipelineContext {
    parts: PipelineParts,
    metadata: VideoMetadata,
    frames_processed: usize,
    stopped: bool,
}

impl PipelineContext {
    /// Opens `url`. On failure nothing has been read and no file exists.
    pub fn open(url: &str, mut parts: PipelineParts) -> Result<Self, PipelineError> {
        let metadata = match parts.source.open(url) {
            Ok(metadata) => metadata,
            Err(e) => {
                parts.source.release();
                return Err(PipelineError::SourceUnavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        parts.logger.info(&format!(
            "Watching {url} ({}x{} @ {:.1} fps)",
            metadata.width, metadata.height, metadata.fps
        ));

        Ok(Self {
            parts,
            metadata,
            frames_processed: 0,
            stopped: false,
        })
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn recorder(&self) -> &EpisodeRecorder {
        &self.parts.recorder
    }

    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Reads, detects, annotates and records one frame.
    pub fn step(&mut self) -> Result<StepOutcome, PipelineError> {
        if self.stopped {
            return Ok(StepOutcome::EndOfStream);
        }

        let t = Instant::now();
        let read = self.parts.source.read_frame();
        self.parts.logger.timing("read", elapsed_ms(t));
        let mut frame = match read {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(StepOutcome::EndOfStream),
            Err(e) => {
                log::warn!("Cannot read frame: {e}");
                return Ok(StepOutcome::ReadFailure(e.to_string()));
            }
        };

        let t = Instant::now();
        let regions = self
            .parts
            .detector
            .detect(&frame)
            .map_err(|e| PipelineError::Detection(e.to_string()))?;
        self.parts.logger.timing("detect", elapsed_ms(t));
        self.parts.logger.metric("regions", regions.len() as f64);
        log::debug!("Frame {}: {} region(s)", frame.index(), regions.len());

        if let Some(annotator) = &self.parts.annotator {
            let t = Instant::now();
            annotator
                .annotate(&mut frame, &regions)
                .map_err(|e| PipelineError::Annotation(e.to_string()))?;
            self.parts.logger.timing("annotate", elapsed_ms(t));
        }

        let t = Instant::now();
        let dimensions = self
            .parts
            .source
            .dimensions()
            .unwrap_or_else(|| frame.dimensions());
        let event = self
            .parts
            .recorder
            .observe(!regions.is_empty(), dimensions)?;
        if let Some(event) = &event {
            self.parts.notifier.notify(event.title(), event.message());
        }
        self.parts.recorder.write(&frame)?;
        self.parts.logger.timing("record", elapsed_ms(t));

        self.frames_processed += 1;
        self.parts.logger.progress(self.frames_processed);

        Ok(StepOutcome::Frame(FrameReport {
            frame,
            regions,
            event,
            recording: self.parts.recorder.is_recording(),
        }))
    }

    /// Releases the source and finalizes an open episode, reporting
    /// `RecordingFinished`. Idempotent.
    pub fn stop(&mut self) -> Result<Option<RecordingEvent>, PipelineError> {
        if self.stopped {
            return Ok(None);
        }
        self.stopped = true;
        self.parts.source.release();

        let event = self.parts.recorder.stop()?;
        if let Some(event) = &event {
            self.parts.notifier.notify(event.title(), event.message());
        }
        self.parts.logger.summary();
        Ok(event)
    }

    /// Forwards a timing measured outside the context (e.g. presentation).
    pub fn record_timing(&mut self, stage: &str, duration_ms: f64) {
        self.parts.logger.timing(stage, duration_ms);
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
