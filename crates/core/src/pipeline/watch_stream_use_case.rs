use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::presentation::domain::frame_presenter::FramePresenter;
use crate::recording::domain::episode_recorder::RecordingEvent;

use super::pipeline_context::{PipelineContext, PipelineParts, StepOutcome};
use super::pipeline_error::PipelineError;

/// Why a run ended without an error.
#[derive(Clone, Debug, PartialEq)]
pub enum StopReason {
    /// The stop flag was set.
    Stopped,
    EndOfStream,
    /// The source failed mid-stream; carries the reader's message.
    ReadFailure(String),
    /// The configured frame limit was reached.
    FrameLimit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub frames_processed: usize,
    pub episodes_completed: usize,
    /// Every recording transition in the order it happened.
    pub events: Vec<RecordingEvent>,
    pub stop_reason: StopReason,
}

/// Watches one stream until it is stopped or runs out.
///
/// Single-use: `execute` consumes the owned components, so a second call
/// fails. Whatever ends the run, the source is released and any open
/// episode is finalized before `execute` returns.
pub struct WatchStreamUseCase {
    parts: Option<PipelineParts>,
    presenter: Option<Box<dyn FramePresenter>>,
    max_frames: Option<usize>,
    cancelled: Arc<AtomicBool>,
}

impl WatchStreamUseCase {
    pub fn new(
        parts: PipelineParts,
        presenter: Option<Box<dyn FramePresenter>>,
        max_frames: Option<usize>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            parts: Some(parts),
            presenter,
            max_frames,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// The flag that stops the run; checked once per frame.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn execute(&mut self, url: &str) -> Result<RunSummary, PipelineError> {
        let parts = self.parts.take().ok_or(PipelineError::AlreadyExecuted)?;
        let mut ctx = PipelineContext::open(url, parts)?;
        let mut events = Vec::new();

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                break StopReason::Stopped;
            }
            if self.max_frames.is_some_and(|max| ctx.frames_processed() >= max) {
                break StopReason::FrameLimit;
            }

            let report = match ctx.step() {
                Ok(StepOutcome::Frame(report)) => report,
                Ok(StepOutcome::EndOfStream) => break StopReason::EndOfStream,
                Ok(StepOutcome::ReadFailure(message)) => break StopReason::ReadFailure(message),
                Err(e) => {
                    if let Err(stop_err) = ctx.stop() {
                        log::warn!("Cleanup after failure: {stop_err}");
                    }
                    return Err(e);
                }
            };

            if let Some(presenter) = self.presenter.as_mut() {
                let t = Instant::now();
                if let Err(e) = presenter.present(&report.frame) {
                    log::warn!("Cannot present frame {}: {e}", report.frame.index());
                }
                ctx.record_timing("present", t.elapsed().as_secs_f64() * 1000.0);
            }
            events.extend(report.event);
        };

        match &stop_reason {
            StopReason::EndOfStream => log::info!("Stream ended"),
            StopReason::ReadFailure(message) => {
                log::warn!("Cannot read frame, watching stopped: {message}")
            }
            StopReason::Stopped => log::info!("Watching stopped"),
            StopReason::FrameLimit => log::info!("Frame limit reached"),
        }

        events.extend(ctx.stop()?);

        Ok(RunSummary {
            frames_processed: ctx.frames_processed(),
            episodes_completed: ctx.recorder().episodes_completed(),
            events,
            stop_reason,
        })
    }
}
