use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::recording::domain::episode_naming::{episode_path, local_clock, Clock};
use crate::recording::domain::recorder_error::RecorderError;
use crate::shared::constants::{
    FIRE_CLEARED_MESSAGE, FIRE_CLEARED_TITLE, FIRE_DETECTED_MESSAGE, FIRE_DETECTED_TITLE,
    RECORDING_FINISHED_MESSAGE, RECORDING_FINISHED_TITLE, RECORDING_FPS,
};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// One continuous span of frames with at least one detected region.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingEpisode {
    pub started_at: NaiveDateTime,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frames_written: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RecorderState {
    Idle,
    Active(RecordingEpisode),
}

/// Transition outcomes the host is told about (and notified of).
#[derive(Clone, Debug, PartialEq)]
pub enum RecordingEvent {
    /// Idle -> Active: a new episode file was opened.
    FireDetected { path: PathBuf },
    /// Active -> Idle because regions disappeared.
    FireCleared { path: PathBuf, frames: usize },
    /// Active -> Idle because the pipeline was stopped.
    RecordingFinished { path: PathBuf, frames: usize },
}

impl RecordingEvent {
    pub fn title(&self) -> &'static str {
        match self {
            RecordingEvent::FireDetected { .. } => FIRE_DETECTED_TITLE,
            RecordingEvent::FireCleared { .. } => FIRE_CLEARED_TITLE,
            RecordingEvent::RecordingFinished { .. } => RECORDING_FINISHED_TITLE,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RecordingEvent::FireDetected { .. } => FIRE_DETECTED_MESSAGE,
            RecordingEvent::FireCleared { .. } => FIRE_CLEARED_MESSAGE,
            RecordingEvent::RecordingFinished { .. } => RECORDING_FINISHED_MESSAGE,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            RecordingEvent::FireDetected { path }
            | RecordingEvent::FireCleared { path, .. }
            | RecordingEvent::RecordingFinished { path, .. } => path,
        }
    }
}

/// Record/not-record state machine driven by per-frame detection results.
///
/// Call [`observe`](Self::observe) with the current frame's result first,
/// then [`write`](Self::write) with the frame: a frame lands in the file iff
/// an episode is open after its own result was observed. At most one
/// episode is open at a time; every error path leaves the recorder `Idle`
/// with the writer closed.
pub struct EpisodeRecorder {
    writer: Box<dyn VideoWriter>,
    output_dir: PathBuf,
    clock: Clock,
    state: RecorderState,
    episodes_completed: usize,
}

impl EpisodeRecorder {
    pub fn new(writer: Box<dyn VideoWriter>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            output_dir: output_dir.into(),
            clock: local_clock(),
            state: RecorderState::Idle,
            episodes_completed: 0,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Active(_))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn episodes_completed(&self) -> usize {
        self.episodes_completed
    }

    /// Applies one frame's detection result to the state machine.
    ///
    /// `dimensions` is the source's current frame size, captured when an
    /// episode starts.
    pub fn observe(
        &mut self,
        regions_present: bool,
        dimensions: (u32, u32),
    ) -> Result<Option<RecordingEvent>, RecorderError> {
        match (self.is_recording(), regions_present) {
            (false, true) => self.begin(dimensions).map(Some),
            (true, false) => Ok(self
                .finalize()?
                .map(|ep| RecordingEvent::FireCleared {
                    path: ep.path,
                    frames: ep.frames_written,
                })),
            _ => Ok(None),
        }
    }

    /// Appends `frame` to the open episode. No-op while idle.
    pub fn write(&mut self, frame: &Frame) -> Result<(), RecorderError> {
        let RecorderState::Active(episode) = &mut self.state else {
            return Ok(());
        };

        match self.writer.write(frame) {
            Ok(()) => {
                episode.frames_written += 1;
                Ok(())
            }
            Err(e) => {
                let path = episode.path.clone();
                self.state = RecorderState::Idle;
                if let Err(close_err) = self.writer.close() {
                    log::warn!("Closing {} after a failed write: {close_err}", path.display());
                }
                Err(RecorderError::Write {
                    path,
                    frame_index: frame.index(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// External stop: finalizes an open episode like a normal end, but
    /// reports `RecordingFinished`.
    pub fn stop(&mut self) -> Result<Option<RecordingEvent>, RecorderError> {
        Ok(self
            .finalize()?
            .map(|ep| RecordingEvent::RecordingFinished {
                path: ep.path,
                frames: ep.frames_written,
            }))
    }

    fn begin(&mut self, dimensions: (u32, u32)) -> Result<RecordingEvent, RecorderError> {
        let started_at = (self.clock)();
        let path = episode_path(&self.output_dir, started_at);
        let (width, height) = dimensions;
        let metadata = VideoMetadata::for_output(width, height, RECORDING_FPS);

        if let Err(e) = self.writer.open(&path, &metadata) {
            if let Err(close_err) = self.writer.close() {
                log::warn!("Closing {} after a failed open: {close_err}", path.display());
            }
            return Err(RecorderError::Create {
                path,
                message: e.to_string(),
            });
        }

        log::info!("Fire detected, recording {width}x{height} to {}", path.display());
        self.state = RecorderState::Active(RecordingEpisode {
            started_at,
            path: path.clone(),
            width,
            height,
            frames_written: 0,
        });
        Ok(RecordingEvent::FireDetected { path })
    }

    fn finalize(&mut self) -> Result<Option<RecordingEpisode>, RecorderError> {
        let RecorderState::Active(episode) = std::mem::replace(&mut self.state, RecorderState::Idle)
        else {
            return Ok(None);
        };

        self.writer.close().map_err(|e| RecorderError::Finalize {
            path: episode.path.clone(),
            message: e.to_string(),
        })?;

        self.episodes_completed += 1;
        log::info!(
            "Saved {} ({} frames)",
            episode.path.display(),
            episode.frames_written
        );
        Ok(Some(episode))
    }
}

impl Drop for EpisodeRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            log::warn!("{e}");
        }
    }
}
