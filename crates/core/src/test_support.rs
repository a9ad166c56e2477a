//! Stub adapters shared by the recorder and pipeline tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::detection::domain::region_detector::RegionDetector;
use crate::notification::domain::notifier::Notifier;
use crate::recording::domain::episode_naming::Clock;
use crate::recording::domain::episode_recorder::EpisodeRecorder;
use crate::shared::frame::Frame;
use crate::shared::region::{Point, Region};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::video_writer::VideoWriter;

pub const STUB_WIDTH: u32 = 16;
pub const STUB_HEIGHT: u32 = 12;
pub const BACKGROUND: [u8; 3] = [20, 40, 90];

pub struct StubSource {
    remaining: usize,
    next_index: usize,
    fail_after: Option<usize>,
    reachable: bool,
    open: bool,
    pub released: Arc<Mutex<bool>>,
}

impl StubSource {
    pub fn new(frames: usize) -> Self {
        Self {
            remaining: frames,
            next_index: 0,
            fail_after: None,
            reachable: true,
            open: false,
            released: Arc::new(Mutex::new(false)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new(0)
        }
    }

    /// Reads fail once `frames` frames have been delivered.
    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self.remaining = usize::MAX;
        self
    }
}

impl FrameSource for StubSource {
    fn open(&mut self, url: &str) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        if !self.reachable {
            return Err(format!("host unreachable: {url}").into());
        }
        self.open = true;
        Ok(VideoMetadata {
            width: STUB_WIDTH,
            height: STUB_HEIGHT,
            fps: 30.0,
            codec: "stub".into(),
            source_url: Some(url.to_string()),
        })
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if !self.open {
            return Err("source not open".into());
        }
        if self.fail_after == Some(self.next_index) {
            return Err("decode error".into());
        }
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        let frame = Frame::filled(STUB_WIDTH, STUB_HEIGHT, BACKGROUND, self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.open.then_some((STUB_WIDTH, STUB_HEIGHT))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn release(&mut self) {
        self.open = false;
        *self.released.lock().unwrap() = true;
    }
}

/// Reports one fixed square region on frames whose script entry is `true`.
pub struct ScriptedDetector {
    script: Vec<bool>,
    fail: bool,
}

impl ScriptedDetector {
    pub fn new(script: &[bool]) -> Self {
        Self {
            script: script.to_vec(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Vec::new(),
            fail: true,
        }
    }
}

impl RegionDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if self.fail {
            return Err("detector crashed".into());
        }
        let present = self.script.get(frame.index()).copied().unwrap_or(false);
        Ok(if present {
            vec![Region::new(vec![
                Point::new(2, 2),
                Point::new(2, 5),
                Point::new(5, 5),
                Point::new(5, 2),
            ])]
        } else {
            Vec::new()
        })
    }
}

#[derive(Default)]
pub struct WriterLog {
    pub opened: Vec<(PathBuf, VideoMetadata)>,
    pub frames_per_file: Vec<usize>,
    pub closes: usize,
}

pub struct StubWriter {
    log: Arc<Mutex<WriterLog>>,
    pub fail_open: bool,
    pub fail_write_after: Option<usize>,
    pub fail_close: bool,
}

impl StubWriter {
    pub fn new() -> (Self, Arc<Mutex<WriterLog>>) {
        let log = Arc::new(Mutex::new(WriterLog::default()));
        (
            Self {
                log: log.clone(),
                fail_open: false,
                fail_write_after: None,
                fail_close: false,
            },
            log,
        )
    }
}

impl VideoWriter for StubWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.fail_open {
            return Err("read-only file system".into());
        }
        let mut log = self.log.lock().unwrap();
        log.opened.push((path.to_path_buf(), metadata.clone()));
        log.frames_per_file.push(0);
        Ok(())
    }

    fn write(&mut self, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut log = self.log.lock().unwrap();
        let written = log.frames_per_file.last_mut().ok_or("not opened")?;
        if self.fail_write_after == Some(*written) {
            return Err("disk full".into());
        }
        *written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.log.lock().unwrap().closes += 1;
        if self.fail_close {
            return Err("device busy".into());
        }
        Ok(())
    }
}

pub type Notifications = Arc<Mutex<Vec<(String, String)>>>;

pub struct RecordingNotifier {
    sent: Notifications,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Notifications) {
        let sent = Notifications::default();
        (Self { sent: sent.clone() }, sent)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

pub fn titles(notes: &Notifications) -> Vec<String> {
    notes.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
}

/// Always 2024-05-01 12:30:45.
pub fn fixed_clock() -> Clock {
    Box::new(|| {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    })
}

pub fn recorder(writer: StubWriter) -> EpisodeRecorder {
    EpisodeRecorder::new(Box::new(writer), "/recordings").with_clock(fixed_clock())
}
