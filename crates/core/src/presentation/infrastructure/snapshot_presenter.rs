use std::path::{Path, PathBuf};

use crate::presentation::domain::frame_presenter::FramePresenter;
use crate::shared::frame::Frame;

/// Keeps an image file updated with the latest annotated frame, using the
/// `image` crate.
///
/// Only every `every`-th frame is written. The file is replaced via rename
/// so viewers never see a partial image.
pub struct SnapshotPresenter {
    path: PathBuf,
    every: usize,
    max_width: Option<u32>,
    seen: usize,
}

impl SnapshotPresenter {
    pub fn new(path: impl Into<PathBuf>, every: usize) -> Self {
        Self {
            path: path.into(),
            every: every.max(1),
            max_width: None,
            seen: 0,
        }
    }

    /// Downscale snapshots wider than `width`, keeping the aspect ratio.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width.max(1));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let img = match self.max_width {
            Some(max) if img.width() > max => {
                let height = (img.height() as u64 * max as u64 / img.width() as u64).max(1);
                let filter = image::imageops::FilterType::Triangle;
                image::imageops::resize(&img, max, height as u32, filter)
            }
            _ => img,
        };

        let format = image::ImageFormat::from_path(&self.path)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        img.save_with_format(&tmp, format)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FramePresenter for SnapshotPresenter {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let due = self.seen % self.every == 0;
        self.seen += 1;
        if due {
            self.write(frame)?;
        }
        Ok(())
    }
}
