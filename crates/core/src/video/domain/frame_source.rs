use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Pulls frames one at a time from a streaming source identified by a URL.
///
/// Implementations handle transport and decoding; the pipeline only sees
/// RGB `Frame`s. A source is opened once and never retried.
pub trait FrameSource: Send {
    /// Opens the stream and returns its metadata.
    fn open(&mut self, url: &str) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Decodes the next frame. `Ok(None)` means the stream has ended.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Current frame size, or `None` when not open.
    fn dimensions(&self) -> Option<(u32, u32)>;

    fn is_open(&self) -> bool;

    /// Releases the stream. Safe to call more than once.
    fn release(&mut self);
}
