use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for finding fire-colored regions in a frame.
///
/// An empty result means nothing was detected in this frame.
pub trait RegionDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
