use crate::shared::frame::Frame;

/// Renders the annotated frame of each iteration to some visible surface.
///
/// Failures are reported to the loop, which logs them and keeps going.
pub trait FramePresenter: Send {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
