/// Properties of an opened stream, or of an episode file being written.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub source_url: Option<String>,
}

impl VideoMetadata {
    /// Metadata for an output file of the given size at a fixed frame rate label.
    pub fn for_output(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            codec: String::new(),
            source_url: None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_output_has_no_source() {
        let meta = VideoMetadata::for_output(640, 480, 25.0);
        assert_eq!(meta.dimensions(), (640, 480));
        assert_eq!(meta.fps, 25.0);
        assert!(meta.source_url.is_none());
        assert!(meta.codec.is_empty());
    }
}
