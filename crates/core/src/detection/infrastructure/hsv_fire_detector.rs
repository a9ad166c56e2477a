use crate::detection::domain::color_range::ColorRange;
use crate::detection::domain::contour_tracer::find_external_contours;
use crate::detection::domain::mask::Mask;
use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::constants::{DILATE_ITERATIONS, ERODE_ITERATIONS, MORPH_KERNEL_SIZE};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Color-threshold detector: HSV range mask, erode/dilate cleanup, then
/// external contours of what survives.
pub struct HsvFireDetector {
    range: ColorRange,
    kernel_size: usize,
    erode_iterations: usize,
    dilate_iterations: usize,
}

impl HsvFireDetector {
    pub fn new(range: ColorRange) -> Self {
        if range.exceeds_hsv_domain() {
            log::debug!(
                "Color range {:?}..{:?} extends outside the HSV domain; only its clipped part can match",
                range.lower,
                range.upper
            );
        }
        Self {
            range,
            kernel_size: MORPH_KERNEL_SIZE,
            erode_iterations: ERODE_ITERATIONS,
            dilate_iterations: DILATE_ITERATIONS,
        }
    }

    pub fn range(&self) -> &ColorRange {
        &self.range
    }

    /// Thresholded and cleaned mask, before contour extraction.
    pub fn mask(&self, frame: &Frame) -> Mask {
        Mask::from_frame(frame, &self.range)
            .erode(self.kernel_size, self.erode_iterations)
            .dilate(self.kernel_size, self.dilate_iterations)
    }
}

impl Default for HsvFireDetector {
    fn default() -> Self {
        Self::new(ColorRange::FIRE)
    }
}

impl RegionDetector for HsvFireDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mask = self.mask(frame);
        if mask.is_empty() {
            return Ok(Vec::new());
        }
        Ok(find_external_contours(&mask))
    }
}
