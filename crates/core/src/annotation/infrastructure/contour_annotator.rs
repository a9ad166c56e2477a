use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{OUTLINE_COLOR, OUTLINE_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::region::{Point, Region};

/// Draws each region's closed outline with a square brush.
pub struct ContourAnnotator {
    color: [u8; 3],
    thickness: u32,
}

impl ContourAnnotator {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    fn stamp(&self, frame: &mut Frame, center: Point) {
        let lo = -(self.thickness as i32) / 2;
        let hi = lo + self.thickness as i32 - 1;
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        let mut pixels = frame.as_ndarray_mut();
        for dy in lo..=hi {
            for dx in lo..=hi {
                let (x, y) = (center.x + dx, center.y + dy);
                if x < 0 || y < 0 || x >= w || y >= h {
                    continue;
                }
                for (c, value) in self.color.iter().enumerate() {
                    pixels[[y as usize, x as usize, c]] = *value;
                }
            }
        }
    }

    /// Bresenham line including both endpoints.
    fn draw_line(&self, frame: &mut Frame, from: Point, to: Point) {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let mut p = from;
        loop {
            self.stamp(frame, p);
            if p == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                p.x += sx;
            }
            if e2 <= dx {
                err += dx;
                p.y += sy;
            }
        }
    }
}

impl Default for ContourAnnotator {
    fn default() -> Self {
        Self::new(OUTLINE_COLOR, OUTLINE_THICKNESS)
    }
}

impl FrameAnnotator for ContourAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for region in regions {
            let points = region.points();
            if points.len() == 1 {
                self.stamp(frame, points[0]);
                continue;
            }
            for (i, &from) in points.iter().enumerate() {
                let to = points[(i + 1) % points.len()];
                self.draw_line(frame, from, to);
            }
        }
        Ok(())
    }
}
