use crate::shared::constants::{FIRE_HSV_LOWER, FIRE_HSV_UPPER};

/// Largest hue on the 8-bit scale (degrees halved).
pub const HUE_MAX: i32 = 180;
pub const SAT_VAL_MAX: i32 = 255;

/// Inclusive per-channel HSV bounds deciding which pixels count as fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [i32; 3],
    pub upper: [i32; 3],
}

impl ColorRange {
    pub const FIRE: ColorRange = ColorRange {
        lower: FIRE_HSV_LOWER,
        upper: FIRE_HSV_UPPER,
    };

    pub const fn new(lower: [i32; 3], upper: [i32; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [i32; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    pub fn contains_rgb(&self, rgb: [u8; 3]) -> bool {
        self.contains(rgb_to_hsv(rgb))
    }

    /// True when any bound lies outside the representable HSV domain.
    ///
    /// The fire range does: hue and saturation go negative and value goes
    /// past 255. Only the clipped part of such a range can ever match.
    pub fn exceeds_hsv_domain(&self) -> bool {
        let max = [HUE_MAX, SAT_VAL_MAX, SAT_VAL_MAX];
        (0..3).any(|c| self.lower[c] < 0 || self.upper[c] > max[c])
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::FIRE
    }
}

/// Converts an RGB pixel to 8-bit HSV: H in 0..=180 (degrees / 2),
/// S and V in 0..=255. Achromatic pixels get hue 0.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [i32; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta as f64 / max as f64).round() as i32
    };

    let h = if delta == 0 {
        0
    } else {
        let (base, diff) = if max == r {
            (0.0, g - b)
        } else if max == g {
            (120.0, b - r)
        } else {
            (240.0, r - g)
        };
        let mut degrees = base + 60.0 * diff as f64 / delta as f64;
        if degrees < 0.0 {
            degrees += 360.0;
        }
        (degrees / 2.0).round() as i32
    };

    [h, s, max]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([0, 0, 0], [0, 0, 0])]
    #[case([255, 255, 255], [0, 0, 255])]
    #[case([255, 0, 0], [0, 255, 255])]
    #[case([0, 255, 0], [60, 255, 255])]
    #[case([0, 0, 255], [120, 255, 255])]
    #[case([255, 230, 220], [9, 35, 255])]
    #[case([128, 128, 128], [0, 0, 128])]
    fn test_rgb_to_hsv(#[case] rgb: [u8; 3], #[case] expected: [i32; 3]) {
        assert_eq!(rgb_to_hsv(rgb), expected);
    }

    #[rstest]
    #[case::white([255, 255, 255], true)]
    #[case::pale_flame_core([255, 230, 220], true)]
    #[case::bright_gray([210, 210, 210], true)]
    #[case::dim_gray([200, 200, 200], false)]
    #[case::saturated_red([255, 0, 0], false)]
    #[case::pale_blue([220, 230, 255], false)]
    #[case::black([0, 0, 0], false)]
    fn test_fire_range_membership(#[case] rgb: [u8; 3], #[case] expected: bool) {
        assert_eq!(ColorRange::FIRE.contains_rgb(rgb), expected);
    }

    #[test]
    fn test_fire_range_keeps_literal_bounds() {
        assert_eq!(ColorRange::default().lower, [-10, -50, 205]);
        assert_eq!(ColorRange::default().upper, [10, 50, 305]);
        assert!(ColorRange::FIRE.exceeds_hsv_domain());
    }

    #[test]
    fn test_in_domain_range_is_not_flagged() {
        let range = ColorRange::new([0, 86, 205], [17, 186, 255]);
        assert!(!range.exceeds_hsv_domain());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = ColorRange::new([0, 0, 205], [10, 50, 255]);
        assert!(range.contains([0, 0, 205]));
        assert!(range.contains([10, 50, 255]));
        assert!(!range.contains([11, 50, 255]));
        assert!(!range.contains([10, 50, 204]));
    }
}
