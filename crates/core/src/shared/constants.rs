/// Lower HSV bound of the fire color range (8-bit scale: H 0..180, S/V 0..255).
///
/// Hue and saturation extend below zero and value above 255. The literal
/// bounds are kept as-is; see `ColorRange::exceeds_hsv_domain`.
pub const FIRE_HSV_LOWER: [i32; 3] = [-10, -50, 205];
pub const FIRE_HSV_UPPER: [i32; 3] = [10, 50, 305];

/// Side of the square structuring element used for erosion and dilation.
pub const MORPH_KERNEL_SIZE: usize = 5;
pub const ERODE_ITERATIONS: usize = 1;
pub const DILATE_ITERATIONS: usize = 2;

/// Frame rate written into episode files, independent of arrival rate.
pub const RECORDING_FPS: f64 = 25.0;

pub const EPISODE_FILE_PREFIX: &str = "fire_";
pub const EPISODE_FILE_EXTENSION: &str = "mp4";
pub const EPISODE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub const OUTLINE_COLOR: [u8; 3] = [255, 0, 0];
pub const OUTLINE_THICKNESS: u32 = 2;

pub const FIRE_DETECTED_TITLE: &str = "Fire Detected";
pub const FIRE_DETECTED_MESSAGE: &str = "Fire detected! Recording video...";
pub const FIRE_CLEARED_TITLE: &str = "Fire Cleared";
pub const FIRE_CLEARED_MESSAGE: &str = "Fire is no longer detected. Recording stopped.";
pub const RECORDING_FINISHED_TITLE: &str = "Recording Finished";
pub const RECORDING_FINISHED_MESSAGE: &str = "Recording finished and saved.";
