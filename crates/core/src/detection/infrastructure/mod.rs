pub mod hsv_fire_detector;
