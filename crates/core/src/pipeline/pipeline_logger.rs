use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for stream-watching events.
///
/// Keeps the run loop independent of how timings and counters are surfaced,
/// so the CLI can print a report while tests and embedding hosts stay silent.
pub trait PipelineLogger: Send {
    /// Report how many frames have been processed so far. Live streams have
    /// no known total.
    fn progress(&mut self, frames_processed: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. region count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _frames_processed: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running aggregate of one stage's timings or one metric's values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl SampleStats {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Logger that aggregates per-stage timings and metrics and reports a
/// summary when the run ends.
///
/// Storage is one [`SampleStats`] per stage or metric name, however long the
/// stream runs. Progress lines are throttled to one every `throttle_frames`
/// frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, SampleStats>,
    metrics: HashMap<String, SampleStats>,
    start_time: Instant,
    frames_processed: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_processed: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_processed;
        let mut lines = vec![format!(
            "Watch summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stats = &self.timings[stage];
            let total_ms = stats.sum;
            let avg_ms = stats.mean();
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let stats = &self.metrics[name];
            lines.push(format!(
                "  {name}: avg {:.1}, max {:.0}",
                stats.mean(),
                stats.max
            ));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&SampleStats> {
        self.timings.get(stage)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&SampleStats> {
        self.metrics.get(name)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, frames_processed: usize) {
        self.frames_processed = frames_processed;
        if frames_processed > 0 && frames_processed % self.throttle_frames == 0 {
            log::info!("Processed {frames_processed} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1);
        logger.timing("detect", 5.0);
        logger.metric("regions", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("record", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.count, 2);
        assert_relative_eq!(detect.sum, 50.0);
        assert_relative_eq!(detect.max, 30.0);
        assert_eq!(logger.timings_for("record").unwrap().count, 1);
        assert!(logger.timings_for("annotate").is_none());
    }

    #[test]
    fn test_metric_average_and_peak_in_summary() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("regions", 1.0);
        logger.metric("regions", 2.0);
        logger.metric("regions", 0.0);

        let stats = logger.metrics_for("regions").unwrap();
        assert_relative_eq!(stats.mean(), 1.0);
        assert_relative_eq!(stats.max, 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("regions: avg 1.0, max 2"));
    }

    #[test]
    fn test_storage_does_not_grow_with_stream_length() {
        let mut logger = StdoutPipelineLogger::new(1000);
        let stages = ["read", "detect", "annotate", "record", "present"];
        // One hour at 25 fps.
        for frame in 1..=90_000 {
            for stage in stages {
                logger.timing(stage, 1.0);
            }
            logger.metric("regions", (frame % 3) as f64);
            logger.progress(frame);
        }

        assert_eq!(logger.timings.len(), stages.len());
        assert_eq!(logger.metrics.len(), 1);
        assert_eq!(logger.timings_for("detect").unwrap().count, 90_000);
        let regions = logger.metrics_for("regions").unwrap();
        assert_relative_eq!(regions.max, 2.0);
        assert_relative_eq!(regions.mean(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_negative_only_samples_keep_their_max() {
        let mut stats = SampleStats::default();
        stats.record(-3.0);
        stats.record(-1.0);
        assert_relative_eq!(stats.max, -1.0);
        assert_relative_eq!(SampleStats::default().mean(), 0.0);
    }

    #[test]
    fn test_summary_lists_stages_and_throughput() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(50);
        logger.timing("read", 4.0);
        logger.timing("detect", 10.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Watch summary (50 frames"));
        assert!(summary.contains("read"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_latest_count() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=25 {
            logger.progress(i);
        }
        assert_eq!(logger.frames_processed, 25);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.info("watching rtsp://cam");
        assert_eq!(logger.messages(), &["watching rtsp://cam".to_string()]);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
    }
}
