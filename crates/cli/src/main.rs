mod settings;

use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;

use firewatch_core::annotation::domain::frame_annotator::FrameAnnotator;
use firewatch_core::annotation::infrastructure::contour_annotator::ContourAnnotator;
use firewatch_core::detection::infrastructure::hsv_fire_detector::HsvFireDetector;
use firewatch_core::notification::domain::notifier::Notifier;
use firewatch_core::notification::infrastructure::desktop_notifier::DesktopNotifier;
use firewatch_core::notification::infrastructure::log_notifier::{LogNotifier, NullNotifier};
use firewatch_core::pipeline::pipeline_context::PipelineParts;
use firewatch_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use firewatch_core::pipeline::watch_stream_use_case::{RunSummary, StopReason, WatchStreamUseCase};
use firewatch_core::presentation::domain::frame_presenter::FramePresenter;
use firewatch_core::presentation::infrastructure::snapshot_presenter::SnapshotPresenter;
use firewatch_core::recording::domain::episode_recorder::EpisodeRecorder;
use firewatch_core::video::infrastructure::ffmpeg_source::FfmpegSource;
use firewatch_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

use settings::{NotifierKind, Settings};

const SNAPSHOT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Watch a video stream for fire-colored regions and record each episode.
#[derive(Parser)]
#[command(name = "firewatch")]
struct Cli {
    /// Stream URL (rtsp://, http://, or a local file path).
    url: String,

    /// Directory for episode recordings.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Record and display frames without region outlines.
    #[arg(long)]
    no_annotate: bool,

    /// How to announce recording events.
    #[arg(long, value_enum)]
    notifier: Option<NotifierKind>,

    /// Keep the latest annotated frame in this image file (png, jpg, bmp).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Refresh the snapshot every Nth frame.
    #[arg(long, default_value = "25")]
    snapshot_every: usize,

    /// Downscale snapshots wider than this many pixels.
    #[arg(long)]
    snapshot_width: Option<u32>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Print per-stage timings when the run ends.
    #[arg(long)]
    stats: bool,

    /// Store the effective output directory, annotation and notifier
    /// choices as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = effective_settings(&cli, Settings::load());
    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Saved settings to {}", path.display());
    }

    let annotator: Option<Box<dyn FrameAnnotator>> = if settings.annotate {
        Some(Box::new(ContourAnnotator::default()))
    } else {
        None
    };
    let logger: Option<Box<dyn PipelineLogger>> = if cli.stats {
        Some(Box::new(StdoutPipelineLogger::default()))
    } else {
        None
    };
    let presenter: Option<Box<dyn FramePresenter>> = cli.snapshot.as_ref().map(|path| {
        let presenter = SnapshotPresenter::new(path, cli.snapshot_every);
        let presenter = match cli.snapshot_width {
            Some(width) => presenter.with_max_width(width),
            None => presenter,
        };
        Box::new(presenter) as Box<dyn FramePresenter>
    });

    let parts = PipelineParts::new(
        Box::new(FfmpegSource::new()),
        Box::new(HsvFireDetector::default()),
        annotator,
        EpisodeRecorder::new(Box::new(FfmpegWriter::new()), &settings.output_dir),
        build_notifier(settings.notifier),
        logger,
    );

    let cancelled = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(cancelled.clone())?;
    spawn_stop_listener(cancelled.clone());

    log::info!(
        "Recording episodes to {} (Ctrl+C, or q and Enter, to stop)",
        settings.output_dir.display()
    );
    let mut use_case = WatchStreamUseCase::new(parts, presenter, cli.max_frames, Some(cancelled));
    let summary = use_case.execute(&cli.url)?;
    report(&summary);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.url.trim().is_empty() {
        return Err("Stream URL must not be empty".into());
    }
    if cli.snapshot_every == 0 {
        return Err("Snapshot interval must be at least 1".into());
    }
    if let Some(path) = &cli.snapshot {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SNAPSHOT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            return Err(format!(
                "Snapshot must end in one of {}, got {}",
                SNAPSHOT_EXTENSIONS.join(", "),
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn effective_settings(cli: &Cli, stored: Settings) -> Settings {
    Settings {
        output_dir: cli.output_dir.clone().unwrap_or(stored.output_dir),
        annotate: stored.annotate && !cli.no_annotate,
        notifier: cli.notifier.unwrap_or(stored.notifier),
    }
}

fn build_notifier(kind: NotifierKind) -> Box<dyn Notifier> {
    match kind {
        NotifierKind::Desktop => Box::new(DesktopNotifier::new("Firewatch")),
        NotifierKind::Log => Box::new(LogNotifier),
        NotifierKind::Off => Box::new(NullNotifier),
    }
}

/// Routes Ctrl+C (and SIGTERM on Unix) to the same stop flag as `q`.
fn install_interrupt_handler(flag: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || request_stop(&flag))
}

/// Sets `flag` when the operator types `q` on stdin.
fn spawn_stop_listener(flag: Arc<AtomicBool>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if is_stop_command(&line) {
                request_stop(&flag);
                break;
            }
        }
    });
}

fn is_stop_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

/// First request logs; repeats are silent.
fn request_stop(flag: &AtomicBool) {
    if !flag.swap(true, Ordering::Relaxed) {
        log::info!("Stopping after the current frame");
    }
}

fn report(summary: &RunSummary) {
    match &summary.stop_reason {
        StopReason::ReadFailure(message) => {
            eprintln!("Cannot read frame or the stream stopped: {message}")
        }
        StopReason::EndOfStream => eprintln!("Stream ended."),
        StopReason::Stopped | StopReason::FrameLimit => {}
    }
    for event in &summary.events {
        log::debug!("{}: {}", event.title(), event.path().display());
    }
    log::info!(
        "Processed {} frames, saved {} recording(s)",
        summary.frames_processed,
        summary.episodes_completed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("firewatch").chain(args.iter().copied())).unwrap()
    }

    fn stored() -> Settings {
        Settings {
            output_dir: PathBuf::from("/stored"),
            annotate: true,
            notifier: NotifierKind::Desktop,
        }
    }

    #[test]
    fn test_flags_override_stored_settings() {
        let cli = parse(&[
            "rtsp://cam/live",
            "--output-dir",
            "/tmp/out",
            "--no-annotate",
            "--notifier",
            "log",
        ]);
        let settings = effective_settings(&cli, stored());
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert!(!settings.annotate);
        assert_eq!(settings.notifier, NotifierKind::Log);
    }

    #[test]
    fn test_stored_settings_apply_without_flags() {
        let cli = parse(&["rtsp://cam/live"]);
        assert_eq!(effective_settings(&cli, stored()), stored());
    }

    #[test]
    fn test_snapshot_extension_is_validated() {
        assert!(validate(&parse(&["x.mp4", "--snapshot", "live.png"])).is_ok());
        assert!(validate(&parse(&["x.mp4", "--snapshot", "live.JPG"])).is_ok());
        assert!(validate(&parse(&["x.mp4", "--snapshot", "live.gifv"])).is_err());
        assert!(validate(&parse(&["x.mp4", "--snapshot", "live"])).is_err());
    }

    #[test]
    fn test_zero_snapshot_interval_is_rejected() {
        assert!(validate(&parse(&["x.mp4", "--snapshot-every", "0"])).is_err());
    }

    #[test]
    fn test_interrupt_sets_the_stop_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        install_interrupt_handler(flag.clone()).unwrap();
        assert!(!flag.load(Ordering::Relaxed));

        // ctrlc's handler thread picks the signal up asynchronously.
        #[cfg(unix)]
        {
            let status = process::Command::new("kill")
                .args(["-INT", &process::id().to_string()])
                .status()
                .unwrap();
            assert!(status.success());
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
            while !flag.load(Ordering::Relaxed) && std::time::Instant::now() < deadline {
                thread::sleep(std::time::Duration::from_millis(10));
            }
            assert!(flag.load(Ordering::Relaxed));
        }
    }

    #[test]
    fn test_request_stop_is_idempotent() {
        let flag = AtomicBool::new(false);
        request_stop(&flag);
        request_stop(&flag);
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_stop_command_matches_q_only() {
        assert!(is_stop_command("q"));
        assert!(is_stop_command("  Q \n"));
        assert!(!is_stop_command("quit"));
        assert!(!is_stop_command(""));
    }

    #[test]
    fn test_missing_url_is_a_parse_error() {
        assert!(Cli::try_parse_from(["firewatch"]).is_err());
    }
}
