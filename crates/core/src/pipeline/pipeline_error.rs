use thiserror::Error;

use crate::recording::domain::recorder_error::RecorderError;

/// Failures that end a watch run.
///
/// End of stream and frame read failures are not errors of the run; they are
/// reported through [`StopReason`](super::watch_stream_use_case::StopReason).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("cannot open stream {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("episode output failed: {0}")]
    OutputWriteFailure(#[from] RecorderError),

    #[error("region detection failed: {0}")]
    Detection(String),

    #[error("frame annotation failed: {0}")]
    Annotation(String),

    #[error("watch already executed")]
    AlreadyExecuted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_unavailable_names_url() {
        let err = PipelineError::SourceUnavailable {
            url: "rtsp://cam.local/live".into(),
            reason: "connection refused".into(),
        };
        let text = err.to_string();
        assert!(text.contains("rtsp://cam.local/live"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_recorder_error_converts() {
        let recorder_err = RecorderError::Create {
            path: PathBuf::from("/rec/fire_x.mp4"),
            message: "permission denied".into(),
        };
        let err: PipelineError = recorder_err.into();
        assert!(matches!(err, PipelineError::OutputWriteFailure(_)));
        assert!(err.to_string().contains("fire_x.mp4"));
    }
}
