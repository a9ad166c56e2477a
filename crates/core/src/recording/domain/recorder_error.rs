use std::path::PathBuf;

use thiserror::Error;

/// Failures of an episode's output file.
///
/// Whichever variant is returned, the recorder is back in `Idle` and holds
/// no open output.
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("failed to create episode file {path}: {message}")]
    Create { path: PathBuf, message: String },
    #[error("failed to write frame {frame_index} to {path}: {message}")]
    Write {
        path: PathBuf,
        frame_index: usize,
        message: String,
    },
    #[error("failed to finalize episode file {path}: {message}")]
    Finalize { path: PathBuf, message: String },
}

impl RecorderError {
    pub fn path(&self) -> &PathBuf {
        match self {
            RecorderError::Create { path, .. }
            | RecorderError::Write { path, .. }
            | RecorderError::Finalize { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path_and_cause() {
        let err = RecorderError::Create {
            path: PathBuf::from("/videos/fire_x.mp4"),
            message: "permission denied".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("/videos/fire_x.mp4"));
        assert!(text.contains("permission denied"));
        assert_eq!(err.path(), &PathBuf::from("/videos/fire_x.mp4"));
    }
}
