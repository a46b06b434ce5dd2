use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by directory loading and navigation.
///
/// None of these are fatal: the session stays usable and the UI reports the
/// message in the status bar.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("No .jpg frames found under {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("Frame index {index} is out of range (frame set has {len} frames)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot navigate to frame {target}: valid range is 0..{count}")]
    OutOfBounds { target: i64, count: usize },

    #[error("Failed to load frame {}: {source}", path.display())]
    FrameLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No directory is open")]
    NoDirectory,
}

pub type ViewerResult<T> = Result<T, ViewerError>;
