//! Error types for the scanner

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScannerError>;

#[derive(Debug, Error)]
pub enum ScannerError {
    /// The camera could not be opened or its stream could not be started
    #[error("camera {index} unavailable: {reason}")]
    CameraUnavailable { index: u32, reason: String },

    /// No frame this tick; the caller retries on a later tick
    #[error("no camera frame available: {0}")]
    FrameUnavailable(String),

    #[error("could not read image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not open {url} in the browser: {source}")]
    Browser {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
