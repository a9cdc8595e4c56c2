//! Runtime configuration
//!
//! Built from the command line in `main`; nothing here is persisted.

use std::path::PathBuf;
use std::time::Duration;

pub const APP_TITLE: &str = "QR Code Scanner";

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Camera device index handed to the capture backend
    pub camera_index: u32,
    /// When false the camera is never opened and the app runs gallery-only
    pub use_camera: bool,
    /// Image loaded into the gallery before the first tick
    pub initial_image: Option<PathBuf>,
    /// Fixed window size in points
    pub window_size: [f32; 2],
    /// Delay before the next tick when the camera had no frame
    pub camera_retry_delay: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            use_camera: true,
            initial_image: None,
            window_size: [800.0, 600.0],
            camera_retry_delay: Duration::from_millis(100),
        }
    }
}
