//! Frame sources
//!
//! A frame source hands out one RGB buffer per tick. The camera variant may
//! have nothing to give on a particular tick; the still-image variant always
//! returns the same picture.

use crate::error::{Result, ScannerError};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extensions offered by the gallery picker
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub trait FrameSource {
    /// Next frame, or `FrameUnavailable` when there is nothing this tick
    fn try_get_frame(&mut self) -> Result<RgbImage>;
}

/// Live camera opened once at startup and released on drop.
pub struct CameraSource {
    camera: Camera,
    index: u32,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self> {
        let unavailable = |e: nokhwa::NokhwaError| ScannerError::CameraUnavailable {
            index,
            reason: e.to_string(),
        };

        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;

        info!(
            index,
            name = %camera.info().human_name(),
            resolution = %camera.resolution(),
            "Camera opened"
        );

        Ok(Self { camera, index })
    }
}

impl FrameSource for CameraSource {
    fn try_get_frame(&mut self) -> Result<RgbImage> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| ScannerError::FrameUnavailable(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| ScannerError::FrameUnavailable(e.to_string()))?;

        // The capture backend links its own `image` release, so hand the
        // pixels over as raw bytes.
        let (width, height) = (decoded.width(), decoded.height());
        RgbImage::from_raw(width, height, decoded.into_raw()).ok_or_else(|| {
            ScannerError::FrameUnavailable(format!("{width}x{height} frame had the wrong length"))
        })
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        match self.camera.stop_stream() {
            Ok(()) => info!(index = self.index, "Camera released"),
            Err(e) => warn!(index = self.index, error = %e, "Failed to stop camera stream"),
        }
    }
}

/// A picture loaded from disk, served unchanged on every tick.
#[derive(Debug, Clone)]
pub struct StillImage {
    image: RgbImage,
    path: Option<PathBuf>,
}

impl StillImage {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| ScannerError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();

        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Loaded gallery image"
        );

        Ok(Self {
            image,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image, path: None }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl FrameSource for StillImage {
    fn try_get_frame(&mut self) -> Result<RgbImage> {
        Ok(self.image.clone())
    }
}

/// Asks the user for an image file. `None` means the user cancelled.
pub trait ImagePicker {
    fn pick_image(&mut self) -> Option<PathBuf>;
}

/// Native open-file dialog
#[derive(Debug, Default)]
pub struct FileDialogPicker;

impl ImagePicker for FileDialogPicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        let picked = rfd::FileDialog::new()
            .set_title("Import from Gallery")
            .add_filter("Image files", &IMAGE_EXTENSIONS)
            .pick_file();

        if picked.is_none() {
            debug!("Image selection cancelled");
        }
        picked
    }
}
