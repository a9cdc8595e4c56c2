//! Session state and the per-tick scanning step

use crate::detector::{Detection, QrDetector};
use crate::dispatch::{is_url, maybe_open, UrlOpener};
use crate::frame::{FrameSource, ImagePicker, StillImage};
use crate::input::ButtonId;
use image::RgbImage;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    Camera,
    Gallery,
    /// Nothing to show yet
    Idle,
}

/// What one tick produced
#[derive(Debug)]
pub enum Tick {
    Frame {
        frame: RgbImage,
        detection: Detection,
    },
    /// The camera had no frame; try again shortly
    Skipped,
    Idle,
}

/// Mutable state of one scanner window.
///
/// Gallery is only active while an image is loaded, and Camera only when a
/// camera exists. `last_url_opened` changes only after a successful open.
#[derive(Debug)]
pub struct Session {
    active: ActiveSource,
    gallery: Option<StillImage>,
    last_url_opened: Option<String>,
    decoded_text: Option<String>,
    camera_available: bool,
}

impl Session {
    pub fn new(camera_available: bool) -> Self {
        let active = if camera_available {
            ActiveSource::Camera
        } else {
            ActiveSource::Idle
        };

        Self {
            active,
            gallery: None,
            last_url_opened: None,
            decoded_text: None,
            camera_available,
        }
    }

    pub fn active_source(&self) -> ActiveSource {
        self.active
    }

    pub fn camera_available(&self) -> bool {
        self.camera_available
    }

    pub fn gallery_image(&self) -> Option<&StillImage> {
        self.gallery.as_ref()
    }

    pub fn decoded_text(&self) -> Option<&str> {
        self.decoded_text.as_deref()
    }

    pub fn last_url_opened(&self) -> Option<&str> {
        self.last_url_opened.as_deref()
    }

    fn clear_detection(&mut self) {
        self.decoded_text = None;
        self.last_url_opened = None;
    }

    /// Shows `image` from now on, whatever the previous source was.
    pub fn load_gallery(&mut self, image: StillImage) {
        self.gallery = Some(image);
        self.active = ActiveSource::Gallery;
        self.clear_detection();
    }

    /// Asks the picker for a file and loads it. Cancelling or a file that
    /// fails to load leaves the session unchanged.
    pub fn import(&mut self, picker: &mut dyn ImagePicker) -> bool {
        let Some(path) = picker.pick_image() else {
            return false;
        };

        match StillImage::load(&path) {
            Ok(image) => {
                self.load_gallery(image);
                true
            }
            Err(e) => {
                warn!(error = %e, "Import failed");
                false
            }
        }
    }

    /// Clears the decoded text and the URL memory. Without a camera the
    /// loaded image is dropped too.
    pub fn reset(&mut self) {
        self.clear_detection();
        if !self.camera_available {
            self.gallery = None;
            self.active = ActiveSource::Idle;
        }
    }

    /// Switches between camera and gallery. No-op without a camera.
    pub fn toggle_source(&mut self) -> bool {
        if !self.camera_available {
            debug!("Source toggle ignored, no camera");
            return false;
        }

        self.active = match self.active {
            ActiveSource::Camera if self.gallery.is_some() => ActiveSource::Gallery,
            ActiveSource::Camera => ActiveSource::Idle,
            ActiveSource::Gallery | ActiveSource::Idle => {
                self.clear_detection();
                ActiveSource::Camera
            }
        };
        info!(source = ?self.active, "Switched source");
        true
    }

    pub fn apply(&mut self, button: ButtonId, picker: &mut dyn ImagePicker) {
        match button {
            ButtonId::Import => {
                self.import(picker);
            }
            ButtonId::Reset => self.reset(),
            ButtonId::ToggleSource => {
                self.toggle_source();
            }
        }
    }

    /// Fetches the active frame, runs detection on it and opens a new URL.
    pub fn tick(
        &mut self,
        camera: Option<&mut dyn FrameSource>,
        detector: &dyn QrDetector,
        opener: &mut dyn UrlOpener,
    ) -> Tick {
        let next = match self.active {
            ActiveSource::Camera => match camera {
                Some(camera) => camera.try_get_frame(),
                None => {
                    warn!("Camera source active without a camera");
                    return Tick::Idle;
                }
            },
            ActiveSource::Gallery => match self.gallery.as_mut() {
                Some(still) => still.try_get_frame(),
                None => return Tick::Idle,
            },
            ActiveSource::Idle => return Tick::Idle,
        };

        let frame = match next {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "Skipping tick");
                return Tick::Skipped;
            }
        };

        let detection = detector.detect(&frame);
        self.observe(&detection, opener);
        Tick::Frame { frame, detection }
    }

    fn observe(&mut self, detection: &Detection, opener: &mut dyn UrlOpener) {
        let Some(text) = detection.text.as_deref() else {
            return;
        };

        if self.decoded_text.as_deref() != Some(text) {
            info!(text, "QR code decoded");
            self.decoded_text = Some(text.to_owned());
        }

        if is_url(text) {
            self.last_url_opened = maybe_open(opener, text, self.last_url_opened.take());
        }
    }
}
