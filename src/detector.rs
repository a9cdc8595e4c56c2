//! QR code detection
//!
//! The rest of the app only relies on [`QrDetector`]: one RGB frame in, the
//! decoded text and the code's corners out. Nothing found is a normal result.

use image::RgbImage;
use rqrr::PreparedImage;
use tracing::{debug, trace};

/// Corner points of a located code in source-image pixel coordinates
pub type Quad = [(f32, f32); 4];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Decoded payload, absent when nothing could be decoded
    pub text: Option<String>,
    /// Corners of the located code, absent when no code was found
    pub quad: Option<Quad>,
}

pub trait QrDetector {
    fn detect(&self, frame: &RgbImage) -> Detection;
}

/// Detector backed by `rqrr`. Only the first located code is reported.
#[derive(Debug, Default)]
pub struct RqrrDetector;

impl QrDetector for RqrrDetector {
    fn detect(&self, frame: &RgbImage) -> Detection {
        // rqrr links its own `image` release, so feed it luma values directly.
        let gray = image::imageops::grayscale(frame);
        let (width, height) = gray.dimensions();
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                gray.get_pixel(x as u32, y as u32).0[0]
            });
        let grids = prepared.detect_grids();

        let Some(grid) = grids.first() else {
            trace!("No QR code in frame");
            return Detection::default();
        };

        let quad = grid.bounds.map(|p| (p.x as f32, p.y as f32));
        let text = match grid.decode() {
            Ok((meta, content)) if !content.is_empty() => {
                trace!(meta = ?meta, "QR code decoded");
                Some(content)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(error = ?e, "Located a QR code but could not decode it");
                None
            }
        };

        Detection {
            text,
            quad: Some(quad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn blank_frame_has_no_detection() {
        let frame = RgbImage::from_pixel(64, 48, Rgb([255, 255, 255]));
        assert_eq!(RqrrDetector.detect(&frame), Detection::default());
    }

    #[test]
    fn noise_frame_has_no_text() {
        let frame = RgbImage::from_fn(32, 32, |x, y| {
            if (x / 3 + y / 5) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        assert_eq!(RqrrDetector.detect(&frame).text, None);
    }

    #[test]
    fn non_square_frame_is_accepted() {
        let frame = RgbImage::from_pixel(120, 7, Rgb([0, 0, 0]));
        assert_eq!(RqrrDetector.detect(&frame), Detection::default());
    }
}
