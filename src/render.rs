//! Frame and overlay rendering
//!
//! [`compose`] turns one tick's outcome into an ordered list of draw commands
//! in bottom-left-origin window coordinates. [`Renderer`] uploads the frame
//! texture and paints those commands with egui.

use crate::detector::Quad;
use crate::input::{ButtonId, Point, Rect, UiButton, BUTTON_BAR_HEIGHT};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Stroke, TextureHandle, TextureOptions};
use image::imageops::{self, FilterType};
use image::RgbImage;

pub const PLACEHOLDER_TEXT: &str = "No image loaded. Click 'Import from Gallery' to continue.";

const LABEL_FONT_SIZE: f32 = 18.0;
const OUTLINE_WIDTH: f32 = 2.0;
const BAR_COLOR: Color32 = Color32::from_rgb(51, 51, 51);
const OUTLINE_COLOR: Color32 = Color32::RED;
const LABEL_COLOR: Color32 = Color32::GREEN;

/// Drawable window size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

/// What fills the area above the button bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    /// The uploaded frame texture, `[width, height]` in pixels
    Frame { size: [u32; 2] },
    Placeholder,
    /// Nothing to show, e.g. the camera has not produced a frame yet
    Blank,
}

#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub backdrop: Backdrop,
    pub quad: Option<&'a Quad>,
    pub text: Option<&'a str>,
    pub buttons: &'a [UiButton],
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Frame { rect: Rect },
    Outline { points: [Point; 4] },
    Text { text: String, at: Point, anchor: Anchor, color: Color32 },
    FilledRect { rect: Rect, color: Color32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `at` is the bottom-left corner of the text
    BottomLeft,
    Center,
}

fn button_color(id: ButtonId) -> Color32 {
    match id {
        ButtonId::Import => Color32::from_rgb(128, 128, 255),
        ButtonId::Reset => Color32::from_rgb(255, 128, 128),
        ButtonId::ToggleSource => Color32::from_rgb(128, 255, 128),
    }
}

/// Placement of a `size` frame: shrunk (never enlarged) to fit above the
/// button bar with a bar-high margin, centered.
pub fn fit_frame(surface: Surface, size: [u32; 2]) -> Rect {
    let (w, h) = (size[0] as f32, size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return Rect::new(0.0, 0.0, 0.0, 0.0);
    }

    let available_height = surface.height - 2.0 * BUTTON_BAR_HEIGHT;
    let scale = (surface.width / w).min(available_height / h).min(1.0);
    let (fit_w, fit_h) = ((w * scale).floor(), (h * scale).floor());

    let x0 = ((surface.width - fit_w) / 2.0).floor();
    let y0 = ((surface.height - fit_h - BUTTON_BAR_HEIGHT) / 2.0).floor() + BUTTON_BAR_HEIGHT;
    Rect::new(x0, y0, x0 + fit_w, y0 + fit_h)
}

/// Maps image pixel corners (y down) into the frame's window rectangle.
pub fn quad_to_window(quad: &Quad, size: [u32; 2], frame_rect: Rect) -> [Point; 4] {
    let sx = frame_rect.width() / size[0].max(1) as f32;
    let sy = frame_rect.height() / size[1].max(1) as f32;
    quad.map(|(x, y)| Point::new(frame_rect.x0 + x * sx, frame_rect.y1 - y * sy))
}

/// Pixel size for the texture of a `size` frame: its fitted size on screen,
/// at least one pixel and at most `max_side` per side.
pub fn texture_dimensions(surface: Surface, size: [u32; 2], max_side: usize) -> [u32; 2] {
    let fitted = fit_frame(surface, size);
    let max_side = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    [
        (fitted.width() as u32).clamp(1, max_side),
        (fitted.height() as u32).clamp(1, max_side),
    ]
}

/// Draw commands for one tick, back to front.
pub fn compose(surface: Surface, scene: &Scene<'_>) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear];

    match scene.backdrop {
        Backdrop::Frame { size } => {
            let rect = fit_frame(surface, size);
            commands.push(DrawCommand::Frame { rect });

            if let Some(quad) = scene.quad {
                commands.push(DrawCommand::Outline {
                    points: quad_to_window(quad, size, rect),
                });
            }
            if let Some(text) = scene.text {
                commands.push(DrawCommand::Text {
                    text: format!("QR Data: {text}"),
                    at: Point::new(10.0, surface.height - 30.0),
                    anchor: Anchor::BottomLeft,
                    color: LABEL_COLOR,
                });
            }
        }
        Backdrop::Placeholder => commands.push(DrawCommand::Text {
            text: PLACEHOLDER_TEXT.to_owned(),
            at: Point::new(200.0, surface.height / 2.0),
            anchor: Anchor::BottomLeft,
            color: Color32::WHITE,
        }),
        Backdrop::Blank => {}
    }

    commands.push(DrawCommand::FilledRect {
        rect: Rect::new(0.0, 0.0, surface.width, BUTTON_BAR_HEIGHT),
        color: BAR_COLOR,
    });
    for button in scene.buttons.iter().filter(|button| button.enabled) {
        commands.push(DrawCommand::FilledRect {
            rect: button.rect,
            color: button_color(button.id),
        });
        commands.push(DrawCommand::Text {
            text: button.label.to_owned(),
            at: button.rect.center(),
            anchor: Anchor::Center,
            color: Color32::BLACK,
        });
    }

    commands
}

/// Owns the frame texture; everything else is redrawn from scratch.
pub struct Renderer {
    surface: Surface,
    texture: Option<TextureHandle>,
    texture_size: Option<[u32; 2]>,
}

impl Renderer {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            texture: None,
            texture_size: None,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Size of the last uploaded frame
    pub fn texture_size(&self) -> Option<[u32; 2]> {
        self.texture_size
    }

    /// Uploads `frame` shrunk to its on-screen size, so the texture never
    /// exceeds the backend's side limit. Empty frames are ignored.
    pub fn upload(&mut self, ctx: &egui::Context, frame: &RgbImage) {
        if frame.width() == 0 || frame.height() == 0 {
            return;
        }

        let max_side = ctx.input(|i| i.max_texture_side);
        let [width, height] =
            texture_dimensions(self.surface, [frame.width(), frame.height()], max_side);
        let resized;
        let pixels = if (width, height) == frame.dimensions() {
            frame
        } else {
            resized = imageops::resize(frame, width, height, FilterType::Triangle);
            &resized
        };

        let size = [width as usize, height as usize];
        let image = egui::ColorImage::from_rgb(size, pixels.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("frame", image, TextureOptions::LINEAR));
            }
        }
        self.texture_size = Some([frame.width(), frame.height()]);
    }

    fn to_screen(&self, p: Point) -> Pos2 {
        egui::pos2(p.x, self.surface.height - p.y)
    }

    fn to_screen_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            egui::pos2(rect.x0, self.surface.height - rect.y1),
            egui::pos2(rect.x1, self.surface.height - rect.y0),
        )
    }

    pub fn paint(&self, painter: &egui::Painter, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear => {
                    painter.rect_filled(painter.clip_rect(), 0.0, Color32::BLACK);
                }
                DrawCommand::Frame { rect } => {
                    if let Some(texture) = &self.texture {
                        painter.image(
                            texture.id(),
                            self.to_screen_rect(*rect),
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                }
                DrawCommand::Outline { points } => {
                    let points = points.iter().map(|p| self.to_screen(*p)).collect();
                    painter.add(egui::Shape::closed_line(
                        points,
                        Stroke::new(OUTLINE_WIDTH, OUTLINE_COLOR),
                    ));
                }
                DrawCommand::Text {
                    text,
                    at,
                    anchor,
                    color,
                } => {
                    let align = match anchor {
                        Anchor::BottomLeft => Align2::LEFT_BOTTOM,
                        Anchor::Center => Align2::CENTER_CENTER,
                    };
                    painter.text(
                        self.to_screen(*at),
                        align,
                        text,
                        FontId::proportional(LABEL_FONT_SIZE),
                        *color,
                    );
                }
                DrawCommand::FilledRect { rect, color } => {
                    painter.rect_filled(self.to_screen_rect(*rect), 0.0, *color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::layout;
    use crate::session::Session;

    const SURFACE: Surface = Surface {
        width: 800.0,
        height: 600.0,
    };

    fn scene<'a>(backdrop: Backdrop, quad: Option<&'a Quad>, buttons: &'a [UiButton]) -> Scene<'a> {
        Scene {
            backdrop,
            quad,
            text: None,
            buttons,
        }
    }

    #[test]
    fn small_frame_is_centered_unscaled() {
        let rect = fit_frame(SURFACE, [640, 480]);
        assert_eq!(rect, Rect::new(80.0, 85.0, 720.0, 565.0));
    }

    #[test]
    fn large_frame_shrinks_preserving_aspect() {
        let rect = fit_frame(SURFACE, [2000, 1000]);
        assert_eq!(rect.width(), 800.0);
        assert_eq!(rect.height(), 400.0);
        assert_eq!(rect.x0, 0.0);
        assert!(rect.y0 >= BUTTON_BAR_HEIGHT);

        let tall = fit_frame(SURFACE, [1000, 2000]);
        assert_eq!(tall.height(), 500.0);
        assert_eq!(tall.width(), 250.0);
    }

    #[test]
    fn texture_matches_fitted_size() {
        assert_eq!(texture_dimensions(SURFACE, [640, 480], 2048), [640, 480]);
        assert_eq!(texture_dimensions(SURFACE, [4000, 2000], 2048), [800, 400]);
        assert_eq!(texture_dimensions(SURFACE, [20000, 10], 2048), [800, 1]);
        assert_eq!(texture_dimensions(SURFACE, [640, 480], 256), [256, 256]);
    }

    #[test]
    fn oversized_frame_uploads_within_texture_limit() {
        let ctx = egui::Context::default();
        let max_side = ctx.input(|i| i.max_texture_side);
        let mut renderer = Renderer::new(SURFACE);

        renderer.upload(&ctx, &RgbImage::new(20000, 10));
        let texture = renderer.texture.as_ref().expect("frame texture");
        assert!(texture.size().iter().all(|&side| side <= max_side));
        assert_eq!(renderer.texture_size(), Some([20000, 10]));

        renderer.upload(&ctx, &RgbImage::new(10, 30000));
        let texture = renderer.texture.as_ref().expect("frame texture");
        assert!(texture.size().iter().all(|&side| side <= max_side));
        assert_eq!(renderer.texture_size(), Some([10, 30000]));
    }

    #[test]
    fn empty_frame_gets_empty_rect() {
        assert_eq!(fit_frame(SURFACE, [0, 10]).width(), 0.0);
    }

    #[test]
    fn quad_maps_into_frame_rect() {
        let rect = Rect::new(80.0, 85.0, 720.0, 565.0);
        let quad = [(0.0, 0.0), (640.0, 0.0), (640.0, 480.0), (0.0, 480.0)];
        let points = quad_to_window(&quad, [640, 480], rect);
        assert_eq!(points[0], Point::new(80.0, 565.0));
        assert_eq!(points[2], Point::new(720.0, 85.0));
    }

    #[test]
    fn no_outline_without_quad() {
        let buttons = layout(&Session::new(true));
        let commands = compose(SURFACE, &scene(Backdrop::Frame { size: [4, 4] }, None, &buttons));
        assert!(!commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Outline { .. })));
    }

    #[test]
    fn frame_is_painted_before_overlay_and_buttons() {
        let session = Session::new(true);
        let buttons = layout(&session);
        let quad = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let scene = Scene {
            text: Some("hello"),
            ..scene(Backdrop::Frame { size: [4, 4] }, Some(&quad), &buttons)
        };
        let commands = compose(SURFACE, &scene);

        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Frame { .. }));
        assert!(matches!(commands[2], DrawCommand::Outline { .. }));
        assert!(matches!(
            &commands[3],
            DrawCommand::Text { text, .. } if text == "QR Data: hello"
        ));
        assert!(matches!(commands[4], DrawCommand::FilledRect { .. }));
        // bar plus a rect and a label per button
        assert_eq!(commands.len(), 5 + 2 * 3);
    }

    #[test]
    fn placeholder_keeps_buttons_and_hides_disabled_toggle() {
        let buttons = layout(&Session::new(false));
        let scene = Scene {
            text: Some("stale"),
            ..scene(Backdrop::Placeholder, None, &buttons)
        };
        let commands = compose(SURFACE, &scene);

        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, [PLACEHOLDER_TEXT, "Import from Gallery", "Reset"]);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Frame { .. })));
    }

    #[test]
    fn blank_backdrop_draws_only_ui() {
        let buttons = layout(&Session::new(true));
        let commands = compose(SURFACE, &scene(Backdrop::Blank, None, &buttons));
        assert_eq!(commands.len(), 1 + 1 + 2 * 3);
    }
}
