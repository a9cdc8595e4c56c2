//! The scanner window

use crate::config::ScannerConfig;
use crate::detector::RqrrDetector;
use crate::dispatch::SystemBrowser;
use crate::frame::{CameraSource, FileDialogPicker, FrameSource};
use crate::input::{self, ButtonAction, MouseButton, Point, PointerEvent};
use crate::render::{compose, Backdrop, Renderer, Scene, Surface};
use crate::session::{Session, Tick};
use eframe::egui;
use std::time::Duration;
use tracing::info;

pub struct ScannerApp {
    session: Session,
    camera: Option<CameraSource>,
    detector: RqrrDetector,
    browser: SystemBrowser,
    picker: FileDialogPicker,
    renderer: Renderer,
    camera_retry_delay: Duration,
}

impl ScannerApp {
    pub fn new(config: &ScannerConfig, session: Session, camera: Option<CameraSource>) -> Self {
        let [width, height] = config.window_size;
        Self {
            session,
            camera,
            detector: RqrrDetector,
            browser: SystemBrowser,
            picker: FileDialogPicker,
            renderer: Renderer::new(Surface { width, height }),
            camera_retry_delay: config.camera_retry_delay,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        // Collected first: the file dialog must not open while egui's input
        // state is borrowed.
        let events = pointer_events(ctx);
        let height = self.renderer.surface().height;
        for event in &events {
            input::handle_click(&mut self.session, event, height, &mut self.picker);
        }
    }
}

fn pointer_events(ctx: &egui::Context) -> Vec<PointerEvent> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => Some(PointerEvent {
                    position: Point::new(pos.x, pos.y),
                    button: match button {
                        egui::PointerButton::Primary => MouseButton::Primary,
                        egui::PointerButton::Secondary => MouseButton::Secondary,
                        egui::PointerButton::Middle => MouseButton::Middle,
                        _ => MouseButton::Other,
                    },
                    action: if *pressed {
                        ButtonAction::Press
                    } else {
                        ButtonAction::Release
                    },
                }),
                _ => None,
            })
            .collect()
    })
}

impl eframe::App for ScannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        let camera = self
            .camera
            .as_mut()
            .map(|camera| camera as &mut dyn FrameSource);
        let tick = self.session.tick(camera, &self.detector, &mut self.browser);

        let (backdrop, quad) = match &tick {
            Tick::Frame { frame, detection } => {
                self.renderer.upload(ctx, frame);
                let size = [frame.width(), frame.height()];
                (Backdrop::Frame { size }, detection.quad.as_ref())
            }
            Tick::Skipped => {
                let backdrop = match self.renderer.texture_size() {
                    Some(size) => Backdrop::Frame { size },
                    None => Backdrop::Blank,
                };
                (backdrop, None)
            }
            Tick::Idle => (Backdrop::Placeholder, None),
        };

        let buttons = input::layout(&self.session);
        let scene = Scene {
            backdrop,
            quad,
            text: self.session.decoded_text(),
            buttons: &buttons,
        };
        let commands = compose(self.renderer.surface(), &scene);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.renderer.paint(ui.painter(), &commands));

        match tick {
            Tick::Skipped => ctx.request_repaint_after(self.camera_retry_delay),
            Tick::Frame { .. } | Tick::Idle => ctx.request_repaint(),
        }
    }
}

impl Drop for ScannerApp {
    fn drop(&mut self) {
        info!("Scanner window closed");
    }
}
