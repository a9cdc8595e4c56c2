use clap::Parser;
use eframe::egui;
use qr_scanner::app::ScannerApp;
use qr_scanner::config::{ScannerConfig, APP_TITLE};
use qr_scanner::frame::{CameraSource, StillImage};
use qr_scanner::session::Session;
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "qr-scanner")]
#[command(about = "Scan QR codes from a camera or an image file")]
#[command(version)]
struct Cli {
    /// Camera index to use
    #[arg(short, long, default_value = "0")]
    camera: u32,

    /// Run without a camera (gallery only)
    #[arg(long)]
    no_camera: bool,

    /// Image to load into the gallery at startup
    #[arg(short, long)]
    image: Option<PathBuf>,
}

impl From<Cli> for ScannerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            camera_index: cli.camera,
            use_camera: !cli.no_camera,
            initial_image: cli.image,
            ..Self::default()
        }
    }
}

fn main() -> eframe::Result {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=qr_scanner=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ScannerConfig::from(Cli::parse());

    let camera = if config.use_camera {
        match CameraSource::open(config.camera_index) {
            Ok(camera) => Some(camera),
            Err(e) => {
                warn!(error = %e, "Could not open camera, gallery mode only");
                None
            }
        }
    } else {
        None
    };

    let mut session = Session::new(camera.is_some());
    if let Some(path) = &config.initial_image {
        match StillImage::load(path) {
            Ok(image) => session.load_gallery(image),
            Err(e) => warn!(error = %e, "Ignoring startup image"),
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(config.window_size)
            .with_resizable(false),
        centered: true,
        ..Default::default()
    };

    // The camera moves into the app and is released when the app drops,
    // including when the window never opens.
    let result = eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ScannerApp::new(&config, session, camera)))),
    );

    if let Err(e) = &result {
        error!(error = %e, "Failed to run the scanner window");
    }
    result
}
