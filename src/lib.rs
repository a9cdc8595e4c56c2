//! Desktop QR code scanner: camera or gallery image in, decoded text and a
//! browser hand-off for URLs out.

pub mod app;
pub mod config;
pub mod detector;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod input;
pub mod render;
pub mod session;

pub use error::{Result, ScannerError};
