//! Browser hand-off for decoded URLs

use crate::error::{Result, ScannerError};
use tracing::{info, warn};

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url).map_err(|source| ScannerError::Browser {
            url: url.to_owned(),
            source,
        })
    }
}

/// True when `text` starts with an `http://` or `https://` scheme.
///
/// Stricter than a bare `http` prefix: the `://` is required, so `httpbin`
/// is plain text, while the scheme itself matches in any case.
pub fn is_url(text: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| {
        text.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Opens `url` unless it is the one opened last and returns the new
/// last-opened value. A failed open leaves `last_opened` untouched, so the
/// same URL is tried again on the next call.
pub fn maybe_open(
    opener: &mut dyn UrlOpener,
    url: &str,
    last_opened: Option<String>,
) -> Option<String> {
    if last_opened.as_deref() == Some(url) {
        return last_opened;
    }

    info!(url, "Opening URL");
    match opener.open(url) {
        Ok(()) => Some(url.to_owned()),
        Err(e) => {
            warn!(error = %e, "Failed to open URL");
            last_opened
        }
    }
}
