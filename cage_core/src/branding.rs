//! # Branding Logo Provider
//!
//! Supplies the optional organization logo for report headers. The renderer
//! only sees the [`LogoProvider`] trait, so layout can be exercised without a
//! network by passing [`NoLogo`].
//!
//! [`HttpLogoProvider`] issues one GET per configured URL (primary, then
//! fallback) with a bounded timeout. Any failure falls through to the next
//! URL; if none succeed the report is rendered text-only.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cage_core::branding::{HttpLogoProvider, LogoProvider};
//! use cage_core::settings::ReportSettings;
//!
//! let settings = ReportSettings {
//!     logo_primary_url: Some("https://cdn.example.com/logo.png".to_string()),
//!     ..ReportSettings::default()
//! };
//! let provider = HttpLogoProvider::from_settings(&settings);
//! if let Some(logo) = provider.fetch_logo() {
//!     println!("logo: {} bytes ({})", logo.bytes.len(), logo.format.extension());
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::settings::ReportSettings;

/// Image formats the report template can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Detect the format from leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Some(ImageFormat::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        let head = &bytes[..bytes.len().min(512)];
        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            return Some(ImageFormat::Svg);
        }
        None
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Svg => "svg",
        }
    }
}

/// A fetched logo image.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Scratch copy on disk, if caching succeeded
    pub cached_path: Option<PathBuf>,
}

impl Logo {
    /// Wrap raw bytes, rejecting anything that is not a known image format
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::sniff(&bytes)?;
        Some(Logo {
            bytes,
            format,
            cached_path: None,
        })
    }

    /// Virtual file name the report template refers to
    pub fn file_name(&self) -> String {
        format!("logo.{}", self.format.extension())
    }
}

/// Source of the header logo. `None` means render without one.
pub trait LogoProvider {
    fn fetch_logo(&self) -> Option<Logo>;
}

/// Provider that never has a logo.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogo;

impl LogoProvider for NoLogo {
    fn fetch_logo(&self) -> Option<Logo> {
        None
    }
}

/// Fixed in-memory logo, e.g. loaded from a local file.
#[derive(Debug, Clone)]
pub struct StaticLogo(pub Logo);

impl LogoProvider for StaticLogo {
    fn fetch_logo(&self) -> Option<Logo> {
        Some(self.0.clone())
    }
}

/// Fetches the logo over HTTP, primary URL first then fallback.
///
/// The outcome is cached for the life of the provider, so repeated calls
/// during one render never hit the network twice.
pub struct HttpLogoProvider {
    urls: Vec<String>,
    timeout: Duration,
    user_agent: String,
    scratch_dir: PathBuf,
    use_proxy: bool,
    cache: OnceCell<Option<Logo>>,
}

impl HttpLogoProvider {
    pub fn new(urls: Vec<String>, timeout: Duration, user_agent: impl Into<String>, scratch_dir: PathBuf) -> Self {
        HttpLogoProvider {
            urls,
            timeout,
            user_agent: user_agent.into(),
            scratch_dir,
            use_proxy: true,
            cache: OnceCell::new(),
        }
    }

    /// Ignore system proxy settings (HTTP_PROXY and friends)
    pub fn without_proxy(mut self) -> Self {
        self.use_proxy = false;
        self
    }

    pub fn from_settings(settings: &ReportSettings) -> Self {
        HttpLogoProvider::new(
            settings.logo_urls().into_iter().map(String::from).collect(),
            Duration::from_secs(settings.logo_timeout_secs),
            format!("{}/{}", settings.program_name.replace(' ', ""), crate::settings::PROGRAM_VERSION),
            settings.scratch_dir(),
        )
    }

    fn fetch_uncached(&self) -> Option<Logo> {
        if self.urls.is_empty() {
            debug!("no logo URLs configured");
            return None;
        }

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout);
        if !self.use_proxy {
            builder = builder.no_proxy();
        }

        let client = match builder.build() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "failed to create HTTP client, rendering without logo");
                return None;
            }
        };

        for url in &self.urls {
            match fetch_one(&client, url) {
                Ok(logo) => {
                    info!(url = %url, bytes = logo.bytes.len(), "fetched branding logo");
                    return Some(self.cache_to_scratch(logo));
                }
                Err(reason) => warn!(url = %url, reason = %reason, "logo fetch failed"),
            }
        }

        warn!("all logo sources failed, rendering without logo");
        None
    }

    /// Best effort; an unwritable scratch dir only loses the disk copy
    fn cache_to_scratch(&self, mut logo: Logo) -> Logo {
        let path = self.scratch_dir.join(format!("cage_report_{}", logo.file_name()));
        match std::fs::write(&path, &logo.bytes) {
            Ok(()) => logo.cached_path = Some(path),
            Err(e) => debug!(path = %path.display(), error = %e, "could not cache logo"),
        }
        logo
    }
}

impl LogoProvider for HttpLogoProvider {
    fn fetch_logo(&self) -> Option<Logo> {
        self.cache.get_or_init(|| self.fetch_uncached()).clone()
    }
}

fn fetch_one(client: &reqwest::blocking::Client, url: &str) -> Result<Logo, String> {
    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            "request timed out".to_string()
        } else {
            format!("network error: {}", e)
        }
    })?;

    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }

    let bytes = response
        .bytes()
        .map_err(|e| format!("failed to read body: {}", e))?
        .to_vec();
    if bytes.is_empty() {
        return Err("empty response body".to_string());
    }

    Logo::from_bytes(bytes).ok_or_else(|| "response is not a PNG, JPEG, GIF or SVG image".to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    pub(crate) const TEST_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#336699"/></svg>"##;

    /// Serve a single canned HTTP response on a loopback port
    fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    content_type,
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{}/logo", addr)
    }

    /// Accept a connection and never answer
    fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(3));
                drop(stream);
            }
        });
        format!("http://{}/logo", addr)
    }

    fn provider(urls: Vec<String>, dir: &std::path::Path) -> HttpLogoProvider {
        HttpLogoProvider::new(urls, Duration::from_millis(500), "CageTest/0", dir.to_path_buf()).without_proxy()
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(b"\x89PNG\r\n\x1a\nrest"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(TEST_SVG.as_bytes()), Some(ImageFormat::Svg));
        assert_eq!(
            ImageFormat::sniff(b"<?xml version=\"1.0\"?>\n<svg></svg>"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::sniff(b"<html>not found</html>"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn test_no_logo_stub() {
        assert!(NoLogo.fetch_logo().is_none());
    }

    #[test]
    fn test_no_urls_configured() {
        let dir = tempfile::tempdir().unwrap();
        assert!(provider(Vec::new(), dir.path()).fetch_logo().is_none());
    }

    #[test]
    fn test_primary_success_is_cached_to_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("200 OK", "image/svg+xml", TEST_SVG.as_bytes().to_vec());
        let provider = provider(vec![url], dir.path());

        let logo = provider.fetch_logo().unwrap();
        assert_eq!(logo.format, ImageFormat::Svg);
        let cached = logo.cached_path.clone().unwrap();
        assert_eq!(std::fs::read(cached).unwrap(), TEST_SVG.as_bytes());

        // Server only answers once; second call must come from the cache
        assert_eq!(provider.fetch_logo(), Some(logo));
    }

    #[test]
    fn test_falls_back_on_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let primary = serve_once("404 Not Found", "text/html", b"<html>gone</html>".to_vec());
        let fallback = serve_once("200 OK", "image/svg+xml", TEST_SVG.as_bytes().to_vec());

        let logo = provider(vec![primary, fallback], dir.path()).fetch_logo().unwrap();
        assert_eq!(logo.format, ImageFormat::Svg);
    }

    #[test]
    fn test_falls_back_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let primary = serve_silence();
        let fallback = serve_once("200 OK", "image/svg+xml", TEST_SVG.as_bytes().to_vec());

        let logo = provider(vec![primary, fallback], dir.path()).fetch_logo();
        assert!(logo.is_some());
    }

    #[test]
    fn test_non_image_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("200 OK", "text/html", b"<html>login page</html>".to_vec());
        assert!(provider(vec![url], dir.path()).fetch_logo().is_none());
    }

    #[test]
    fn test_all_sources_fail() {
        let dir = tempfile::tempdir().unwrap();
        // Bind then drop so the port refuses connections
        let closed = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}/logo", listener.local_addr().unwrap())
        };
        let error = serve_once("500 Internal Server Error", "text/plain", b"oops".to_vec());
        assert!(provider(vec![closed, error], dir.path()).fetch_logo().is_none());
    }
}
