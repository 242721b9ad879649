// Source fetcher - single authenticated GET, no retries

use super::{DownloadError, FetcherConfig};
use futures::{Stream, TryStreamExt};
use reqwest::{Client, Response, Url};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Split a private download URL into `(host, path)`.
/// The host keeps an explicit port; the path keeps its query string.
pub fn split_download_url(url: &str) -> Result<(String, String), DownloadError> {
    let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", url, e)))?;

    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => return Err(DownloadError::InvalidUrl(url.to_string())),
    };

    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok((host, path))
}

/// Body of a successful download, not yet drained
#[derive(Debug)]
pub struct SourceStream {
    response: Response,
}

impl SourceStream {
    /// Raw file bytes as they arrive
    pub fn into_stream(self) -> impl Stream<Item = std::io::Result<impl AsRef<[u8]>>> {
        self.response.bytes_stream().map_err(std::io::Error::other)
    }
}

/// Authenticated file downloader
#[derive(Clone)]
pub struct Fetcher {
    config: FetcherConfig,
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .read_timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        debug!(
            scheme = %config.scheme,
            timeout_secs = config.request_timeout_secs,
            "fetcher initialized"
        );
        Ok(Self { config, client })
    }

    /// Issue `GET {scheme}://{host}{path}` with a bearer token
    pub async fn fetch(
        &self,
        host: &str,
        path: &str,
        token: &str,
    ) -> Result<SourceStream, DownloadError> {
        let url = format!("{}://{}{}", self.config.scheme, host, path);
        let start = Instant::now();

        debug!(url = %url, "downloading snippet");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "download rejected");
            return Err(DownloadError::Status {
                status: status.as_u16(),
                url,
            });
        }

        info!(
            url = %url,
            status = status.as_u16(),
            content_length = ?response.content_length(),
            latency_ms = start.elapsed().as_millis() as u64,
            "download started"
        );
        Ok(SourceStream { response })
    }
}
