use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{Release, ReleaseAsset, ReleaseError};

const GITHUB_API_BASE: &str = "https://api.github.com";
const CLIENT_USER_AGENT: &str = concat!("tfmerge/", env!("CARGO_PKG_VERSION"));

/// GitHub releases client used to fetch the import tool and provider
/// binaries.
#[derive(Clone)]
pub struct ReleaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReleaseClient {
    pub fn new(token: Option<String>) -> Result<Self, ReleaseError> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self, ReleaseError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        if let Some(token) = token {
            let value = format!("token {token}");
            let header_value = HeaderValue::from_str(&value).map_err(|_| ReleaseError::Api {
                status: 0,
                message: "invalid token format".to_string(),
            })?;
            headers.insert(AUTHORIZATION, header_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ReleaseError::Network)?;

        Ok(Self { client, base_url })
    }

    /// Fetches the latest release, or a specific one when `tag` is given.
    pub async fn get_release(
        &self,
        repo: &str,
        tag: Option<&str>,
    ) -> Result<Release, ReleaseError> {
        let url = match tag {
            Some(tag) => format!("{}/repos/{}/releases/tags/{}", self.base_url, repo, tag),
            None => format!("{}/repos/{}/releases/latest", self.base_url, repo),
        };

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReleaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let release: Release = response.json().await.map_err(|e| ReleaseError::Api {
            status: status.as_u16(),
            message: format!("failed to parse release: {e}"),
        })?;

        tracing::info!(repo, tag = %release.tag_name, assets = release.assets.len(), "release fetched");
        Ok(release)
    }

    /// Downloads the given assets into `dir` with at most `concurrency`
    /// transfers in flight. Every worker's error is collected; the first
    /// failure (in completion order) is returned after all workers finish.
    pub async fn download_assets(
        &self,
        repo: &str,
        assets: &[ReleaseAsset],
        dir: &Path,
        concurrency: usize,
    ) -> Result<Vec<PathBuf>, ReleaseError> {
        tokio::fs::create_dir_all(dir).await?;

        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for asset in assets.iter().cloned() {
            let client = self.clone();
            let repo = repo.to_string();
            let dir = dir.to_path_buf();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // Holds a permit for the duration of one transfer.
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    ReleaseError::Download {
                        asset: asset.name.clone(),
                        message: "download pool closed".to_string(),
                    }
                })?;
                client.download_asset(&repo, &asset, &dir).await
            });
        }

        let mut paths = Vec::new();
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| ReleaseError::Download {
                asset: "<worker>".to_string(),
                message: e.to_string(),
            });
            match result.and_then(|r| r) {
                Ok(path) => paths.push(path),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => tracing::warn!(error = %e, "additional download failure"),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!(count = paths.len(), dir = %dir.display(), "assets downloaded");
                Ok(paths)
            }
        }
    }

    /// Downloads one asset via the asset endpoint, naming the file after
    /// the Content-Disposition filename when present.
    pub async fn download_asset(
        &self,
        repo: &str,
        asset: &ReleaseAsset,
        dir: &Path,
    ) -> Result<PathBuf, ReleaseError> {
        let url = format!(
            "{}/repos/{}/releases/assets/{}",
            self.base_url, repo, asset.id
        );
        tracing::debug!(url, asset = %asset.name, "starting download");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/octet-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::Download {
                asset: asset.name.clone(),
                message: format!("HTTP {status}"),
            });
        }

        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| asset.name.clone());
        let path = dir.join(file_name);

        let mut file = tokio::fs::File::create(&path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ReleaseError::Download {
                asset: asset.name.clone(),
                message: e.to_string(),
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(path = %path.display(), "download finished");
        Ok(path)
    }
}

fn disposition_filename(disposition: &str) -> Option<String> {
    let rest = disposition.split("filename=").nth(1)?;
    let name = rest
        .split(';')
        .next()
        .unwrap_or(rest)
        .trim()
        .trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

impl std::fmt::Debug for ReleaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(ReleaseClient::new(None).is_ok());
        assert!(ReleaseClient::new(Some("ghp_token".to_string())).is_ok());
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let client = ReleaseClient::new(Some("ghp_secret_12345".to_string())).unwrap();
        let debug_output = format!("{:?}", client);
        assert!(!debug_output.contains("ghp_secret_12345"));
    }

    #[test]
    fn test_disposition_filename_plain() {
        assert_eq!(
            disposition_filename("attachment; filename=terraformer-linux-amd64"),
            Some("terraformer-linux-amd64".to_string())
        );
    }

    #[test]
    fn test_disposition_filename_quoted() {
        assert_eq!(
            disposition_filename("attachment; filename=\"tool.zip\"; size=12"),
            Some("tool.zip".to_string())
        );
    }

    #[test]
    fn test_disposition_filename_absent() {
        assert_eq!(disposition_filename("attachment"), None);
        assert_eq!(disposition_filename("attachment; filename="), None);
    }
}
