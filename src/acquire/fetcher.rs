//! Streaming download of the distribution archive

use std::io;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::acquire::error::FetchError;
use crate::acquire::source::ArchiveSource;
use crate::config::BootstrapConfig;
use crate::version::types::ResolvedVersion;

/// Expands `{major}` and `{version}` in a download URL template
pub fn download_url(template: &str, version: &ResolvedVersion) -> String {
    template
        .replace("{major}", version.major())
        .replace("{version}", version.as_str())
}

/// Downloads archives over HTTP into a fixed file name
pub struct ArchiveFetcher {
    client: reqwest::Client,
    url_template: String,
    archive_file_name: String,
}

impl ArchiveFetcher {
    pub fn new(client: reqwest::Client, config: &BootstrapConfig) -> Self {
        Self {
            client,
            url_template: config.download_url_template.clone(),
            archive_file_name: config.archive_file_name.clone(),
        }
    }

    /// Streams the response body of `url` into `path`, returning the byte count
    async fn download(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Download returned status {}: {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let io_error = |source: io::Error| FetchError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(path).await.map_err(io_error)?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;

        Ok(written)
    }
}

#[async_trait::async_trait]
impl ArchiveSource for ArchiveFetcher {
    async fn fetch(
        &self,
        version: &ResolvedVersion,
        destination: &Path,
    ) -> Result<PathBuf, FetchError> {
        let url = download_url(&self.url_template, version);
        let path = destination.join(&self.archive_file_name);

        println!("Downloading Apache Maven from {}...", url);

        match self.download(&url, &path).await {
            Ok(bytes) => {
                info!("Downloaded {} bytes from {} to {:?}", bytes, url, path);
                Ok(path)
            }
            Err(e) => {
                discard_partial(&path).await;
                Err(e)
            }
        }
    }
}

async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial download {:?}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial download {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use rstest::rstest;
    use tempfile::TempDir;

    fn fetcher(template: String) -> ArchiveFetcher {
        let config = BootstrapConfig {
            download_url_template: template,
            ..BootstrapConfig::default()
        };
        ArchiveFetcher::new(reqwest::Client::new(), &config)
    }

    #[rstest]
    #[case(
        "3.9.6",
        "https://dlcdn.apache.org/maven/maven-3/3.9.6/binaries/apache-maven-3.9.6-bin.zip"
    )]
    #[case(
        "4.0.0",
        "https://dlcdn.apache.org/maven/maven-4/4.0.0/binaries/apache-maven-4.0.0-bin.zip"
    )]
    fn download_url_substitutes_major_and_version(#[case] version: &str, #[case] expected: &str) {
        let version = ResolvedVersion::pinned(version).unwrap();
        assert_eq!(
            download_url(crate::config::DEFAULT_DOWNLOAD_URL_TEMPLATE, &version),
            expected
        );
    }

    #[tokio::test]
    async fn fetch_writes_body_to_archive_file() {
        let mut server = Server::new_async().await;
        let body: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

        let mock = server
            .mock("GET", "/maven/maven-3/3.9.6/apache-maven-3.9.6-bin.zip")
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(&body)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let fetcher = fetcher(format!(
            "{}/maven/maven-{{major}}/{{version}}/apache-maven-{{version}}-bin.zip",
            server.url()
        ));
        let version = ResolvedVersion::pinned("3.9.6").unwrap();

        let path = fetcher.fetch(&version, dir.path()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(path, dir.path().join("mvn.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), body);
    }

    #[tokio::test]
    async fn fetch_returns_status_error_and_leaves_no_file() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/maven/maven-3/3.0.0/apache-maven-3.0.0-bin.zip")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let fetcher = fetcher(format!(
            "{}/maven/maven-{{major}}/{{version}}/apache-maven-{{version}}-bin.zip",
            server.url()
        ));
        let version = ResolvedVersion::pinned("3.0.0").unwrap();

        let result = fetcher.fetch(&version, dir.path()).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(FetchError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(!dir.path().join("mvn.zip").exists());
    }

    #[tokio::test]
    async fn fetch_returns_io_error_when_destination_is_missing() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/a.zip")
            .with_status(200)
            .with_body("zip")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let fetcher = fetcher(format!("{}/a.zip", server.url()));
        let version = ResolvedVersion::pinned("3.9.6").unwrap();

        let result = fetcher.fetch(&version, &missing).await;

        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
