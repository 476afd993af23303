//! Directory-listing index scraper
//!
//! The release index is a plain HTML directory listing with one row per
//! version folder:
//!
//! ```text
//! <img src="/icons/folder.gif" alt="[DIR]"> <a href="3.9.6/">3.9.6/</a>  2023-12-01 10:15    -
//! ```

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::BootstrapConfig;
use crate::version::comparator::highest;
use crate::version::error::ResolveError;
use crate::version::source::VersionSource;
use crate::version::types::{CandidateSet, VersionString};

/// Extracts version folder names from a directory listing
pub struct ListingParser {
    /// Substring that marks a folder row
    marker: String,
    /// Link target of a folder row: `href="<segment>/`
    href_re: Regex,
}

impl ListingParser {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            href_re: Regex::new(r#"href="([^"/]+)/"#).expect("href pattern is valid"),
        }
    }

    /// Collects the version of every folder row, in page order.
    ///
    /// Rows whose folder name is not a numeric version are skipped.
    pub fn parse(&self, body: &str) -> CandidateSet {
        body.lines()
            .filter(|line| line.contains(&self.marker))
            .filter_map(|line| self.href_re.captures(line))
            .filter_map(|captures| {
                let segment = captures.get(1)?.as_str();
                VersionString::parse(segment)
                    .inspect_err(|_| warn!("Skipping non-version listing entry: {}", segment))
                    .ok()
            })
            .collect()
    }
}

/// Resolves the latest release by scraping the index page
pub struct IndexScraper {
    client: reqwest::Client,
    index_url: String,
    parser: ListingParser,
}

impl IndexScraper {
    pub fn new(client: reqwest::Client, config: &BootstrapConfig) -> Self {
        Self {
            client,
            index_url: config.index_url.clone(),
            parser: ListingParser::new(&config.listing_marker),
        }
    }

    /// Fetches the index page and returns every version it lists
    pub async fn list_versions(&self) -> Result<CandidateSet, ResolveError> {
        debug!("Fetching version index {}", self.index_url);

        let response = self.client.get(&self.index_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Index returned status {}: {}", status, self.index_url);
            return Err(ResolveError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read index response: {}", e);
            ResolveError::InvalidResponse(e.to_string())
        })?;

        let versions = self.parser.parse(&body);
        debug!("Index lists {} versions", versions.len());
        Ok(versions)
    }
}

#[async_trait::async_trait]
impl VersionSource for IndexScraper {
    async fn latest_version(&self) -> Result<VersionString, ResolveError> {
        println!("Fetching latest stable Maven version...");

        let versions = self.list_versions().await?;
        let latest = highest(&versions)?.clone();

        info!("Resolved latest version {} from {}", latest, self.index_url);
        println!("Latest stable Maven version is {}.", latest);
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LISTING_MARKER;
    use mockito::Server;

    const LISTING: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 3.2 Final//EN">
<html>
 <head>
  <title>Index of /maven/maven-3</title>
 </head>
 <body>
<h1>Index of /maven/maven-3</h1>
<pre><img src="/icons/blank.gif" alt="Icon "> <a href="?C=N;O=D">Name</a>                    <a href="?C=M;O=A">Last modified</a>      <a href="?C=S;O=A">Size</a>  <a href="?C=D;O=A">Description</a><hr><img src="/icons/back.gif" alt="[PARENTDIR]"> <a href="/maven/">Parent Directory</a>                             -
<img src="/icons/folder.gif" alt="[DIR]"> <a href="3.8.8/">3.8.8/</a>                  2024-10-08 12:12    -
<img src="/icons/folder.gif" alt="[DIR]"> <a href="3.9.10/">3.9.10/</a>                 2025-06-03 08:40    -
<img src="/icons/folder.gif" alt="[DIR]"> <a href="3.9.6/">3.9.6/</a>                  2024-10-08 12:12    -
<img src="/icons/folder.gif" alt="[DIR]"> <a href="KEYS-archive/">KEYS-archive/</a>           2024-10-08 12:12    -
<img src="/icons/text.gif" alt="[TXT]"> <a href="KEYS">KEYS</a>                    2024-10-08 12:12  1.2K
<hr></pre>
</body></html>
"#;

    fn scraper(url: &str) -> IndexScraper {
        let config = BootstrapConfig {
            index_url: url.to_string(),
            ..BootstrapConfig::default()
        };
        IndexScraper::new(reqwest::Client::new(), &config)
    }

    #[test]
    fn parse_collects_folder_rows_in_page_order() {
        let parser = ListingParser::new(DEFAULT_LISTING_MARKER);

        let versions: Vec<String> = parser
            .parse(LISTING)
            .iter()
            .map(|v| v.as_str().to_string())
            .collect();

        assert_eq!(versions, vec!["3.8.8", "3.9.10", "3.9.6"]);
    }

    #[test]
    fn parse_ignores_lines_without_marker() {
        let parser = ListingParser::new(DEFAULT_LISTING_MARKER);

        let body = r#"<a href="9.9.9/">9.9.9/</a>
<img src="/icons/folder.gif" alt="[DIR]"> <a href="3.9.6/">3.9.6/</a>"#;

        let versions = parser.parse(body);
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].as_str(), "3.9.6");
    }

    #[test]
    fn parse_returns_empty_for_listing_without_folders() {
        let parser = ListingParser::new(DEFAULT_LISTING_MARKER);
        assert!(parser.parse("<html><body>empty</body></html>").is_empty());
    }

    #[tokio::test]
    async fn latest_version_picks_numeric_maximum() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/maven/maven-3")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(LISTING)
            .create_async()
            .await;

        let scraper = scraper(&format!("{}/maven/maven-3", server.url()));
        let result = scraper.latest_version().await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.as_str(), "3.9.10");
    }

    #[tokio::test]
    async fn latest_version_fails_when_listing_has_no_versions() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/maven/maven-3")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let scraper = scraper(&format!("{}/maven/maven-3", server.url()));
        let result = scraper.latest_version().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::NoCandidates)));
    }

    #[tokio::test]
    async fn list_versions_returns_invalid_response_for_error_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/maven/maven-3")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let scraper = scraper(&format!("{}/maven/maven-3", server.url()));
        let result = scraper.list_versions().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn list_versions_returns_network_error_when_unreachable() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let scraper = scraper("http://127.0.0.1:9/maven/maven-3");
        let result = scraper.list_versions().await;

        assert!(matches!(result, Err(ResolveError::Network(_))));
    }
}
