use crate::domain::ports::ContentSource;
use crate::utils::error::{PageError, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ContentSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Requesting content document from: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("Content response status: {}", status);
        if !status.is_success() {
            return Err(PageError::HttpStatusError {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading content document from: {}", self.path.display());
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Content source picked from a location string: `http(s)://` URLs are
/// fetched, anything else is a path relative to the site directory.
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    pub fn from_location(
        location: &str,
        site_dir: &Path,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            crate::utils::validation::validate_url("content", location)?;
            let source = match timeout {
                Some(timeout) => HttpSource::with_timeout(location, timeout)?,
                None => HttpSource::new(location),
            };
            return Ok(AnySource::Http(source));
        }

        crate::utils::validation::validate_path("content", location)?;
        Ok(AnySource::File(FileSource::new(site_dir.join(location))))
    }
}

impl ContentSource for AnySource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            AnySource::Http(source) => source.fetch().await,
            AnySource::File(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_http_source_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"projects": [], "skills": []}));
        });

        let source = HttpSource::new(server.url("/data.json"));
        let bytes = source.fetch().await.unwrap();

        api_mock.assert();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["projects"].is_array());
    }

    #[tokio::test]
    async fn test_http_source_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/data.json");
            then.status(404);
        });

        let source = HttpSource::new(server.url("/data.json"));
        match source.fetch().await {
            Err(PageError::HttpStatusError { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"projects":[]}"#).unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), br#"{"projects":[]}"#.to_vec());
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/definitely/not/here/data.json");
        assert!(matches!(source.fetch().await, Err(PageError::IoError(_))));
    }

    #[test]
    fn test_from_location_picks_source() {
        let site = Path::new("/srv/site");
        assert!(matches!(
            AnySource::from_location("https://example.com/data.json", site, None).unwrap(),
            AnySource::Http(_)
        ));
        match AnySource::from_location("data.json", site, None).unwrap() {
            AnySource::File(source) => assert_eq!(source.describe(), "/srv/site/data.json"),
            AnySource::Http(_) => panic!("expected file source"),
        }
        assert!(AnySource::from_location("", site, None).is_err());
    }
}
