use crate::domain::SourceError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport seam for the resolver. Production uses [`HttpFetcher`];
/// offline mirrors and tests use [`FileFetcher`].
pub trait Fetch {
    /// Retrieves `url` into `dest`, returning the byte count. An empty body
    /// is a [`SourceError::EmptyDownload`], never a zero-length success.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SourceError>;
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SourceError> {
        (**self).fetch(url, dest)
    }
}

/// Plain blocking HTTP(S) GET. No authentication, no resume: a failed
/// transfer is simply a failed strategy.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|error| SourceError::Download {
                url: String::new(),
                detail: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|error| SourceError::Download {
                url: url.to_string(),
                detail: error.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Download {
                url: url.to_string(),
                detail: format!("HTTP {status}"),
            });
        }
        let body = response.bytes().map_err(|error| SourceError::Download {
            url: url.to_string(),
            detail: error.to_string(),
        })?;
        if body.is_empty() {
            return Err(SourceError::EmptyDownload {
                url: url.to_string(),
            });
        }
        fs::write(dest, &body).map_err(|source| SourceError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(body.len() as u64)
    }
}

/// Serves "URLs" from a local mirror directory: the URL's trailing filename
/// is looked up under the mirror root. Used for air-gapped clusters that
/// rsync the potential repositories, and for offline tests.
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn local_path(&self, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap_or(url);
        self.root.join(name)
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SourceError> {
        let local = self.local_path(url);
        if !local.is_file() {
            return Err(SourceError::Download {
                url: url.to_string(),
                detail: format!("not in mirror: '{}'", local.display()),
            });
        }
        let copied = fs::copy(&local, dest).map_err(|source| SourceError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        if copied == 0 {
            return Err(SourceError::EmptyDownload {
                url: url.to_string(),
            });
        }
        Ok(copied)
    }
}
