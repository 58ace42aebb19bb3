//! Blocking HTTP download with optional checksum verification.

pub mod integrity;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::RawfetchError;

pub use integrity::{sha256_file, verify_sha256};

/// Streams HTTP(S) resources to disk.
#[derive(Clone, Debug)]
pub struct Fetcher {
    agent: ureq::Agent,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Fetcher {
    /// Create a fetcher. `None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        Self {
            agent: config.into(),
        }
    }

    /// Download `url` to `destination`, overwriting any existing file.
    ///
    /// When `expected_sha256` is given the downloaded file is hashed and
    /// compared; on mismatch the file is left on disk and
    /// [`RawfetchError::Integrity`] is returned.
    pub fn fetch(
        &self,
        url: &str,
        destination: &Path,
        expected_sha256: Option<&str>,
    ) -> Result<u64, RawfetchError> {
        info!("Downloading {url}...");

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|source| RawfetchError::Download {
                url: url.to_string(),
                message: source.to_string(),
            })?;

        let mut reader = response.into_body().into_reader();
        let mut writer = BufWriter::new(File::create(destination)?);
        let bytes = io::copy(&mut reader, &mut writer).map_err(|source| {
            RawfetchError::Download {
                url: url.to_string(),
                message: source.to_string(),
            }
        })?;
        writer.flush()?;
        drop(writer);

        info!("Downloaded to {}", destination.display());
        debug!("{bytes} bytes written");

        if let Some(expected) = expected_sha256 {
            verify_sha256(destination, expected)?;
            debug!("SHA-256 verified for {}", destination.display());
        }

        Ok(bytes)
    }
}
