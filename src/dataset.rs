//! Dataset descriptors.
//!
//! A descriptor names a dataset, says where it comes from, and determines
//! its target directory under the raw-data root (`<root>/<name>`).

use std::path::{Path, PathBuf};

/// GTSDB Full IJCNN 2013 archive.
pub const GTSDB_URL: &str =
    "https://sid.erda.dk/public/archives/ff17dc924eba88d5d01a807357d6614c/FullIJCNN2013.zip";
/// Landing page for manual GTSDB downloads.
pub const GTSDB_MANUAL_URL: &str =
    "https://sid.erda.dk/public/archives/ff17dc924eba88d5d01a807357d6614c/published-archive.html";
/// Kaggle id of the LISA traffic light dataset.
pub const LISA_HUB_ID: &str = "mbornoe/lisa-traffic-light-dataset";
/// Landing page for manual LISA downloads.
pub const LISA_MANUAL_URL: &str =
    "https://www.kaggle.com/datasets/mbornoe/lisa-traffic-light-dataset";

/// A dataset fetched from a single static archive URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectDataset {
    pub name: String,
    pub url: String,
    /// File name of the transient archive written under the root.
    pub archive_name: String,
    /// Lowercase hex SHA-256 of the archive, when known.
    pub expected_sha256: Option<String>,
    pub manual_url: String,
}

impl DirectDataset {
    /// Build a descriptor, deriving the archive file name from the URL path.
    ///
    /// Falls back to `<name>.zip` when the URL has no usable last segment.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let url = url.into();
        let archive_name =
            archive_name_from_url(&url).unwrap_or_else(|| format!("{name}.zip"));
        Self {
            manual_url: url.clone(),
            name,
            url,
            archive_name,
            expected_sha256: None,
        }
    }

    /// German Traffic Sign Detection Benchmark.
    pub fn gtsdb() -> Self {
        Self::new("GTSDB", GTSDB_URL).with_manual_url(GTSDB_MANUAL_URL)
    }

    pub fn with_expected_sha256(mut self, sha256: Option<String>) -> Self {
        self.expected_sha256 = sha256.map(|value| value.trim().to_ascii_lowercase());
        self
    }

    pub fn with_manual_url(mut self, url: impl Into<String>) -> Self {
        self.manual_url = url.into();
        self
    }

    pub fn target_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.name)
    }

    pub fn archive_path(&self, root: &Path) -> PathBuf {
        root.join(&self.archive_name)
    }
}

/// A dataset whose retrieval is delegated to a dataset hub client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubDataset {
    pub name: String,
    /// Identifier understood by the hub, e.g. `owner/slug`.
    pub hub_id: String,
    pub manual_url: String,
}

impl HubDataset {
    pub fn new(
        name: impl Into<String>,
        hub_id: impl Into<String>,
        manual_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hub_id: hub_id.into(),
            manual_url: manual_url.into(),
        }
    }

    /// LISA traffic light dataset, hosted on Kaggle.
    pub fn lisa() -> Self {
        Self::new("LISA", LISA_HUB_ID, LISA_MANUAL_URL)
    }

    pub fn target_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.name)
    }
}

fn archive_name_from_url(input: &str) -> Option<String> {
    let url = url::Url::parse(input).ok()?;
    let last = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?;
    Some(last.to_string())
}
