//! The download orchestrator.
//!
//! [`Downloader::run`] prepares the raw-data root, writes the README, then
//! syncs the direct dataset and the hub dataset in that order. Dataset
//! failures are logged with manual fallback instructions and recorded in
//! the report; only workspace and README failures are returned as errors.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::archive::extract_archive;
use crate::dataset::{DirectDataset, HubDataset};
use crate::error::RawfetchError;
use crate::fetch::Fetcher;
use crate::hub::{ensure_available, DatasetHub, Provisioner};
use crate::readme;
use crate::report::{DatasetOutcome, DatasetReport, RunReport};

pub struct Downloader {
    root: PathBuf,
    fetcher: Fetcher,
    hub: Box<dyn DatasetHub>,
    provisioners: Vec<Box<dyn Provisioner>>,
    direct: DirectDataset,
    hub_dataset: HubDataset,
}

impl Downloader {
    /// Downloader for GTSDB and LISA under `root`, without hub provisioning.
    pub fn new(root: impl Into<PathBuf>, fetcher: Fetcher, hub: Box<dyn DatasetHub>) -> Self {
        Self {
            root: root.into(),
            fetcher,
            hub,
            provisioners: Vec::new(),
            direct: DirectDataset::gtsdb(),
            hub_dataset: HubDataset::lisa(),
        }
    }

    pub fn with_provisioners(mut self, provisioners: Vec<Box<dyn Provisioner>>) -> Self {
        self.provisioners = provisioners;
        self
    }

    pub fn with_direct_dataset(mut self, dataset: DirectDataset) -> Self {
        self.direct = dataset;
        self
    }

    pub fn with_hub_dataset(mut self, dataset: HubDataset) -> Self {
        self.hub_dataset = dataset;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the raw-data root and its parents if missing, and drop staging
    /// directories left behind by an interrupted run.
    pub fn ensure_workspace(&self) -> Result<(), RawfetchError> {
        fs::create_dir_all(&self.root)?;
        self.sweep_stale_staging()?;
        Ok(())
    }

    fn sweep_stale_staging(&self) -> Result<(), RawfetchError> {
        let prefixes = [
            staging_prefix(&self.direct.name),
            staging_prefix(&self.hub_dataset.name),
        ];
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
                continue;
            }
            if !entry.file_type()?.is_dir() {
                continue;
            }
            info!("Removing stale staging directory {}", entry.path().display());
            if let Err(err) = fs::remove_dir_all(entry.path()) {
                warn!("could not remove {}: {err}", entry.path().display());
            }
        }
        Ok(())
    }

    /// Write the README unconditionally.
    pub fn write_readme(&self) -> Result<PathBuf, RawfetchError> {
        readme::write_readme(&self.root)
    }

    pub fn sync_direct_dataset(&self) -> DatasetReport {
        let dataset = &self.direct;
        let target = dataset.target_dir(&self.root);
        let outcome = if target.exists() {
            info!("{} already exists, skipping download.", dataset.name);
            DatasetOutcome::Skipped { path: target }
        } else {
            match self.fetch_direct(dataset, &target) {
                Ok(()) => {
                    info!("{} download and extraction completed!", dataset.name);
                    DatasetOutcome::Synced { path: target }
                }
                Err(err) => failed(&dataset.name, &err, vec![dataset.manual_url.clone()]),
            }
        };

        DatasetReport {
            name: dataset.name.clone(),
            outcome,
        }
    }

    pub fn sync_hub_dataset(&self) -> DatasetReport {
        let dataset = &self.hub_dataset;
        let target = dataset.target_dir(&self.root);
        let outcome = if target.exists() {
            info!("{} already exists, skipping download.", dataset.name);
            DatasetOutcome::Skipped { path: target }
        } else {
            match self.fetch_from_hub(dataset, &target) {
                Ok(()) => {
                    info!("{} dataset setup completed!", dataset.name);
                    DatasetOutcome::Synced { path: target }
                }
                Err(err @ RawfetchError::Provisioning { .. }) => {
                    failed(&dataset.name, &err, self.hub.manual_install_hint())
                }
                Err(err) => failed(&dataset.name, &err, vec![dataset.manual_url.clone()]),
            }
        };

        DatasetReport {
            name: dataset.name.clone(),
            outcome,
        }
    }

    /// Run every step in order.
    pub fn run(&self) -> Result<RunReport, RawfetchError> {
        info!("Starting dataset download process...");
        info!("Data directory: {}", self.root.display());

        self.ensure_workspace()?;
        self.write_readme()?;

        let datasets = vec![self.sync_direct_dataset(), self.sync_hub_dataset()];

        info!("=== Download Process Complete ===");
        Ok(RunReport {
            root: self.root.clone(),
            datasets,
        })
    }

    fn fetch_direct(&self, dataset: &DirectDataset, target: &Path) -> Result<(), RawfetchError> {
        info!("=== Downloading {} dataset ===", dataset.name);
        let archive = dataset.archive_path(&self.root);

        self.fetcher
            .fetch(&dataset.url, &archive, dataset.expected_sha256.as_deref())?;
        self.stage_into(&dataset.name, target, |staging| {
            extract_archive(&archive, staging)
        })?;

        remove_archive(&archive);
        Ok(())
    }

    fn fetch_from_hub(&self, dataset: &HubDataset, target: &Path) -> Result<(), RawfetchError> {
        info!("=== Downloading {} dataset from {} ===", dataset.name, self.hub.name());
        ensure_available(self.hub.as_ref(), &self.provisioners)?;

        let downloaded = self.hub.resolve(&dataset.hub_id)?;
        info!("Dataset downloaded to: {}", downloaded.display());

        if !downloaded.exists() {
            return Err(RawfetchError::PathNotFound(downloaded));
        }

        if downloaded.is_dir() {
            self.stage_into(&dataset.name, target, |staging| {
                copy_dir_all(&downloaded, staging)
            })
        } else {
            self.stage_into(&dataset.name, target, |staging| {
                extract_archive(&downloaded, staging)
            })
        }
    }

    /// Populate a hidden staging directory under the root, then move it onto
    /// `target`. The target only appears once `fill` has succeeded.
    fn stage_into<F>(&self, name: &str, target: &Path, fill: F) -> Result<(), RawfetchError>
    where
        F: FnOnce(&Path) -> Result<(), RawfetchError>,
    {
        let staging = tempfile::Builder::new()
            .prefix(&staging_prefix(name))
            .tempdir_in(&self.root)?;
        fill(staging.path())?;

        let staged = staging.keep();
        if let Err(err) = fs::rename(&staged, target) {
            let _ = fs::remove_dir_all(&staged);
            return Err(err.into());
        }
        Ok(())
    }
}

fn staging_prefix(name: &str) -> String {
    format!(".{name}-")
}

/// The dataset is already in place once this runs, so a leftover archive is
/// only worth a warning.
fn remove_archive(archive: &Path) {
    if let Err(err) = fs::remove_file(archive) {
        warn!("could not remove {}: {err}", archive.display());
    }
}

fn failed(name: &str, err: &RawfetchError, manual_fallback: Vec<String>) -> DatasetOutcome {
    error!("Error downloading {name}: {err}");
    if !manual_fallback.is_empty() {
        warn!("You can get it manually with:");
        for hint in &manual_fallback {
            warn!("  {hint}");
        }
    }
    DatasetOutcome::Failed {
        error: err.to_string(),
        manual_fallback,
    }
}

/// Recursively copy the contents of `source` into `destination`.
fn copy_dir_all(source: &Path, destination: &Path) -> Result<(), RawfetchError> {
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|err| RawfetchError::Io(err.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| RawfetchError::PathNotFound(entry.path().to_path_buf()))?;
        let dest = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
