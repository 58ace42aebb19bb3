use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::RawfetchError;

use super::provision::{CommandProvisioner, Provisioner};
use super::DatasetHub;

const PACKAGE: &str = "kagglehub";

/// Prints the local path of the downloaded dataset on the last stdout line.
const RESOLVE_PROGRAM: &str =
    "import sys, kagglehub\nprint(kagglehub.dataset_download(sys.argv[1]))";

/// Kaggle datasets via the `kagglehub` Python package.
///
/// Credentials and caching are left entirely to `kagglehub`
/// (`~/.kaggle/kaggle.json`, `KAGGLE_USERNAME`/`KAGGLE_KEY`).
#[derive(Clone, Debug)]
pub struct KaggleHub {
    python: PathBuf,
}

impl KaggleHub {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Installation strategies tried when `kagglehub` is missing: pipx
    /// first, then pip into the interpreter overriding system protection.
    pub fn default_provisioners(&self) -> Vec<Box<dyn Provisioner>> {
        vec![
            Box::new(CommandProvisioner::new(
                PACKAGE,
                "pipx",
                ["install", PACKAGE, "--include-deps"],
            )),
            Box::new(CommandProvisioner::new(
                PACKAGE,
                self.python.clone(),
                ["-m", "pip", "install", PACKAGE, "--break-system-packages"],
            )),
        ]
    }
}

impl DatasetHub for KaggleHub {
    fn name(&self) -> &str {
        PACKAGE
    }

    fn is_available(&self) -> bool {
        Command::new(&self.python)
            .args(["-c", "import kagglehub"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn resolve(&self, dataset_id: &str) -> Result<PathBuf, RawfetchError> {
        let hub_err = |message: String| RawfetchError::Hub {
            hub: PACKAGE.to_string(),
            dataset: dataset_id.to_string(),
            message,
        };

        debug!("{} -c <kagglehub.dataset_download> {dataset_id}", self.python.display());
        let output = Command::new(&self.python)
            .args(["-c", RESOLVE_PROGRAM, dataset_id])
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| {
                hub_err(format!("failed to run {}: {source}", self.python.display()))
            })?;

        if !output.status.success() {
            return Err(hub_err(format!("dataset_download exited with {}", output.status)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        last_non_empty_line(&stdout)
            .map(PathBuf::from)
            .ok_or_else(|| hub_err("dataset_download did not report a path".to_string()))
    }

    fn manual_install_hint(&self) -> Vec<String> {
        vec![
            format!("pipx install {PACKAGE} --include-deps"),
            format!("pip install {PACKAGE} --break-system-packages"),
        ]
    }
}

fn last_non_empty_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
}
