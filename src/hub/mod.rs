//! Dataset hub clients.
//!
//! A hub turns a dataset identifier into a local path, owning its own
//! caching, authentication and transport. The downloader only sees the
//! [`DatasetHub`] capability, so tests can substitute a fixed local path.

#[cfg(feature = "hf")]
pub mod huggingface;
pub mod kaggle;
pub mod provision;

use std::path::PathBuf;

use crate::error::RawfetchError;

pub use kaggle::KaggleHub;
pub use provision::{ensure_available, CommandProvisioner, Provisioner};

#[cfg(feature = "hf")]
pub use huggingface::HuggingFaceHub;

/// Capability to resolve a hub dataset id to a local path.
pub trait DatasetHub {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the client can be used right now.
    fn is_available(&self) -> bool;

    /// Fetch `dataset_id` and return where it landed locally.
    ///
    /// The path may be a directory or a single archive file.
    fn resolve(&self, dataset_id: &str) -> Result<PathBuf, RawfetchError>;

    /// Commands a user can run to install the client by hand.
    fn manual_install_hint(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Hub backends selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum HubKind {
    /// Kaggle, through the `kagglehub` Python package.
    Kaggle,
    /// Hugging Face Hub dataset repositories.
    #[value(name = "huggingface", alias = "hf")]
    HuggingFace,
}
