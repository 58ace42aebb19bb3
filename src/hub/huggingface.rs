use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use tracing::{debug, info};

use crate::error::RawfetchError;

use super::DatasetHub;

const NAME: &str = "huggingface";

/// Hugging Face Hub dataset repositories, fetched with `hf-hub`.
///
/// Every file of the repository is pulled into the hf-hub cache and the
/// snapshot directory is returned.
#[derive(Clone, Debug, Default)]
pub struct HuggingFaceHub {
    cache_dir: Option<PathBuf>,
    token: Option<String>,
}

impl HuggingFaceHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_dir(mut self, cache_dir: Option<PathBuf>) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Explicit token; `HF_TOKEN` is used when unset.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

impl DatasetHub for HuggingFaceHub {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn resolve(&self, dataset_id: &str) -> Result<PathBuf, RawfetchError> {
        let hub_err = |message: String| RawfetchError::Hub {
            hub: NAME.to_string(),
            dataset: dataset_id.to_string(),
            message,
        };

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        let effective_token = self.token.clone().or_else(|| std::env::var("HF_TOKEN").ok());
        if effective_token.is_some() {
            builder = builder.with_token(effective_token);
        }

        let api = builder.build().map_err(|source| hub_err(source.to_string()))?;
        let repo = api.dataset(dataset_id.to_string());
        let repo_info = repo.info().map_err(|source| hub_err(source.to_string()))?;

        if repo_info.siblings.is_empty() {
            return Err(hub_err("repository has no files".to_string()));
        }

        info!(
            "Fetching {} file(s) from {dataset_id}...",
            repo_info.siblings.len()
        );
        let mut snapshot = None;
        for sibling in &repo_info.siblings {
            let local = repo.get(&sibling.rfilename).map_err(|source| {
                hub_err(format!("failed downloading '{}': {source}", sibling.rfilename))
            })?;
            debug!("{} -> {}", sibling.rfilename, local.display());
            if snapshot.is_none() {
                snapshot = snapshot_root(&local, &sibling.rfilename);
            }
        }

        snapshot.ok_or_else(|| hub_err("could not locate the snapshot directory".to_string()))
    }
}

/// Strip the repository-relative `rfilename` off a cached file path.
fn snapshot_root(local: &Path, rfilename: &str) -> Option<PathBuf> {
    let depth = rfilename.split('/').filter(|part| !part.is_empty()).count();
    local.ancestors().nth(depth).map(Path::to_path_buf)
}
