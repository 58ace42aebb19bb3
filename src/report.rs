//! Run report types and terminal formatting.
//!
//! A report can be rendered as text (Display) or serialized as JSON.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// The result of a full download run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Raw-data root the run worked in.
    pub root: PathBuf,
    /// Per-dataset outcomes, in sync order.
    pub datasets: Vec<DatasetReport>,
}

/// Outcome of syncing one dataset.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: DatasetOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetOutcome {
    /// Fetched and staged during this run.
    Synced { path: PathBuf },
    /// Target directory already existed.
    Skipped { path: PathBuf },
    /// Sync failed; the run carried on.
    Failed {
        error: String,
        /// URLs or commands for getting the dataset by hand.
        manual_fallback: Vec<String>,
    },
}

impl RunReport {
    pub fn dataset(&self, name: &str) -> Option<&DatasetReport> {
        self.datasets.iter().find(|dataset| dataset.name == name)
    }

    pub fn failure_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|dataset| matches!(dataset.outcome, DatasetOutcome::Failed { .. }))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset download summary ({})", self.root.display())?;
        for dataset in &self.datasets {
            match &dataset.outcome {
                DatasetOutcome::Synced { path } => {
                    writeln!(f, "  {}: downloaded to {}", dataset.name, path.display())?
                }
                DatasetOutcome::Skipped { path } => writeln!(
                    f,
                    "  {}: already present at {}, skipped",
                    dataset.name,
                    path.display()
                )?,
                DatasetOutcome::Failed {
                    error,
                    manual_fallback,
                } => {
                    writeln!(f, "  {}: failed: {}", dataset.name, error)?;
                    for hint in manual_fallback {
                        writeln!(f, "      manual: {hint}")?;
                    }
                }
            }
        }

        if self.failure_count() > 0 {
            writeln!(f)?;
            writeln!(f, "Note: Some datasets may require manual download.")?;
        }
        writeln!(
            f,
            "Check {} for details.",
            self.root.join("README.md").display()
        )
    }
}
