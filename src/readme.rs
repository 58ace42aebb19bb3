use std::path::{Path, PathBuf};

use crate::error::RawfetchError;

/// Name of the generated document at the raw-data root.
pub const README_NAME: &str = "README.md";

pub const README_CONTENT: &str = r#"# Datasets

This directory contains the computer vision datasets for this project.

## GTSDB (German Traffic Sign Detection Benchmark)
- Source: http://benchmark.ini.rub.de/
- Size: ~2.7GB
- Contains: German traffic sign images with annotations

## LISA (Laboratory for Intelligent & Safe Automobiles)
- Source: https://www.kaggle.com/datasets/mbornoe/lisa-traffic-light-dataset
- Size: ~4.9GB
- Contains: US traffic sign images with annotations
- Downloaded via: kagglehub

## Setup
To download the datasets, run:
```bash
rawfetch
```

Note: Some datasets require manual download due to license agreements.
"#;

/// Write the dataset README under `root`, replacing whatever is there.
pub fn write_readme(root: &Path) -> Result<PathBuf, RawfetchError> {
    let path = root.join(README_NAME);
    std::fs::write(&path, README_CONTENT)?;
    Ok(path)
}
