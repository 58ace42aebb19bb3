//! Archive extraction.
//!
//! The archive kind is chosen from the file extension. Every member path is
//! checked before anything is written, so entries that would land outside
//! the destination (absolute paths, `..` components) abort extraction.

mod untar;
mod unzip;

use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::RawfetchError;

/// Archive container recognised by [`extract_archive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    /// Tar stream, possibly gzip-compressed (detected from the content).
    Tar,
}

impl ArchiveKind {
    /// Pick the archive kind from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, RawfetchError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "zip" => Ok(ArchiveKind::Zip),
            "tar" | "gz" | "tgz" => Ok(ArchiveKind::Tar),
            "" => Err(RawfetchError::UnsupportedFormat(format!(
                "'{}' has no extension",
                path.display()
            ))),
            other => Err(RawfetchError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Extract `archive_path` into `destination`, creating it if needed.
///
/// Unsupported extensions fail before the filesystem is touched.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<(), RawfetchError> {
    let kind = ArchiveKind::from_path(archive_path)?;
    info!("Extracting {}...", archive_path.display());

    std::fs::create_dir_all(destination)?;
    match kind {
        ArchiveKind::Zip => unzip::extract(archive_path, destination)?,
        ArchiveKind::Tar => untar::extract(archive_path, destination)?,
    }

    info!("Extracted to {}", destination.display());
    Ok(())
}

/// Turn an archive member path into a relative path that stays inside the
/// destination. `None` means the entry must not be written.
pub(crate) fn sanitize_entry_path(entry: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in entry.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}
