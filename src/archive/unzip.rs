use std::fs::{self, File};
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::error::RawfetchError;

use super::sanitize_entry_path;

pub(super) fn extract(archive_path: &Path, destination: &Path) -> Result<(), RawfetchError> {
    let archive_err = |message: String| RawfetchError::Archive {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|source| archive_err(source.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| archive_err(source.to_string()))?;

        let relative = entry
            .enclosed_name()
            .and_then(|path| sanitize_entry_path(&path))
            .ok_or_else(|| RawfetchError::UnsafeArchiveEntry {
                archive: archive_path.to_path_buf(),
                entry: entry.name().to_string(),
            })?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let dest = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&dest)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&dest, fs::Permissions::from_mode(mode & 0o777))?;
            }
        }
    }

    Ok(())
}
