use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error::RawfetchError;

use super::sanitize_entry_path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub(super) fn extract(archive_path: &Path, destination: &Path) -> Result<(), RawfetchError> {
    let mut reader = BufReader::new(File::open(archive_path)?);
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if gzipped {
        unpack(archive_path, GzDecoder::new(reader), destination)
    } else {
        unpack(archive_path, reader, destination)
    }
}

fn unpack<R: Read>(
    archive_path: &Path,
    reader: R,
    destination: &Path,
) -> Result<(), RawfetchError> {
    let archive_err = |source: std::io::Error| RawfetchError::Archive {
        path: archive_path.to_path_buf(),
        message: source.to_string(),
    };

    let mut archive = Archive::new(reader);
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        let raw_path = entry.path().map_err(archive_err)?.into_owned();

        let relative =
            sanitize_entry_path(&raw_path).ok_or_else(|| RawfetchError::UnsafeArchiveEntry {
                archive: archive_path.to_path_buf(),
                entry: raw_path.display().to_string(),
            })?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let kind = entry.header().entry_type();
        if matches!(kind, EntryType::Symlink | EntryType::Link) {
            if let Some(target) = entry.link_name().map_err(archive_err)? {
                // Symlinks resolve against their own directory, hard links against the root.
                let base = match kind {
                    EntryType::Symlink => relative.parent().unwrap_or(Path::new("")),
                    _ => Path::new(""),
                };
                if !stays_inside(base, &target) {
                    return Err(RawfetchError::UnsafeArchiveEntry {
                        archive: archive_path.to_path_buf(),
                        entry: raw_path.display().to_string(),
                    });
                }
            }
        }

        entry.unpack_in(destination).map_err(archive_err)?;
    }

    Ok(())
}

/// Whether `target`, resolved lexically against `base`, stays under the
/// extraction root. `..` is allowed as long as it never climbs above it.
fn stays_inside(base: &Path, target: &Path) -> bool {
    let mut depth = 0usize;
    for component in base.join(target).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(up) => depth = up,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}
