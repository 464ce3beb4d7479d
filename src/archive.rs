//! Zip extraction and directory tree copying

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Corrupt or unreadable archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Unpacks a zip archive held in memory into `target`, returning the file count
///
/// Entries whose names would escape `target` are skipped.
pub fn extract_zip(bytes: &[u8], target: &Path) -> Result<usize, ArchiveError> {
    fs::create_dir_all(target).map_err(io_err(target))?;
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut extracted = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(relative) = file.enclosed_name() else {
            warn!(entry = %file.name(), "Skipping archive entry outside the target directory");
            continue;
        };
        let out_path = target.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&out_path).map_err(io_err(&out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let mut out_file = fs::File::create(&out_path).map_err(io_err(&out_path))?;
        std::io::copy(&mut file, &mut out_file).map_err(io_err(&out_path))?;

        // Keep mvnw executable
        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(io_err(&out_path))?;
        }

        extracted += 1;
    }

    debug!(files = extracted, target = %target.display(), "Extracted archive");
    Ok(extracted)
}

/// Recursively copies `source` into `destination`, merging with existing content
///
/// Hidden files and directories are copied too. Returns the number of files copied.
pub fn copy_dir_all(source: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    fs::create_dir_all(destination).map_err(io_err(destination))?;
    let mut copied = 0;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf()),
            source: e,
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_err(&target))?;
            copied += 1;
        }
    }

    debug!(
        files = copied,
        from = %source.display(),
        to = %destination.display(),
        "Copied directory tree"
    );
    Ok(copied)
}
