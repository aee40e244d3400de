//! Project directory archiving.
//!
//! Walks the project tree depth-first and streams every included file into a
//! deflate-compressed zip. Inclusion is decided per entry by an
//! [`EntryFilter`] over the forward-slash relative path, so the walk itself
//! stays oblivious to pattern semantics. The destination archive lives
//! inside the tree being walked and is skipped by path, never by name.

use std::fs::File;
use std::io;
use std::path::Path;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use crate::error::{PublishError, Result};
use crate::publish::Reporter;

/// Per-entry inclusion decision, keyed on the forward-slash relative path.
pub trait EntryFilter {
    fn includes(&self, relative_path: &str) -> bool;
}

/// What a finished archive contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Number of file entries written.
    pub entries: usize,
    /// Final on-disk size of the zip container in bytes.
    pub bytes: u64,
}

/// Archive every included file under `root` into a zip at `destination`.
///
/// An existing file at `destination` is truncated. Only regular files become
/// entries; directories exist in the archive implicitly through entry paths.
/// Each included file is reported as it is added. The summary counts entries
/// and the container's final size, so a zip holding nothing still reports a
/// non-zero `bytes`.
pub fn zip_directory(
    root: &Path,
    destination: &Path,
    filter: &dyn EntryFilter,
    reporter: &mut dyn Reporter,
) -> Result<ArchiveSummary> {
    let container = File::create(destination).map_err(|source| PublishError::ArchiveWrite {
        path: destination.to_path_buf(),
        source: ZipError::Io(source),
    })?;
    let mut writer = ZipWriter::new(container);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| PublishError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path == destination {
            continue;
        }
        let relative = match path.strip_prefix(root) {
            Ok(relative) => relative_slash_path(relative),
            Err(_) => continue,
        };
        if !filter.includes(&relative) {
            continue;
        }

        writer
            .start_file(relative.as_str(), options)
            .map_err(|source| PublishError::ArchiveWrite {
                path: destination.to_path_buf(),
                source,
            })?;
        let mut file = File::open(path).map_err(|source| PublishError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        io::copy(&mut file, &mut writer).map_err(|source| PublishError::ArchiveWrite {
            path: destination.to_path_buf(),
            source: ZipError::Io(source),
        })?;

        reporter.info(&format!("Adding: {relative}"));
        entries += 1;
    }

    let container = writer.finish().map_err(|source| PublishError::ArchiveWrite {
        path: destination.to_path_buf(),
        source,
    })?;
    let bytes = container
        .metadata()
        .map_err(|source| PublishError::ArchiveWrite {
            path: destination.to_path_buf(),
            source: ZipError::Io(source),
        })?
        .len();

    Ok(ArchiveSummary { entries, bytes })
}

/// Join path components with `/` regardless of the host separator.
fn relative_slash_path(relative: &Path) -> String {
    let mut joined = String::new();
    for component in relative.components() {
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(&component.as_os_str().to_string_lossy());
    }
    joined
}
