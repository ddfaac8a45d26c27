//! Collision-safe copy and move of files into destination folders

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Whether the source file is kept after transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Relocate the file, removing the source
    #[default]
    Move,
    /// Copy the file, keeping the source
    Copy,
}

impl TransferMode {
    /// Pick the mode from the config `copy_mode` flag
    pub fn from_copy_flag(copy_mode: bool) -> Self {
        if copy_mode {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            TransferMode::Move => "Moved",
            TransferMode::Copy => "Copied",
        }
    }
}

/// Failure to transfer one file
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("File has no name: {}", .path.display())]
    NoFileName { path: PathBuf },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl TransferError {
    /// The underlying I/O error
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            TransferError::CreateDir { source, .. }
            | TransferError::Copy { source, .. }
            | TransferError::Move { source, .. } => Some(source),
            TransferError::NoFileName { .. } => None,
        }
    }
}

/// Copy or move `source` into `destination_dir`, never overwriting.
///
/// The directory is created if missing. When `destination_dir/<name>`
/// already exists, `(1)`, `(2)`, ... is inserted before the extension until
/// a free name is found. Returns the final path.
pub fn transfer(
    source: &Path,
    destination_dir: &Path,
    mode: TransferMode,
) -> Result<PathBuf, TransferError> {
    fs::create_dir_all(destination_dir).map_err(|e| TransferError::CreateDir {
        path: destination_dir.to_path_buf(),
        source: e,
    })?;

    let dest_path = unique_destination(source, destination_dir)?;

    match mode {
        TransferMode::Copy => {
            info!("Copying {} -> {}", source.display(), dest_path.display());
            copy_preserving(source, &dest_path).map_err(|e| TransferError::Copy {
                from: source.to_path_buf(),
                to: dest_path.clone(),
                source: e,
            })?;
        }
        TransferMode::Move => {
            info!("Moving {} -> {}", source.display(), dest_path.display());
            move_file(source, &dest_path).map_err(|e| TransferError::Move {
                from: source.to_path_buf(),
                to: dest_path.clone(),
                source: e,
            })?;
        }
    }

    Ok(dest_path)
}

/// First unused path for `source`'s file name inside `destination_dir`
pub fn unique_destination(source: &Path, destination_dir: &Path) -> Result<PathBuf, TransferError> {
    let filename = source.file_name().ok_or_else(|| TransferError::NoFileName {
        path: source.to_path_buf(),
    })?;

    let candidate = destination_dir.join(filename);
    if !is_occupied(&candidate) {
        return Ok(candidate);
    }

    let name = Path::new(filename);
    let stem = name.file_stem().unwrap_or(filename);
    let ext = name.extension();

    let mut index: u64 = 1;
    loop {
        let mut numbered = OsString::from(stem);
        numbered.push(format!("({})", index));
        if let Some(ext) = ext {
            numbered.push(".");
            numbered.push(ext);
        }
        let candidate = destination_dir.join(numbered);
        if !is_occupied(&candidate) {
            debug!(
                "Name collision for {}, using {}",
                filename.to_string_lossy(),
                candidate.display()
            );
            return Ok(candidate);
        }
        index += 1;
    }
}

/// Any directory entry counts, including a dangling symlink
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy contents and permissions, then carry over the modification time.
/// A failure to set the time only warns; the copy itself stands.
fn copy_preserving(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    if let Err(e) = copy_modified_time(from, to) {
        warn!(
            "Could not preserve modification time on {}: {}",
            to.display(),
            e
        );
    }

    Ok(())
}

fn copy_modified_time(from: &Path, to: &Path) -> io::Result<()> {
    let modified = fs::metadata(from)?.modified()?;
    let dest = fs::OpenOptions::new().write(true).open(to)?;
    dest.set_modified(modified)
}

/// Rename, falling back to copy + delete across filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "Rename across devices failed for {}, copying instead",
                from.display()
            );
            copy_preserving(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
