use std::fs::{self, File};
use std::io::{BufReader, Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::bank::{Bank, BankError, Entry};

pub const BANK_EXTENSION: &str = ".nus3bank";
pub const BACKUP_EXTENSION: &str = ".nus3bank.bak";

#[derive(Error, Debug)]
pub enum FileError {
    #[error("{}: not a .nus3bank or .nus3bank.bak file", path.display())]
    Extension { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Bank { path: PathBuf, source: BankError },
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

impl FileError {
    fn bank(path: &Path) -> impl FnOnce(BankError) -> FileError + '_ {
        move |source| FileError::Bank {
            path: path.to_path_buf(),
            source,
        }
    }

    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> FileError + '_ {
        move |source| FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn check_extension(path: &Path) -> Result<(), FileError> {
    let name = file_name(path);
    if name.ends_with(BANK_EXTENSION) || name.ends_with(BACKUP_EXTENSION) {
        Ok(())
    } else {
        Err(FileError::Extension {
            path: path.to_path_buf(),
        })
    }
}

/// Sibling path a backup of `path` is written to.
///
/// `None` when `path` already is a backup.
pub fn backup_path(path: &Path) -> Option<PathBuf> {
    let name = file_name(path);
    if name.is_empty() || name.ends_with(".bak") {
        return None;
    }
    Some(path.with_file_name(format!("{}.bak", name)))
}

/// Open a bank for reading straight from disk.
pub fn open(path: &Path) -> Result<Bank<BufReader<File>>, FileError> {
    let file = File::open(path).map_err(FileError::io(path))?;
    Bank::open(BufReader::new(file)).map_err(FileError::bank(path))
}

/// Load a whole bank into memory so edits can be staged.
pub fn load(path: &Path) -> Result<Bank<Cursor<Vec<u8>>>, FileError> {
    let data = fs::read(path).map_err(FileError::io(path))?;
    debug!("{}: loaded {} bytes", path.display(), data.len());
    Bank::open(Cursor::new(data)).map_err(FileError::bank(path))
}

pub fn read_volume(path: &Path, idx: u32) -> Result<f32, FileError> {
    open(path)?.get_volume(idx).map_err(FileError::bank(path))
}

pub fn read_entries(path: &Path) -> Result<Vec<Entry>, FileError> {
    open(path)?.entries().map_err(FileError::bank(path))
}

#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Write the patched bank here instead of over the source.
    pub output: Option<PathBuf>,
    /// Copy the source to its `.bak` sibling before overwriting it.
    pub backup: bool,
}

/// Set the volume of entry `idx` and write the result back.
///
/// The patch happens in memory; the destination is only replaced once it
/// succeeded, and then through a rename so a reader never sees a partial
/// file. Returns the previous volume.
pub fn write_volume(
    path: &Path,
    idx: u32,
    value: f32,
    opts: &WriteOptions,
) -> Result<f32, FileError> {
    let mut bank = load(path)?;
    let previous = bank.get_volume(idx).map_err(FileError::bank(path))?;
    bank.set_volume(idx, value).map_err(FileError::bank(path))?;
    let data = bank.into_inner().into_inner();

    let target = opts.output.as_deref().unwrap_or(path);
    if opts.backup && target == path {
        if let Some(bak) = backup_path(path) {
            fs::copy(path, &bak).map_err(FileError::io(&bak))?;
            info!("backup written to {}", bak.display());
        }
    }

    persist(target, &data)?;
    info!("{}: entry {} volume {} -> {}", target.display(), idx, previous, value);
    Ok(previous)
}

/// Set the same volume on every bank in `paths`.
///
/// A bank that fails does not stop the others; every path gets its own
/// result, the previous volume on success.
pub fn write_volumes<'a>(
    paths: &'a [PathBuf],
    idx: u32,
    value: f32,
    opts: &WriteOptions,
    strict_extension: bool,
) -> Vec<(&'a Path, Result<f32, FileError>)> {
    paths
        .iter()
        .map(|path| {
            let res = if strict_extension {
                check_extension(path)
            } else {
                Ok(())
            };
            let res = res.and_then(|_| write_volume(path, idx, value, opts));
            (path.as_path(), res)
        })
        .collect()
}

// Replace `target` with `data` through a rename in the same directory. An
// existing target is resolved through symlinks first and keeps its mode.
fn persist(target: &Path, data: &[u8]) -> Result<(), FileError> {
    let (target, permissions) = match fs::metadata(target) {
        Ok(meta) => {
            let real = fs::canonicalize(target).map_err(FileError::io(target))?;
            (real, Some(meta.permissions()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => (target.to_path_buf(), None),
        Err(e) => return Err(FileError::io(target)(e)),
    };

    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(FileError::io(dir))?;
    tmp.write_all(data).map_err(FileError::io(&target))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(FileError::io(&target))?;
    }
    tmp.as_file().sync_all().map_err(FileError::io(&target))?;
    tmp.persist(&target)?;
    Ok(())
}
