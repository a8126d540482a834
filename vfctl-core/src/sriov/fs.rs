//! Control file access.
//!
//! [`ControlFs`] is the seam between SR-IOV logic and the kernel's pseudo-files.
//! [`HostFs`] talks to the real filesystem; tests provide their own implementation.

use crate::error::{Result, VfError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Primitive operations over sysfs-style control files.
pub trait ControlFs {
    /// Read a file holding a base-10 integer.
    fn read_int(&self, path: &Path) -> Result<u32>;

    /// Write `value` as decimal text. The file must already exist.
    fn write_int(&self, path: &Path, value: u32) -> Result<()> {
        self.write_str(path, &value.to_string())
    }

    /// Write raw text. The file must already exist.
    fn write_str(&self, path: &Path, value: &str) -> Result<()>;

    /// True iff `path` is an existing directory.
    fn dir_exists(&self, path: &Path) -> bool;

    /// Names of the immediate children of `dir` starting with `prefix`.
    ///
    /// An empty prefix matches everything. With `dirs_only`, entries that are not
    /// directories (after following symlinks) are skipped.
    fn list_with_prefix(&self, dir: &Path, prefix: &str, dirs_only: bool) -> Result<Vec<String>>;

    /// Target of a symbolic link.
    fn read_link(&self, path: &Path) -> Result<PathBuf>;
}

/// [`ControlFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl ControlFs for HostFs {
    fn read_int(&self, path: &Path) -> Result<u32> {
        let content = fs::read_to_string(path)
            .map_err(|e| VfError::ReadFailed { path: path.to_path_buf(), source: e })?;
        let value = content.trim();
        value.parse().map_err(|e| VfError::InvalidValue {
            path: path.to_path_buf(),
            value: value.to_string(),
            source: e,
        })
    }

    fn write_str(&self, path: &Path, value: &str) -> Result<()> {
        trace!(path = %path.display(), value = %value, "Writing control file");

        // No `create`: a missing control file is an error, not something to materialize.
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| VfError::WriteFailed { path: path.to_path_buf(), source: e })?;
        file.write_all(value.as_bytes())
            .map_err(|e| VfError::WriteFailed { path: path.to_path_buf(), source: e })
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_with_prefix(&self, dir: &Path, prefix: &str, dirs_only: bool) -> Result<Vec<String>> {
        let list_err = |e: std::io::Error| VfError::ListFailed { path: dir.to_path_buf(), source: e };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !name.starts_with(prefix) {
                continue;
            }
            // virtfnN entries are symlinks, so follow them
            if dirs_only && !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).map_err(|e| VfError::ReadFailed { path: path.to_path_buf(), source: e })
    }
}
