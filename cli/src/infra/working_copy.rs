//! Infrastructure implementation of the `WorkingCopies` port.

use std::any::Any;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::WorkingCopies;

/// Copies a terraform definition into a [`tempfile::TempDir`].
///
/// `.terraform/`, local state files and `.git/` stay behind, so the copy
/// starts uninitialised with no state of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct TempWorkingCopies;

impl WorkingCopies for TempWorkingCopies {
    fn copy_definition(&self, dir: &Path) -> Result<(PathBuf, Box<dyn Any + Send>)> {
        let tmp = tempfile::Builder::new()
            .prefix("tfcheck-")
            .tempdir()
            .context("creating temp dir for working copy")?;
        copy_tree(dir, tmp.path()).with_context(|| {
            format!("copying {} to {}", dir.display(), tmp.path().display())
        })?;
        tracing::debug!(
            from = %dir.display(),
            to = %tmp.path().display(),
            "created working copy"
        );
        Ok((tmp.path().to_path_buf(), Box::new(tmp)))
    }
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let name = entry.file_name();
        if is_skipped(&name) {
            continue;
        }
        let src = entry.path();
        let dst = to.join(&name);
        // follows symlinks
        let meta = std::fs::metadata(&src)?;
        if meta.is_dir() {
            std::fs::create_dir(&dst)?;
            copy_tree(&src, &dst)?;
        } else {
            std::fs::copy(&src, &dst)?;
        }
    }
    Ok(())
}

/// Entries that must not follow the definition into a copy.
fn is_skipped(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name == ".terraform" || name == ".git" || name.starts_with("terraform.tfstate")
}
