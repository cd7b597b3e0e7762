//! Swapping a staged download into the game's mods folder

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::DISABLED_SUFFIX;

/// What happened to a staged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The staged file was moved into the mods folder
    Installed,
    /// A file with the same name was already installed; the staged copy was removed
    AlreadyPresent,
    /// The file name did not change, nothing was touched in the mods folder
    Unchanged,
}

/// Install `new_file` from `staging_dir` into `mods_dir`, disabling `previous_file`.
///
/// The previous file is renamed to `<name>.disabled` so the game stops
/// loading it but it can be restored by hand. If the new file cannot be
/// installed the previous one stays active.
pub fn apply_update(
    mods_dir: &Path,
    staging_dir: &Path,
    previous_file: Option<&str>,
    new_file: &str,
) -> io::Result<Applied> {
    let staged = staging_dir.join(new_file);

    if previous_file == Some(new_file) {
        remove_if_exists(&staged)?;
        return Ok(Applied::Unchanged);
    }

    let target = mods_dir.join(new_file);
    let applied = if target.exists() {
        debug!("{:?} already installed, discarding staged copy", target);
        remove_if_exists(&staged)?;
        Applied::AlreadyPresent
    } else {
        std::fs::create_dir_all(mods_dir)?;
        move_file(&staged, &target)?;
        info!("Installed {:?}", target);
        Applied::Installed
    };

    // Only disable the old jar once the new one is in place
    if let Some(previous) = previous_file {
        disable(&mods_dir.join(previous))?;
    }
    Ok(applied)
}

fn disabled_path(path: &Path) -> PathBuf {
    let mut disabled = path.as_os_str().to_owned();
    disabled.push(DISABLED_SUFFIX);
    PathBuf::from(disabled)
}

fn disable(path: &Path) -> io::Result<()> {
    if !path.exists() {
        warn!("Previous mod file {:?} not found, nothing to disable", path);
        return Ok(());
    }
    let disabled = disabled_path(path);
    std::fs::rename(path, &disabled)?;
    info!("Disabled {:?}", path);
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Rename, falling back to copy and delete across file systems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)
}
