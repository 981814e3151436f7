//! Turns an optional icon path into a loaded icon handle.
//!
//! Resolution never fails: a custom icon that cannot be read, converted or
//! loaded degrades to the generic system icon, and so does a bundled icon that
//! cannot be materialized.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::IconError;
use crate::shell::{IconHandle, InstanceId, Shell};

#[cfg(feature = "convert")]
mod convert;

const BUNDLED_ICON: &[u8] = include_bytes!("../../assets/traytoast.ico");
const BUNDLED_ICON_NAME: &str = "traytoast-default.ico";

/// Where the loaded icon came from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum IconSource {
    /// A caller-supplied `.ico` file.
    Custom(PathBuf),
    /// A caller-supplied image converted to a temporary `.ico` first.
    Converted(PathBuf),
    /// The default icon shipped with the crate, or its configured override.
    Bundled(PathBuf),
    /// The shell's generic application icon.
    System,
    /// Nothing could be loaded at all.
    Missing,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedIcon {
    pub handle: IconHandle,
    pub source: IconSource,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconSettings {
    /// Replaces the bundled icon when no icon path is requested.
    pub default_icon: Option<PathBuf>,
}

pub fn resolve(
    shell: &dyn Shell,
    instance: InstanceId,
    icon_path: Option<&Path>,
    settings: &IconSettings,
) -> ResolvedIcon {
    let attempt = match icon_path {
        Some(path) => load_custom(shell, instance, path),
        None => load_bundled(shell, instance, settings),
    };
    match attempt {
        Ok(resolved) => {
            debug!(source = ?resolved.source, "icon loaded");
            resolved
        }
        Err(err) => {
            warn!(
                error = %err,
                requested = ?icon_path,
                "icon unavailable, using the system icon"
            );
            system_icon(shell)
        }
    }
}

fn load_custom(
    shell: &dyn Shell,
    instance: InstanceId,
    path: &Path,
) -> Result<ResolvedIcon, IconError> {
    let absolute = fs::canonicalize(path).map_err(|source| IconError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "convert")]
    if !is_native_icon(&absolute) {
        let temporary = convert::to_temporary_icon(&absolute)?;
        let handle = shell.load_icon_file(temporary.path(), instance)?;
        return Ok(ResolvedIcon {
            handle,
            source: IconSource::Converted(absolute),
        });
    }

    let handle = shell.load_icon_file(&absolute, instance)?;
    Ok(ResolvedIcon {
        handle,
        source: IconSource::Custom(absolute),
    })
}

fn load_bundled(
    shell: &dyn Shell,
    instance: InstanceId,
    settings: &IconSettings,
) -> Result<ResolvedIcon, IconError> {
    let path = match &settings.default_icon {
        Some(path) => path.clone(),
        None => bundled_icon_path()?,
    };
    let handle = shell.load_icon_file(&path, instance)?;
    Ok(ResolvedIcon {
        handle,
        source: IconSource::Bundled(path),
    })
}

fn system_icon(shell: &dyn Shell) -> ResolvedIcon {
    match shell.load_system_icon() {
        Ok(handle) => ResolvedIcon {
            handle,
            source: IconSource::System,
        },
        Err(err) => {
            warn!(error = %err, "system icon unavailable, tray entry will have no icon");
            ResolvedIcon {
                handle: IconHandle::NONE,
                source: IconSource::Missing,
            }
        }
    }
}

/// Writes the embedded default icon to the temp directory, once.
///
/// # Errors
///
/// Fails when the temp directory is not writable.
pub fn bundled_icon_path() -> Result<PathBuf, IconError> {
    materialize_bundled(&std::env::temp_dir())
}

fn materialize_bundled(dir: &Path) -> Result<PathBuf, IconError> {
    let path = dir.join(BUNDLED_ICON_NAME);
    if fs::read(&path).is_ok_and(|existing| existing == BUNDLED_ICON) {
        return Ok(path);
    }

    // Staged then renamed into place.
    let staging = dir.join(format!("{BUNDLED_ICON_NAME}.{}.tmp", Uuid::new_v4().simple()));
    trace!(path = %path.display(), "writing bundled icon");
    fs::write(&staging, BUNDLED_ICON)
        .and_then(|()| fs::rename(&staging, &path))
        .map_err(|source| {
            let _ = fs::remove_file(&staging);
            IconError::Io {
                path: path.clone(),
                source,
            }
        })?;
    Ok(path)
}

#[must_use]
pub fn is_native_icon(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ico"))
}
