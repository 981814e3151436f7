use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::trace;
use uuid::Uuid;

use crate::error::IconError;

/// Plus grand côté décrit par un conteneur ICO.
const MAX_ICON_EDGE: u32 = 256;

/// Icône écrite pour un seul chargement, supprimée au drop.
#[derive(Debug)]
pub(super) struct TemporaryIcon {
    path: PathBuf,
}

impl TemporaryIcon {
    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TemporaryIcon {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            trace!(path = %self.path.display(), error = %err, "temporary icon not removed");
        }
    }
}

/// Ré-encode `source` en fichier `.ico` dans le répertoire temporaire.
pub(super) fn to_temporary_icon(source: &Path) -> Result<TemporaryIcon, IconError> {
    let image = image::open(source).map_err(|err| convert_error(source, err))?;
    let image = fit_icon_bounds(image);

    let icon = TemporaryIcon {
        path: std::env::temp_dir().join(format!("traytoast-{}.ico", Uuid::new_v4().simple())),
    };
    DynamicImage::ImageRgba8(image.to_rgba8())
        .save_with_format(icon.path(), ImageFormat::Ico)
        .map_err(|err| convert_error(source, err))?;
    trace!(source = %source.display(), icon = %icon.path().display(), "image converted");
    Ok(icon)
}

fn fit_icon_bounds(image: DynamicImage) -> DynamicImage {
    if image.width() > MAX_ICON_EDGE || image.height() > MAX_ICON_EDGE {
        image.thumbnail(MAX_ICON_EDGE, MAX_ICON_EDGE)
    } else {
        image
    }
}

fn convert_error(path: &Path, source: image::ImageError) -> IconError {
    IconError::Convert {
        path: path.to_path_buf(),
        source,
    }
}
