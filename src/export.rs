//! Writes catalog thumbnails to PNG files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use image::RgbImage;
use log::info;

use crate::catalog::Catalog;
use crate::pdf::{Bitmap, DocumentLoader};
use crate::thumbnail::render_thumbnail;

/// Render every catalog thumbnail at `container_width` into `dir`.
///
/// Files are named `NN-<stem>.png` in catalog order. Failed renders are
/// written as their placeholder, so every entry gets a file.
pub fn export_thumbnails(
    catalog: &Catalog,
    loader: &dyn DocumentLoader,
    container_width: f32,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(catalog.len());
    for (index, entry) in catalog.entries().iter().enumerate() {
        let thumbnail = render_thumbnail(loader, &entry.url, container_width);
        let bitmap = thumbnail
            .canvas
            .bitmap()
            .ok_or_else(|| anyhow!("Thumbnail for {} has no pixels", entry.url))?;

        let path = dir.join(file_name(index, &entry.url));
        save_png(bitmap, &path)?;
        info!("Exported thumbnail for {} to {}", entry.title, path.display());
        written.push(path);
    }
    Ok(written)
}

fn file_name(index: usize, url: &str) -> String {
    let stem = Path::new(url)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{:02}-{stem}.png", index + 1)
}

pub fn save_png(bitmap: &Bitmap, path: &Path) -> Result<()> {
    let image = RgbImage::from_raw(bitmap.width, bitmap.height, bitmap.pixels.clone())
        .ok_or_else(|| anyhow!("Bitmap size does not match its pixel buffer"))?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
