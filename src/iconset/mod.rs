pub mod packager;

use crate::icon::{self, label::LabelFont};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of an `.iconset`: a logical size in points and its pixel density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSize {
    pub base: u32,
    pub scale: u32,
}

impl IconSize {
    pub const fn new(base: u32, scale: u32) -> Self {
        Self { base, scale }
    }

    /// Edge length of the rendered canvas.
    pub fn pixels(&self) -> u32 {
        self.base * self.scale
    }

    /// `icon_<b>x<b>.png`, or `icon_<b>x<b>@<k>x.png` for high-density entries.
    pub fn file_name(&self) -> String {
        let b = self.base;
        if self.scale == 1 {
            format!("icon_{b}x{b}.png")
        } else {
            format!("icon_{b}x{b}@{}x.png", self.scale)
        }
    }
}

/// Render every size into `dir` and return the written paths in order.
///
/// A leftover `dir` from an earlier run is wiped first so the packager only
/// ever sees this run's files.
pub fn write_iconset(dir: &Path, sizes: &[IconSize], font: &mut LabelFont) -> Result<Vec<PathBuf>> {
    if dir.exists() {
        log::info!("Removing stale iconset at {}", dir.display());
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(sizes.len());
    for size in sizes {
        let px = size.pixels();
        let name = size.file_name();
        let path = dir.join(&name);

        let img = icon::create_icon(px, font)
            .with_context(|| format!("Failed to draw {name}"))?;
        img.save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::debug!("Wrote {}", path.display());
        println!("  {name} ({px}x{px})");
        written.push(path);
    }
    Ok(written)
}
