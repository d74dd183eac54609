use crate::icon::label::FontCandidate;
use crate::iconset::packager::Packager;
use crate::iconset::IconSize;
use std::path::PathBuf;

/// Transient folder the per-resolution PNGs are written into.
pub const ICONSET_DIR_NAME: &str = "AppIcon.iconset";

/// Packed container produced by the packager.
pub const ICNS_FILE_NAME: &str = "AppIcon.icns";

/// External converter shipped with macOS.
pub const PACKAGER_PROGRAM: &str = "iconutil";

/// Every resolution an `.iconset` folder is expected to carry.
pub const ICONSET_SIZES: [IconSize; 10] = [
    IconSize::new(16, 1),
    IconSize::new(16, 2),
    IconSize::new(32, 1),
    IconSize::new(32, 2),
    IconSize::new(128, 1),
    IconSize::new(128, 2),
    IconSize::new(256, 1),
    IconSize::new(256, 2),
    IconSize::new(512, 1),
    IconSize::new(512, 2),
];

/// Label font candidates, highest priority first.
const FONT_CANDIDATES: [(&str, u32); 3] = [
    // Face 8 of the collection is Helvetica Neue Bold.
    ("/System/Library/Fonts/HelveticaNeue.ttc", 8),
    ("/System/Library/Fonts/Helvetica.ttc", 0),
    ("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf", 0),
];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_dir: PathBuf,
    pub sizes: Vec<IconSize>,
    pub packager: Packager,
    pub fonts: Vec<FontCandidate>,
}

impl GeneratorConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sizes: ICONSET_SIZES.to_vec(),
            packager: Packager::new(PACKAGER_PROGRAM),
            fonts: FONT_CANDIDATES
                .iter()
                .map(|&(path, face_index)| FontCandidate::new(path, face_index))
                .collect(),
        }
    }

    pub fn iconset_dir(&self) -> PathBuf {
        self.base_dir.join(ICONSET_DIR_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(ICNS_FILE_NAME)
    }
}
