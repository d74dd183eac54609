use super::bitmap_font;
use anyhow::{anyhow, Context, Result};
use cosmic_text::{
    fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, Stretch, Style,
    SwashCache, Weight,
};
use std::path::PathBuf;

/// A font file plus the face to use inside it (`.ttc` collections carry several).
#[derive(Debug, Clone, PartialEq)]
pub struct FontCandidate {
    pub path: PathBuf,
    pub face_index: u32,
}

impl FontCandidate {
    pub fn new(path: impl Into<PathBuf>, face_index: u32) -> Self {
        Self {
            path: path.into(),
            face_index,
        }
    }
}

// ---------------------------------------------------------------------------
// LabelMask — single-channel coverage for a line of text
// ---------------------------------------------------------------------------

/// Horizontal extent of the inked columns of a mask. `right` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub left: u32,
    pub right: u32,
}

impl InkBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }
}

/// Coverage raster of a label, origin at the layout's top-left.
#[derive(Debug, Clone)]
pub struct LabelMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl LabelMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }

    /// Raise coverage at `(x, y)`; out-of-range writes are dropped.
    pub fn cover(&mut self, x: u32, y: u32, alpha: u8) {
        if x < self.width && y < self.height {
            let px = &mut self.alpha[(y * self.width + x) as usize];
            *px = (*px).max(alpha);
        }
    }

    pub fn ink_bounds(&self) -> Option<InkBounds> {
        let mut bounds: Option<InkBounds> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) == 0 {
                    continue;
                }
                let b = bounds.get_or_insert(InkBounds {
                    left: x,
                    right: x + 1,
                });
                b.left = b.left.min(x);
                b.right = b.right.max(x + 1);
            }
        }
        bounds
    }
}

// ---------------------------------------------------------------------------
// LabelFont — the resolved end of the fallback chain
// ---------------------------------------------------------------------------

/// A single face loaded through cosmic-text, isolated in its own font database.
pub struct FaceFont {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: String,
    weight: Weight,
    style: Style,
    stretch: Stretch,
}

impl FaceFont {
    pub fn load(candidate: &FontCandidate) -> Result<Self> {
        let data = std::fs::read(&candidate.path)
            .with_context(|| format!("Failed to read font {}", candidate.path.display()))?;

        let mut db = fontdb::Database::new();
        db.load_font_data(data);

        let face = db
            .faces()
            .find(|f| f.index == candidate.face_index)
            .ok_or_else(|| {
                anyhow!(
                    "{} has no face at index {}",
                    candidate.path.display(),
                    candidate.face_index
                )
            })?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| anyhow!("Face {} has no family name", face.index))?;
        let (id, weight, style, stretch) = (face.id, face.weight, face.style, face.stretch);

        // Keep only the requested face so shaping cannot pick a sibling.
        let siblings: Vec<_> = db.faces().map(|f| f.id).filter(|&f| f != id).collect();
        for sibling in siblings {
            db.remove_face(sibling);
        }

        Ok(Self {
            font_system: FontSystem::new_with_locale_and_db("en-US".to_string(), db),
            swash_cache: SwashCache::new(),
            family,
            weight,
            style,
            stretch,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn render(&mut self, text: &str, font_size: f32) -> LabelMask {
        let line_height = (font_size * 1.2).ceil();
        let width = (font_size * text.chars().count() as f32 * 1.5).ceil() as u32 + 2;
        let height = line_height as u32 + 1;

        let attrs = Attrs::new()
            .family(Family::Name(&self.family))
            .weight(self.weight)
            .style(self.style)
            .stretch(self.stretch);

        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font_size, line_height));
        buffer.set_size(
            &mut self.font_system,
            Some(width as f32),
            Some(height as f32),
        );
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut mask = LabelMask::new(width, height);
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            Color::rgb(0xFF, 0xFF, 0xFF),
            |x, y, w, h, color| {
                if x < 0 || y < 0 {
                    return;
                }
                let (x, y) = (x as u32, y as u32);
                for py in y..y + h {
                    for px in x..x + w {
                        mask.cover(px, py, color.a());
                    }
                }
            },
        );
        mask
    }
}

pub enum LabelFont {
    Face(Box<FaceFont>),
    Builtin,
}

impl LabelFont {
    pub fn name(&self) -> &str {
        match self {
            LabelFont::Face(face) => face.family(),
            LabelFont::Builtin => "built-in bitmap",
        }
    }

    /// Rasterize `text` at `font_size` pixels.
    pub fn render(&mut self, text: &str, font_size: f32) -> LabelMask {
        match self {
            LabelFont::Face(face) => {
                let mask = face.render(text, font_size);
                if mask.ink_bounds().is_some() {
                    return mask;
                }
                log::debug!(
                    "{} produced no ink for {text:?} at {font_size}px, using built-in font",
                    face.family()
                );
                bitmap_font::render(text, font_size)
            }
            LabelFont::Builtin => bitmap_font::render(text, font_size),
        }
    }
}

/// Walk `candidates` in priority order and return the first face that loads.
/// Never fails: the built-in bitmap font is the guaranteed last resort.
pub fn resolve_font(candidates: &[FontCandidate]) -> LabelFont {
    for candidate in candidates {
        match FaceFont::load(candidate) {
            Ok(face) => {
                log::info!(
                    "Label font: {} ({} face {})",
                    face.family(),
                    candidate.path.display(),
                    candidate.face_index
                );
                return LabelFont::Face(Box::new(face));
            }
            Err(e) => log::warn!("Skipping label font: {e:#}"),
        }
    }
    log::warn!("No label font available, falling back to the built-in bitmap font");
    LabelFont::Builtin
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// Fira Mono Medium (SIL OFL 1.1), so tests never depend on host fonts.
    const FIRA_MONO: &[u8] = include_bytes!("testdata/FiraMono-Medium.ttf");

    /// Drop the bundled face into `dir` and return it as a candidate.
    pub(crate) fn fira_mono(dir: &Path) -> FontCandidate {
        let path = dir.join("FiraMono-Medium.ttf");
        std::fs::write(&path, FIRA_MONO).unwrap();
        FontCandidate::new(path, 0)
    }

    #[test]
    fn test_missing_fonts_fall_back_to_builtin() {
        let candidates = vec![
            FontCandidate::new("/nonexistent/HelveticaNeue.ttc", 8),
            FontCandidate::new("/nonexistent/Helvetica.ttc", 0),
        ];
        let mut font = resolve_font(&candidates);
        assert!(matches!(font, LabelFont::Builtin));

        let mask = font.render("fn", 41.0);
        assert!(mask.ink_bounds().is_some());
    }

    #[test]
    fn test_corrupt_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let font = resolve_font(&[FontCandidate::new(path.clone(), 0)]);
        assert!(matches!(font, LabelFont::Builtin));
    }

    #[test]
    fn test_empty_candidate_list_yields_builtin() {
        assert_eq!(resolve_font(&[]).name(), "built-in bitmap");
    }

    #[test]
    fn test_ink_bounds_are_tight() {
        let mut mask = LabelMask::new(10, 6);
        assert_eq!(mask.ink_bounds(), None);

        mask.cover(3, 2, 10);
        mask.cover(6, 4, 200);
        mask.cover(42, 42, 255);
        let bounds = mask.ink_bounds().unwrap();
        assert_eq!(bounds, InkBounds { left: 3, right: 7 });
        assert_eq!(bounds.width(), 4);
    }

    #[test]
    fn test_later_candidate_loads_after_primary_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![
            FontCandidate::new("/nonexistent/HelveticaNeue.ttc", 8),
            fira_mono(dir.path()),
        ];

        let mut font = resolve_font(&candidates);
        assert!(matches!(font, LabelFont::Face(_)));
        assert!(font.name().contains("Fira Mono"), "{}", font.name());

        let mask = font.render("fn", 40.0);
        let ink = mask.ink_bounds().expect("face draws the label");
        assert!(ink.width() > 10, "ink only {} px wide", ink.width());
    }

    #[test]
    fn test_missing_face_index_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut candidate = fira_mono(dir.path());
        candidate.face_index = 3;

        let font = resolve_font(&[candidate]);
        assert!(matches!(font, LabelFont::Builtin));
    }

    #[test]
    fn test_face_render_at_tiny_size_still_has_ink() {
        let dir = tempfile::tempdir().unwrap();
        let mut font = resolve_font(&[fira_mono(dir.path())]);
        assert!(matches!(font, LabelFont::Face(_)));

        let mask = font.render("fn", 4.0);
        assert!(mask.ink_bounds().is_some());
    }

    #[test]
    fn test_face_render_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let mut font = resolve_font(&[fira_mono(dir.path())]);

        let a = font.render("fn", 40.0);
        let b = font.render("fn", 40.0);
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));
        for y in 0..a.height() {
            for x in 0..a.width() {
                assert_eq!(a.get(x, y), b.get(x, y), "({x}, {y})");
            }
        }
    }
}
