use crate::config::GeneratorConfig;
use crate::icon::label;
use crate::iconset;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Rasterize every size, pack them into an `.icns` and drop the iconset.
///
/// On any failure the iconset directory is left in place for inspection.
/// Returns the path of the packed icon.
pub fn generate(config: &GeneratorConfig) -> Result<PathBuf> {
    let iconset_dir = config.iconset_dir();
    let output = config.output_path();

    let mut font = label::resolve_font(&config.fonts);
    let written = iconset::write_iconset(&iconset_dir, &config.sizes, &mut font)?;
    log::info!(
        "Rendered {} images with the {} font",
        written.len(),
        font.name()
    );

    config.packager.pack(&iconset_dir, &output)?;
    println!("\nCreated {}", output.display());

    fs::remove_dir_all(&iconset_dir)
        .with_context(|| format!("Failed to remove {}", iconset_dir.display()))?;
    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::iconset::packager::tests::fake_packager;

    /// Stands in for the container by listing what it was handed.
    const LISTING_PACKAGER: &str = r#"ls "$3" > "$5""#;

    fn config_in(dir: &std::path::Path, packager_body: &str) -> GeneratorConfig {
        let mut config = GeneratorConfig::new(dir);
        config.fonts.clear();
        config.packager = fake_packager(dir, packager_body);
        config
    }

    #[test]
    fn test_full_run_packs_all_sizes_and_removes_iconset() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), LISTING_PACKAGER);

        let output = generate(&config).unwrap();

        assert_eq!(output, tmp.path().join("AppIcon.icns"));
        assert!(!config.iconset_dir().exists());

        let listing = fs::read_to_string(&output).unwrap();
        let mut names: Vec<&str> = listing.lines().collect();
        names.sort_unstable();
        let mut expected = vec![
            "icon_16x16.png",
            "icon_16x16@2x.png",
            "icon_32x32.png",
            "icon_32x32@2x.png",
            "icon_128x128.png",
            "icon_128x128@2x.png",
            "icon_256x256.png",
            "icon_256x256@2x.png",
            "icon_512x512.png",
            "icon_512x512@2x.png",
        ];
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_packager_failure_keeps_iconset_for_inspection() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "echo 'iconutil: boom' >&2\nexit 1");

        let err = generate(&config).unwrap_err();

        assert!(format!("{err:#}").contains("boom"), "{err:#}");
        assert!(!config.output_path().exists());
        let kept = fs::read_dir(config.iconset_dir()).unwrap().count();
        assert_eq!(kept, config.sizes.len());
    }
}
