use anyhow::{anyhow, bail, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Wraps the external `.iconset` → `.icns` converter (`iconutil` on macOS).
#[derive(Debug, Clone)]
pub struct Packager {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl Packager {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the converter's own, e.g. a script for an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run `<program> -c icns <iconset_dir> -o <output>` and wait for it.
    ///
    /// The converter validates the file names itself; a non-zero exit is
    /// returned as an error carrying its stderr.
    pub fn pack(&self, iconset_dir: &Path, output: &Path) -> Result<()> {
        log::info!(
            "Packing {} into {} with {}",
            iconset_dir.display(),
            output.display(),
            self.program.display()
        );

        let out = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("-c")
            .arg("icns")
            .arg(iconset_dir)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| anyhow!("Failed to run {}: {e}", self.program.display()))?;

        if !out.status.success() {
            bail!(
                "{} failed ({}): {}",
                self.program.display(),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(())
    }
}
