mod config;
mod core;
mod icon;
mod iconset;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Artifacts land next to wherever the generator is run from.
    let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = config::GeneratorConfig::new(base_dir);

    core::generate(&config)?;
    Ok(())
}
