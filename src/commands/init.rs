// ABOUTME: Init command implementation.
// ABOUTME: Scaffolds a dockhand.yml manifest in the current directory.

use dockhand::config;
use dockhand::error::Result;
use std::env;

/// Write a starter manifest into the current directory.
pub fn init(name: Option<&str>, image: Option<&str>, force: bool) -> Result<()> {
    let cwd = env::current_dir()?;
    config::init_manifest(&cwd, name, image, force)?;
    println!("  ✓ Wrote {}", config::MANIFEST_FILENAME);
    Ok(())
}
