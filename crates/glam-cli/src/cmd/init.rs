use anyhow::Context;
use glam_core::{io, workspace};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing glam workspace in: {}", root.display());

    for dir in workspace::scaffold_dirs() {
        let p = root.join(dir);
        if p.is_dir() {
            println!("  exists:  {dir}");
        } else {
            io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
            println!("  created: {dir}");
        }
    }

    println!("\nNext: glam featureset create <name>");
    Ok(())
}
