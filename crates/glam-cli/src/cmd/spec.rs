use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use glam_core::workspace::{self, SpecDoc};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum SpecSubcommand {
    /// List spec files (recursive under ai/specs/)
    List,
    /// Show a spec file
    Show { path: PathBuf },
}

pub fn run(root: &Path, subcmd: SpecSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SpecSubcommand::List => list(root, json),
        SpecSubcommand::Show { path } => show(&path, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let entries = workspace::list_spec_entries(root);

    if json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("No specs yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| vec![e.id.clone(), e.path.display().to_string()])
        .collect();
    print_table(&["ID", "PATH"], rows);
    Ok(())
}

fn show(path: &Path, json: bool) -> anyhow::Result<()> {
    let spec = SpecDoc::load_path(path)
        .with_context(|| format!("spec not found: {}", path.display()))?;

    if json {
        print_json(&spec)?;
        return Ok(());
    }

    if let Some(ref meta) = spec.meta {
        println!("Spec: {}", meta.spec_id);
        if !meta.feature_id.is_empty() {
            println!("Features: {}", meta.feature_id.join(", "));
        }
        println!();
    }
    print!("{}", spec.body);
    Ok(())
}
