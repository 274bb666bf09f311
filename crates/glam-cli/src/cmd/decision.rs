use crate::output::{print_json, print_table};
use clap::Subcommand;
use glam_core::workspace;
use std::path::Path;

#[derive(Subcommand)]
pub enum DecisionSubcommand {
    /// List decision files
    List,
}

pub fn run(root: &Path, subcmd: DecisionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DecisionSubcommand::List => list(root, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let entries = workspace::list_decisions(root);

    if json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("No decisions yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| vec![e.id.clone(), e.path.display().to_string()])
        .collect();
    print_table(&["ID", "PATH"], rows);
    Ok(())
}
