use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use glam_core::workspace::FeatureSet;
use std::path::Path;

#[derive(Subcommand)]
pub enum FeatureSetSubcommand {
    /// Create a new feature set folder with an index.yaml
    Create {
        /// Display name; the folder ID is its kebab-case slug
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Shared Gherkin background for features in this set
        #[arg(long)]
        background: Option<String>,
    },
    /// List feature sets
    List,
    /// Show a feature set and the features it contains
    Show { id: String },
}

pub fn run(root: &Path, subcmd: FeatureSetSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        FeatureSetSubcommand::Create {
            name,
            description,
            background,
        } => create(root, &name, description, background, json),
        FeatureSetSubcommand::List => list(root, json),
        FeatureSetSubcommand::Show { id } => show(root, &id, json),
    }
}

fn create(
    root: &Path,
    name: &str,
    description: Option<String>,
    background: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let set = FeatureSet::create(root, name, description, background)
        .with_context(|| format!("failed to create feature set '{name}'"))?;

    if json {
        print_json(&set)?;
    } else {
        println!("Created feature set: {} — {}", set.id, set.index.name);
        println!("Next: glam feature create {} <name>", set.id);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let sets = FeatureSet::list(root).context("failed to list feature sets")?;

    if json {
        print_json(&sets)?;
        return Ok(());
    }

    if sets.is_empty() {
        println!("No feature sets yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = sets
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.index.name.clone(),
                s.index.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "DESCRIPTION"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let set = FeatureSet::load(root, id).with_context(|| format!("feature set '{id}' not found"))?;
    let features = set.feature_ids(root)?;

    if json {
        print_json(&serde_json::json!({
            "id": set.id,
            "index": set.index,
            "features": features,
        }))?;
        return Ok(());
    }

    println!("Feature set: {} — {}", set.id, set.index.name);
    if let Some(ref desc) = set.index.description {
        println!("Desc:        {desc}");
    }
    if let Some(ref bg) = set.index.background {
        println!("Background:  {bg}");
    }
    if features.is_empty() {
        println!("\nNo features yet.");
    } else {
        println!("\nFeatures ({}):", features.len());
        for f in &features {
            println!("  {f}");
        }
    }
    Ok(())
}
