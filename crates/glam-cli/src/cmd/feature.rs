use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use glam_core::gherkin::{Document, StepKeyword};
use glam_core::paths;
use glam_core::workspace::FeatureDoc;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum FeatureSubcommand {
    /// Create a new feature file in a feature set
    Create {
        /// Feature set ID
        set: String,
        /// Display name; the file ID is its kebab-case slug
        name: String,
        #[arg(long)]
        background: Option<String>,
    },
    /// Show a feature's frontmatter and scenarios
    Show { set: String, id: String },
    /// Append a scenario to a feature
    AddScenario {
        set: String,
        id: String,
        /// Scenario title (omit for an untitled scenario)
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Append a step to a scenario
    AddStep {
        set: String,
        id: String,
        /// Scenario index (0-based)
        scenario: usize,
        /// given, when, then, and, or but (any case)
        keyword: String,
        text: String,
    },
    /// Move a step within a scenario
    MoveStep {
        set: String,
        id: String,
        scenario: usize,
        from: usize,
        to: usize,
    },
    /// Delete a step from a scenario
    DeleteStep {
        set: String,
        id: String,
        scenario: usize,
        index: usize,
    },
    /// Delete a scenario
    DeleteScenario {
        set: String,
        id: String,
        index: usize,
    },
}

pub fn run(root: &Path, subcmd: FeatureSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        FeatureSubcommand::Create {
            set,
            name,
            background,
        } => create(root, &set, &name, background, json),
        FeatureSubcommand::Show { set, id } => show(root, &set, &id, json),
        FeatureSubcommand::AddScenario { set, id, title } => {
            edit(root, &set, &id, json, |doc| {
                doc.add_scenario(title.clone());
                Ok(())
            })
        }
        FeatureSubcommand::AddStep {
            set,
            id,
            scenario,
            keyword,
            text,
        } => {
            let keyword = StepKeyword::from_str(&keyword)
                .with_context(|| format!("unknown keyword: {keyword}"))?;
            edit(root, &set, &id, json, |doc| {
                doc.add_step(scenario, keyword, text.clone())
            })
        }
        FeatureSubcommand::MoveStep {
            set,
            id,
            scenario,
            from,
            to,
        } => edit(root, &set, &id, json, |doc| doc.move_step(scenario, from, to)),
        FeatureSubcommand::DeleteStep {
            set,
            id,
            scenario,
            index,
        } => edit(root, &set, &id, json, |doc| {
            doc.delete_step(scenario, index).map(|_| ())
        }),
        FeatureSubcommand::DeleteScenario { set, id, index } => {
            edit(root, &set, &id, json, |doc| {
                doc.delete_scenario(index).map(|_| ())
            })
        }
    }
}

fn create(
    root: &Path,
    set: &str,
    name: &str,
    background: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let (id, doc) = FeatureDoc::create(root, set, name, background, Document::new())
        .with_context(|| format!("failed to create feature '{name}' in set '{set}'"))?;

    if json {
        print_json(&serde_json::json!({ "set": set, "id": id, "meta": doc.meta }))?;
    } else {
        println!("Created feature: {}", paths::feature_path(root, set, &id).display());
    }
    Ok(())
}

fn show(root: &Path, set: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let doc = FeatureDoc::load(root, set, id)
        .with_context(|| format!("feature '{id}' not found in set '{set}'"))?;

    if json {
        print_json(&doc)?;
        return Ok(());
    }

    println!("Feature: {}", doc.meta.feature_id);
    if !doc.meta.spec_id.is_empty() {
        println!("Specs:   {}", doc.meta.spec_id.join(", "));
    }
    if let Some(ref bg) = doc.meta.background {
        println!("Background: {bg}");
    }
    println!();
    print!("{}", doc.scenarios.to_text());
    Ok(())
}

/// Load, mutate, save: every editor operation goes through the same
/// parse/serialize round-trip the webview editor used.
fn edit(
    root: &Path,
    set: &str,
    id: &str,
    json: bool,
    op: impl FnOnce(&mut Document) -> glam_core::Result<()>,
) -> anyhow::Result<()> {
    let path = paths::feature_path(root, set, id);
    let mut doc = FeatureDoc::load_path(&path)
        .with_context(|| format!("feature '{id}' not found in set '{set}'"))?;

    op(&mut doc.scenarios).context("edit failed")?;
    doc.save(&path).context("failed to save feature")?;

    if json {
        print_json(&doc)?;
    } else {
        print!("{}", doc.scenarios.to_text());
    }
    Ok(())
}
