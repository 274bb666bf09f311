use anyhow::Context;
use clap::Subcommand;
use glam_core::prompt::{self, NewDecisionInput};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum PromptSubcommand {
    /// Prompt to draft a new decision document
    NewDecision {
        /// What is changing
        #[arg(long)]
        what: String,
        /// Why is it changing
        #[arg(long)]
        why: String,
        /// Proposed change summary (also seeds the decision ID)
        #[arg(long)]
        change: String,
        /// Options considered
        #[arg(long)]
        options: String,
    },
    /// Prompt to distill a decision into features and specs
    Distill {
        /// Path to the *.decision.md file
        decision: PathBuf,
    },
    /// Prompt to convert a decision into ordered implementation tasks
    Tasks {
        /// Path to the *.decision.md file
        decision: PathBuf,
    },
    /// Research prompt for a technical object
    Research {
        /// e.g. "AWS CDK Stack", "PostgreSQL indexes"
        object: String,
    },
}

pub fn run(root: &Path, subcmd: PromptSubcommand) -> anyhow::Result<()> {
    let text = match subcmd {
        PromptSubcommand::NewDecision {
            what,
            why,
            change,
            options,
        } => prompt::new_decision(&NewDecisionInput {
            what_is_changing: what,
            why_is_it_changing: why,
            proposed_change: change,
            options_considered: options,
        }),
        PromptSubcommand::Distill { decision } => prompt::distill_decision(root, &decision)
            .with_context(|| format!("failed to read decision {}", decision.display()))?,
        PromptSubcommand::Tasks { decision } => prompt::convert_to_tasks(root, &decision)
            .with_context(|| format!("failed to read decision {}", decision.display()))?,
        PromptSubcommand::Research { object } => prompt::research(&object),
    };

    println!("{text}");
    Ok(())
}
