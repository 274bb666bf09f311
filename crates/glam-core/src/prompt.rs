use crate::error::{GlamError, Result};
use crate::frontmatter;
use crate::kinds::DecisionMeta;
use crate::paths;
use crate::workspace;
use chrono::{NaiveDate, Utc};
use std::fmt::Write as _;
use std::path::Path;

// ---------------------------------------------------------------------------
// New decision
// ---------------------------------------------------------------------------

/// Answers gathered from the user before drafting a decision document.
#[derive(Debug, Clone)]
pub struct NewDecisionInput {
    pub what_is_changing: String,
    pub why_is_it_changing: String,
    pub proposed_change: String,
    pub options_considered: String,
}

pub fn new_decision(input: &NewDecisionInput) -> String {
    new_decision_on(input, Utc::now().date_naive())
}

/// Date injected for testability; [`new_decision`] stamps today.
pub fn new_decision_on(input: &NewDecisionInput, date: NaiveDate) -> String {
    let decision_id = paths::slugify(&input.proposed_change);
    let date = date.format("%Y-%m-%d");

    format!(
        "STEP 1: First, call the get_glam_schema tool with schema_type \"decision\" to \
         retrieve the proper decision file format.\n\
         \n\
         STEP 2: Once you have the schema, create a new decision document in the \
         ai/decisions folder with the following details:\n\
         \n\
         **Decision ID**: {decision_id}\n\
         **Filename**: ai/decisions/{decision_id}.decision.md\n\
         **Date**: {date}\n\
         \n\
         **What is changing:**\n{what}\n\
         \n\
         **Why is it changing:**\n{why}\n\
         \n\
         **Proposed change summary:**\n{change}\n\
         \n\
         **Options considered:**\n{options}\n\
         \n\
         STEP 3: Create the decision document adhering to the schema you retrieved. \
         The document should follow the Architecture Decision Record (ADR) format with \
         these key elements:\n\
         \n\
         - Proper frontmatter with decision_id: {decision_id}\n\
         - Status section (set to \"proposed\")\n\
         - Context section explaining why this change is needed\n\
         - Decision section describing the proposed change\n\
         - Alternatives Considered section\n\
         - Consequences section (analyze positive and negative impacts)\n\
         - References section for any relevant links or documentation\n\
         \n\
         Ensure the ai/decisions folder exists (create it if needed), use proper \
         markdown formatting, and ensure the frontmatter is valid YAML as specified in \
         the schema.",
        what = input.what_is_changing,
        why = input.why_is_it_changing,
        change = input.proposed_change,
        options = input.options_considered,
    )
}

// ---------------------------------------------------------------------------
// Distill decision into features and specs
// ---------------------------------------------------------------------------

pub fn distill_decision(root: &Path, decision_path: &Path) -> Result<String> {
    let (decision_id, content) = read_decision(decision_path)?;

    let contexts = workspace::list_contexts(root);
    let features = workspace::list_feature_entries(root);
    let specs = workspace::list_spec_entries(root);

    let mut prompt = format!(
        "STEP 1: Retrieve the required schemas by calling:\n\
         - get_glam_schema with schema_type \"feature\"\n\
         - get_glam_schema with schema_type \"spec\"\n\
         \n\
         STEP 2: Review and distill the following decision into features and specs:\n\
         \n\
         **Decision File**: {}\n\
         **Decision ID**: {decision_id}\n\
         \n\
         **Decision Content**:\n```markdown\n{content}\n```\n\n",
        decision_path.display(),
    );

    push_id_section(&mut prompt, "Available Context Files", &contexts);
    push_id_section(&mut prompt, "Existing Features", &features);
    push_id_section(&mut prompt, "Existing Specs", &specs);

    prompt.push_str(
        "STEP 3: Analyze this decision and ensure that:\n\
         \n\
         1. **Features** in ai/features/ fully capture the user-facing functionality \
         described in this decision\n\
         \x20  - Each feature MUST follow the feature schema you retrieved (Gherkin \
         format with GIVEN/WHEN/THEN scenarios)\n\
         \x20  - Features should reference relevant spec_ids in their frontmatter\n\
         \x20  - Create new feature files if needed or update existing ones to reflect \
         the new desired state\n\
         \n\
         2. **Specs** in ai/specs/ provide the technical specifications for \
         implementing these features\n\
         \x20  - Specs MUST follow the spec schema you retrieved\n\
         \x20  - Include technical details, architecture decisions, and Mermaid \
         diagrams where appropriate\n\
         \x20  - Specs should reference relevant feature_ids in their frontmatter\n\
         \x20  - Create new spec files if needed or update existing ones to reflect \
         the new desired state\n\
         \n\
         STEP 4: Review the decision and determine what features and specs need to be \
         created or updated. Ensure:\n\
         - Complete coverage of the decision's requirements\n\
         - Proper relationships between features and specs (bidirectional references)\n\
         - All files adhere to the schemas retrieved in Step 1\n\
         - Consider available context files and reference them appropriately using \
         context_id fields\n\
         \n\
         The goal is to update the features and specs to represent the NEW DESIRED \
         STATE after this decision is implemented, not just the changes.",
    );

    Ok(prompt)
}

// ---------------------------------------------------------------------------
// Convert decision to tasks
// ---------------------------------------------------------------------------

pub fn convert_to_tasks(root: &Path, decision_path: &Path) -> Result<String> {
    let (decision_id, _) = read_decision(decision_path)?;

    let features = workspace::list_feature_entries(root);
    let specs = workspace::list_spec_entries(root);
    let contexts = workspace::list_contexts(root);

    let mut prompt = format!(
        "STEP 1: Get the task schema by calling get_glam_schema with schema_type \"task\"\n\
         \n\
         STEP 2: Review the decision, features, and specs to understand what needs to \
         be implemented:\n\
         \n\
         **Decision File**: {}\n\
         **Decision ID**: {decision_id}\n\n",
        decision_path.display(),
    );

    // Context ids referenced from feature/spec frontmatter drive STEP 3.
    let mut context_ids: Vec<String> = Vec::new();

    if !features.is_empty() {
        prompt.push_str("\n**Related Features**:\n");
        for entry in &features {
            if let Ok(text) = std::fs::read_to_string(&entry.path) {
                collect_context_ids(&text, &mut context_ids);
                let _ = write!(
                    prompt,
                    "\n### Feature: {}\n```markdown\n{text}\n```\n",
                    entry.id
                );
            }
        }
    }

    if !specs.is_empty() {
        prompt.push_str("\n**Related Specs**:\n");
        for entry in &specs {
            if let Ok(text) = std::fs::read_to_string(&entry.path) {
                collect_context_ids(&text, &mut context_ids);
                let _ = write!(
                    prompt,
                    "\n### Spec: {}\n```markdown\n{text}\n```\n",
                    entry.id
                );
            }
        }
    }

    if !contexts.is_empty() {
        prompt.push_str("\n**Related Contexts**:\n");
        for entry in &contexts {
            if let Ok(text) = std::fs::read_to_string(&entry.path) {
                let _ = write!(
                    prompt,
                    "\n### Context: {}\n```markdown\n{text}\n```\n",
                    entry.id
                );
            }
        }
    }

    prompt.push_str("\n\nSTEP 3: Follow context file instructions");
    if context_ids.is_empty() {
        prompt.push_str(
            "\n\nNo specific context files are referenced by the features and specs. \
             Proceed to identify technical objects that need research.",
        );
    } else {
        prompt.push_str("\n\nThe features and specs reference the following context files:\n");
        for id in &context_ids {
            let _ = writeln!(prompt, "- {id}");
        }
        prompt.push_str(
            "\nRead and follow the GIVEN/WHEN/THEN rules in each context file above. \
             These rules tell you:\n\
             - What documentation to read\n\
             - What tools to use\n\
             - What research to perform\n\
             \n\
             Execute all applicable context rules before proceeding to the next step.",
        );
    }

    let _ = write!(
        prompt,
        "\n\nSTEP 4: Identify and research technical objects\n\
         \n\
         Based on the decision, features, and specs above, identify all technical \
         objects, frameworks, or systems that will be created, modified, integrated \
         with, or configured.\n\
         \n\
         For EACH technical object you identify, call get_glam_context with the \
         spec_object parameter to generate a research prompt. Then execute that \
         research prompt to gather the information needed to create accurate, detailed \
         task instructions.\n\
         \n\
         STEP 5: Identify or create a folder for this decision's tasks in the \
         ai/tasks/ folder\n\
         - The folder name should be the decision_id\n\
         \n\
         STEP 6: Create implementation tasks\n\
         \n\
         Create specific, actionable tasks in the ai/tasks/{decision_id} folder that \
         will implement this decision.\n\
         \n\
         Each task MUST:\n\
         1. Follow the task schema exactly (from Step 1)\n\
         2. Be specific and implementable with clear technical details\n\
         3. Include the decision_id: {decision_id}\n\
         4. Reference all related feature_ids and spec_ids\n\
         5. Reference all applicable context_ids\n\
         6. Have status: pending and an appropriate order number\n\
         7. Include COMPLETE context - assume the implementer knows the general \
         technology but needs specific implementation details\n\
         8. Provide step-by-step implementation instructions\n\
         9. List files that will be affected (created, modified, deleted)\n\
         10. Have clear, testable acceptance criteria\n\
         \n\
         The tasks you create are prompts that will be fed to an AI agent for \
         implementation. They must be comprehensive, accurate, and actionable."
    );

    Ok(prompt)
}

// ---------------------------------------------------------------------------
// Research prompt for a technical object
// ---------------------------------------------------------------------------

pub fn research(spec_object: &str) -> String {
    let context_slug = paths::slugify(spec_object);
    format!(
        "# Research Prompt for: {spec_object}\n\
         \n\
         You need to research and understand \"{spec_object}\" to properly implement \
         or work with it in the current project context.\n\
         \n\
         ## Research Instructions\n\
         \n\
         ### 1. Check Project Documentation\n\
         Search the project's ai/docs/ directory for any existing documentation about \
         \"{spec_object}\".\n\
         \n\
         ### 2. Search Codebase\n\
         Find existing implementations or references and review current usage patterns.\n\
         \n\
         ### 3. External Research (if needed)\n\
         Search for official documentation, best practices, implementation examples, \
         and version-specific considerations.\n\
         \n\
         ### 4. Synthesize Findings\n\
         Summarize: definition, purpose, how it should be implemented in this project, \
         best practices, common pitfalls, and dependencies.\n\
         \n\
         ### 5. Create Context (if needed)\n\
         If this is a recurring concept, consider creating a context file at:\n\
         ai/contexts/{context_slug}-guidance.context.md\n\
         \n\
         This context file should follow the context schema and provide \
         GIVEN/WHEN/THEN rules for when and how to use this information in future work."
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_decision(decision_path: &Path) -> Result<(String, String)> {
    if !decision_path.exists() {
        return Err(GlamError::DocumentNotFound(
            decision_path.display().to_string(),
        ));
    }
    let content = std::fs::read_to_string(decision_path)?;
    // Fall back to the filename when the frontmatter lacks a decision_id.
    let id = frontmatter::parse_typed::<DecisionMeta>(&content)
        .ok()
        .and_then(|(m, _)| m)
        .map(|m| m.decision_id)
        .or_else(|| {
            decision_path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| {
                    paths::doc_id_from_name(n, crate::kinds::DocKind::Decision)
                        .map(str::to_string)
                })
        })
        .unwrap_or_else(|| "unknown-decision".to_string());
    Ok((id, content))
}

fn push_id_section(prompt: &mut String, heading: &str, entries: &[workspace::DocEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(prompt, "**{heading}**:");
    for entry in entries {
        let _ = writeln!(prompt, "- {}", entry.id);
    }
    prompt.push('\n');
}

fn collect_context_ids(text: &str, out: &mut Vec<String>) {
    #[derive(serde::Deserialize)]
    struct ContextRefs {
        #[serde(default)]
        context_id: serde_yaml::Value,
    }

    let Ok((Some(refs), _)) = frontmatter::parse_typed::<ContextRefs>(text) else {
        return;
    };
    let ids: Vec<String> = match refs.context_id {
        serde_yaml::Value::String(s) => vec![s],
        serde_yaml::Value::Sequence(seq) => seq
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input() -> NewDecisionInput {
        NewDecisionInput {
            what_is_changing: "The login flow".to_string(),
            why_is_it_changing: "Passwords alone are weak".to_string(),
            proposed_change: "Add Email Verification".to_string(),
            options_considered: "TOTP, magic links".to_string(),
        }
    }

    #[test]
    fn new_decision_derives_id_and_stamps_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let prompt = new_decision_on(&input(), date);
        assert!(prompt.contains("**Decision ID**: add-email-verification"));
        assert!(prompt.contains("ai/decisions/add-email-verification.decision.md"));
        assert!(prompt.contains("**Date**: 2026-08-26"));
        assert!(prompt.contains("get_glam_schema"));
    }

    #[test]
    fn distill_embeds_decision_and_existing_ids() {
        let dir = TempDir::new().unwrap();
        for d in workspace::scaffold_dirs() {
            std::fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        let decision = dir.path().join("ai/decisions/add-auth.decision.md");
        std::fs::write(&decision, "---\ndecision_id: add-auth\n---\n# Add auth\n").unwrap();
        std::fs::write(
            dir.path().join("ai/contexts/aws.context.md"),
            "---\ncontext_id: aws\n---\nGIVEN x\n",
        )
        .unwrap();

        let prompt = distill_decision(dir.path(), &decision).unwrap();
        assert!(prompt.contains("**Decision ID**: add-auth"));
        assert!(prompt.contains("# Add auth"));
        assert!(prompt.contains("**Available Context Files**:"));
        assert!(prompt.contains("- aws"));
        // No features yet, so the section is omitted entirely.
        assert!(!prompt.contains("**Existing Features**:"));
    }

    #[test]
    fn distill_missing_decision_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("ai/decisions/none.decision.md");
        assert!(matches!(
            distill_decision(dir.path(), &missing),
            Err(GlamError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn convert_to_tasks_collects_context_ids() {
        let dir = TempDir::new().unwrap();
        for d in workspace::scaffold_dirs() {
            std::fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        let decision = dir.path().join("ai/decisions/add-auth.decision.md");
        std::fs::write(&decision, "---\ndecision_id: add-auth\n---\nbody\n").unwrap();

        std::fs::create_dir_all(dir.path().join("ai/features/auth")).unwrap();
        std::fs::write(
            dir.path().join("ai/features/auth/index.yaml"),
            "name: Auth\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("ai/features/auth/login.feature.md"),
            "---\nfeature_id: login\ncontext_id: aws\n---\nGIVEN a user\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("ai/specs/db.spec.md"),
            "---\nspec_id: db\ncontext_id: [aws, postgres]\n---\nbody\n",
        )
        .unwrap();

        let prompt = convert_to_tasks(dir.path(), &decision).unwrap();
        assert!(prompt.contains("### Feature: login"));
        assert!(prompt.contains("### Spec: db"));
        assert!(prompt.contains("- aws\n"));
        assert!(prompt.contains("- postgres\n"));
        assert!(prompt.contains("ai/tasks/add-auth"));
        // aws referenced twice, listed once
        assert_eq!(prompt.matches("- aws\n").count(), 1);
    }

    #[test]
    fn convert_to_tasks_without_contexts_says_so() {
        let dir = TempDir::new().unwrap();
        for d in workspace::scaffold_dirs() {
            std::fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        let decision = dir.path().join("ai/decisions/d.decision.md");
        std::fs::write(&decision, "---\ndecision_id: d\n---\nbody\n").unwrap();

        let prompt = convert_to_tasks(dir.path(), &decision).unwrap();
        assert!(prompt.contains("No specific context files are referenced"));
    }

    #[test]
    fn research_prompt_suggests_context_file() {
        let prompt = research("AWS CDK Stack");
        assert!(prompt.contains("# Research Prompt for: AWS CDK Stack"));
        assert!(prompt.contains("ai/contexts/aws-cdk-stack-guidance.context.md"));
    }

    #[test]
    fn decision_id_falls_back_to_filename() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("ai/decisions")).unwrap();
        let decision = dir.path().join("ai/decisions/from-name.decision.md");
        std::fs::write(&decision, "no frontmatter at all\n").unwrap();

        let (id, _) = read_decision(&decision).unwrap();
        assert_eq!(id, "from-name");
    }
}
