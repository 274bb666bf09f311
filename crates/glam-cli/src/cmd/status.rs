use crate::output::{print_json, print_table};
use glam_core::workspace;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let counts = workspace::counts(root);

    if json {
        print_json(&counts)?;
        return Ok(());
    }

    print_table(
        &["KIND", "COUNT"],
        vec![
            vec!["decisions".to_string(), counts.decisions.to_string()],
            vec!["feature sets".to_string(), counts.feature_sets.to_string()],
            vec!["features".to_string(), counts.features.to_string()],
            vec!["specs".to_string(), counts.specs.to_string()],
            vec!["contexts".to_string(), counts.contexts.to_string()],
        ],
    );
    Ok(())
}
