use anyhow::Context;
use glam_core::kinds::DocKind;
use glam_core::schema::schema_text;
use std::str::FromStr;

pub fn run(kind: &str) -> anyhow::Result<()> {
    let kind = DocKind::from_str(kind)
        .context("expected one of: decision, feature, spec, context, task")?;
    println!("{}", schema_text(kind));
    Ok(())
}
