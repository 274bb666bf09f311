use crate::error::{GlamError, Result};
use crate::frontmatter;
use crate::gherkin::Document;
use crate::io;
use crate::kinds::{ContextMeta, DecisionMeta, DocKind, FeatureMeta, SpecMeta};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub decisions: usize,
    pub feature_sets: usize,
    pub features: usize,
    pub specs: usize,
    pub contexts: usize,
}

/// Count workspace documents. Missing folders count as zero — a project
/// without an `ai/` tree is an empty workspace, not an error.
pub fn counts(root: &Path) -> Counts {
    Counts {
        decisions: count_flat(&root.join(paths::DECISIONS_DIR), DocKind::Decision),
        feature_sets: FeatureSet::list(root).map(|v| v.len()).unwrap_or(0),
        features: count_recursive(&root.join(paths::FEATURES_DIR), DocKind::Feature),
        specs: count_recursive(&root.join(paths::SPECS_DIR), DocKind::Spec),
        contexts: count_flat(&root.join(paths::CONTEXTS_DIR), DocKind::Context),
    }
}

fn count_flat(dir: &Path, kind: DocKind) -> usize {
    list_files_flat(dir, kind).len()
}

fn count_recursive(dir: &Path, kind: DocKind) -> usize {
    let mut files = Vec::new();
    walk_files(dir, kind, &mut files);
    files.len()
}

fn list_files_flat(dir: &Path, kind: DocKind) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| file_has_kind(p, kind))
        .collect();
    out.sort();
    out
}

fn walk_files(dir: &Path, kind: DocKind, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut children: Vec<_> = entries.flatten().collect();
    children.sort_by_key(|e| e.file_name());
    for entry in children {
        let path = entry.path();
        match entry.file_type() {
            Ok(t) if t.is_dir() => walk_files(&path, kind, out),
            Ok(t) if t.is_file() && file_has_kind(&path, kind) => out.push(path),
            _ => {}
        }
    }
}

fn file_has_kind(path: &Path, kind: DocKind) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(kind.extension()))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// FeatureSet
// ---------------------------------------------------------------------------

/// `ai/features/<id>/index.yaml` — a folder of related feature files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSetIndex {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSet {
    pub id: String,
    pub index: FeatureSetIndex,
}

impl FeatureSet {
    /// Create a feature set from a display name; the folder ID is the
    /// kebab-case slug of the name.
    pub fn create(
        root: &Path,
        name: &str,
        description: Option<String>,
        background: Option<String>,
    ) -> Result<Self> {
        let id = paths::slugify(name);
        paths::validate_slug(&id)?;

        let index_path = paths::feature_set_index(root, &id);
        if index_path.exists() {
            return Err(GlamError::FeatureSetExists(id));
        }

        let index = FeatureSetIndex {
            name: name.to_string(),
            description,
            background,
        };
        io::atomic_write(&index_path, serde_yaml::to_string(&index)?.as_bytes())?;
        Ok(Self { id, index })
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let index_path = paths::feature_set_index(root, id);
        if !index_path.exists() {
            return Err(GlamError::FeatureSetNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&index_path)?;
        let index: FeatureSetIndex = serde_yaml::from_str(&data)?;
        Ok(Self {
            id: id.to_string(),
            index,
        })
    }

    /// List feature sets: directories under `ai/features/` that hold an
    /// `index.yaml`. Directories without one are skipped.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let features_dir = root.join(paths::FEATURES_DIR);
        if !features_dir.exists() {
            return Ok(Vec::new());
        }

        let mut sets = Vec::new();
        for entry in std::fs::read_dir(&features_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let id = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &id) {
                    Ok(set) => sets.push(set),
                    Err(GlamError::FeatureSetNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        sets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sets)
    }

    /// IDs of the `*.feature.md` files inside this set's folder.
    pub fn feature_ids(&self, root: &Path) -> Result<Vec<String>> {
        let dir = paths::feature_set_dir(root, &self.id);
        let ids = list_files_flat(&dir, DocKind::Feature)
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(|n| paths::doc_id_from_name(n, DocKind::Feature))
            .map(str::to_string)
            .collect();
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// FeatureDoc
// ---------------------------------------------------------------------------

/// A `*.feature.md` file: typed frontmatter plus a scenario document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDoc {
    pub meta: FeatureMeta,
    pub scenarios: Document,
}

impl FeatureDoc {
    pub fn create(
        root: &Path,
        set_id: &str,
        name: &str,
        background: Option<String>,
        scenarios: Document,
    ) -> Result<(String, Self)> {
        // The set must exist first; creating features into a bare folder
        // would leave them invisible to the set listing.
        FeatureSet::load(root, set_id)?;

        let id = paths::slugify(name);
        paths::validate_slug(&id)?;

        let path = paths::feature_path(root, set_id, &id);
        if path.exists() {
            return Err(GlamError::FeatureExists(id));
        }

        let mut meta = FeatureMeta::new(&id);
        meta.background = background;
        let doc = Self { meta, scenarios };
        doc.save(&path)?;
        Ok((id, doc))
    }

    pub fn load(root: &Path, set_id: &str, feature_id: &str) -> Result<Self> {
        let path = paths::feature_path(root, set_id, feature_id);
        Self::load_path(&path)
    }

    pub fn load_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GlamError::DocumentNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let (meta, body) = frontmatter::parse_typed::<FeatureMeta>(&text)?;
        let meta = meta.ok_or_else(|| GlamError::MissingFrontmatter(path.display().to_string()))?;
        Ok(Self {
            meta,
            scenarios: Document::parse(&body),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = frontmatter::compose(&self.meta, &self.scenarios.to_text())?;
        io::atomic_write(path, text.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// SpecDoc
// ---------------------------------------------------------------------------

/// A `*.spec.md` file: typed frontmatter plus a free markdown body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDoc {
    pub meta: Option<SpecMeta>,
    pub body: String,
}

impl SpecDoc {
    pub fn load_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GlamError::DocumentNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let (meta, body) = frontmatter::parse_typed::<SpecMeta>(&text)?;
        Ok(Self { meta, body })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = match &self.meta {
            Some(meta) => frontmatter::compose(meta, &self.body)?,
            None => self.body.clone(),
        };
        io::atomic_write(path, text.as_bytes())
    }

    /// Recursive listing of spec files under `ai/specs/`, sorted by path.
    pub fn list(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        walk_files(&root.join(paths::SPECS_DIR), DocKind::Spec, &mut out);
        out
    }
}

// ---------------------------------------------------------------------------
// Flat document listings (decisions, contexts)
// ---------------------------------------------------------------------------

/// A listed workspace document: its path plus the ID taken from frontmatter
/// when present, falling back to the file name.
#[derive(Debug, Clone, Serialize)]
pub struct DocEntry {
    pub id: String,
    pub path: PathBuf,
}

pub fn list_decisions(root: &Path) -> Vec<DocEntry> {
    list_entries(root, DocKind::Decision, |text| {
        frontmatter::parse_typed::<DecisionMeta>(text)
            .ok()
            .and_then(|(m, _)| m)
            .map(|m| m.decision_id)
    })
}

pub fn list_contexts(root: &Path) -> Vec<DocEntry> {
    list_entries(root, DocKind::Context, |text| {
        frontmatter::parse_typed::<ContextMeta>(text)
            .ok()
            .and_then(|(m, _)| m)
            .map(|m| m.context_id)
    })
}

/// Spec entries, recursive, with IDs from frontmatter where available.
pub fn list_spec_entries(root: &Path) -> Vec<DocEntry> {
    SpecDoc::list(root)
        .into_iter()
        .map(|path| {
            let id = std::fs::read_to_string(&path)
                .ok()
                .and_then(|text| {
                    frontmatter::parse_typed::<SpecMeta>(&text)
                        .ok()
                        .and_then(|(m, _)| m)
                        .map(|m| m.spec_id)
                })
                .unwrap_or_else(|| fallback_id(&path, DocKind::Spec));
            DocEntry { id, path }
        })
        .collect()
}

/// Feature entries across all sets, recursive.
pub fn list_feature_entries(root: &Path) -> Vec<DocEntry> {
    let mut files = Vec::new();
    walk_files(&root.join(paths::FEATURES_DIR), DocKind::Feature, &mut files);
    files
        .into_iter()
        .map(|path| {
            let id = std::fs::read_to_string(&path)
                .ok()
                .and_then(|text| {
                    frontmatter::parse_typed::<FeatureMeta>(&text)
                        .ok()
                        .and_then(|(m, _)| m)
                        .map(|m| m.feature_id)
                })
                .unwrap_or_else(|| fallback_id(&path, DocKind::Feature));
            DocEntry { id, path }
        })
        .collect()
}

fn list_entries(
    root: &Path,
    kind: DocKind,
    id_from_text: impl Fn(&str) -> Option<String>,
) -> Vec<DocEntry> {
    list_files_flat(&root.join(kind.dir()), kind)
        .into_iter()
        .map(|path| {
            // Malformed frontmatter degrades to the filename ID; listings are
            // best-effort over hand-authored files.
            let id = std::fs::read_to_string(&path)
                .ok()
                .and_then(|text| id_from_text(&text))
                .unwrap_or_else(|| fallback_id(&path, kind));
            DocEntry { id, path }
        })
        .collect()
}

fn fallback_id(path: &Path, kind: DocKind) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| paths::doc_id_from_name(n, kind))
        .unwrap_or("unknown")
        .to_string()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Directories created by `glam init`.
pub fn scaffold_dirs() -> &'static [&'static str] {
    &[
        paths::AI_DIR,
        paths::DECISIONS_DIR,
        paths::FEATURES_DIR,
        paths::SPECS_DIR,
        paths::CONTEXTS_DIR,
        paths::TASKS_DIR,
        paths::DOCS_DIR,
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
