use crate::error::{GlamError, Result};
use crate::kinds::DocKind;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const AI_DIR: &str = "ai";
pub const DECISIONS_DIR: &str = "ai/decisions";
pub const FEATURES_DIR: &str = "ai/features";
pub const SPECS_DIR: &str = "ai/specs";
pub const CONTEXTS_DIR: &str = "ai/contexts";
pub const TASKS_DIR: &str = "ai/tasks";
pub const DOCS_DIR: &str = "ai/docs";

pub const FEATURE_SET_INDEX: &str = "index.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn kind_dir(root: &Path, kind: DocKind) -> PathBuf {
    root.join(kind.dir())
}

pub fn decision_path(root: &Path, id: &str) -> PathBuf {
    root.join(DECISIONS_DIR)
        .join(format!("{id}{}", DocKind::Decision.extension()))
}

pub fn feature_set_dir(root: &Path, set_id: &str) -> PathBuf {
    root.join(FEATURES_DIR).join(set_id)
}

pub fn feature_set_index(root: &Path, set_id: &str) -> PathBuf {
    feature_set_dir(root, set_id).join(FEATURE_SET_INDEX)
}

pub fn feature_path(root: &Path, set_id: &str, feature_id: &str) -> PathBuf {
    feature_set_dir(root, set_id).join(format!("{feature_id}{}", DocKind::Feature.extension()))
}

pub fn context_path(root: &Path, id: &str) -> PathBuf {
    root.join(CONTEXTS_DIR)
        .join(format!("{id}{}", DocKind::Context.extension()))
}

pub fn tasks_dir(root: &Path, decision_id: &str) -> PathBuf {
    root.join(TASKS_DIR).join(decision_id)
}

/// Strip a kind's compound extension from a file name, e.g.
/// `auth.feature.md` -> `auth`. Returns `None` if the extension doesn't match.
pub fn doc_id_from_name(name: &str, kind: DocKind) -> Option<&str> {
    name.strip_suffix(kind.extension())
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(GlamError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Derive a kebab-case ID from free text, capped at 50 characters (the
/// decision-ID convention). Non-alphanumeric runs collapse to single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    // Slug is pure ASCII, so the byte cap is a char cap.
    slug.truncate(50);
    slug.trim_end_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["auth-login", "a", "my-feature-123", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in [
            "",
            "-starts-with-dash",
            "ends-with-dash-",
            "has spaces",
            "UPPER",
            "a_b",
        ] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn slugify_collapses_and_caps() {
        assert_eq!(slugify("Add User Authentication!"), "add-user-authentication");
        assert_eq!(slugify("  multiple   spaces -- and_punct  "), "multiple-spaces-and-punct");
        let long = slugify(&"word ".repeat(30));
        assert!(long.len() <= 50);
        validate_slug(&long).unwrap();
    }

    #[test]
    fn slugify_output_is_valid_slug() {
        for text in ["Email Verification", "CDK: deploy (v2)", "a"] {
            validate_slug(&slugify(text)).unwrap();
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            decision_path(root, "add-auth"),
            PathBuf::from("/tmp/proj/ai/decisions/add-auth.decision.md")
        );
        assert_eq!(
            feature_path(root, "auth", "login"),
            PathBuf::from("/tmp/proj/ai/features/auth/login.feature.md")
        );
        assert_eq!(
            feature_set_index(root, "auth"),
            PathBuf::from("/tmp/proj/ai/features/auth/index.yaml")
        );
    }

    #[test]
    fn doc_id_strips_extension() {
        assert_eq!(doc_id_from_name("login.feature.md", DocKind::Feature), Some("login"));
        assert_eq!(doc_id_from_name("login.spec.md", DocKind::Feature), None);
    }
}
