use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlamError {
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    #[error("invalid step keyword: {0}")]
    InvalidKeyword(String),

    #[error("feature set not found: {0}")]
    FeatureSetNotFound(String),

    #[error("feature set already exists: {0}")]
    FeatureSetExists(String),

    #[error("feature already exists: {0}")]
    FeatureExists(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("missing frontmatter in {0}")]
    MissingFrontmatter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GlamError>;
