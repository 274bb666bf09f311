use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DocKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Decision,
    Feature,
    Spec,
    Context,
    Task,
}

impl DocKind {
    pub fn all() -> &'static [DocKind] {
        &[
            DocKind::Decision,
            DocKind::Feature,
            DocKind::Spec,
            DocKind::Context,
            DocKind::Task,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Decision => "decision",
            DocKind::Feature => "feature",
            DocKind::Spec => "spec",
            DocKind::Context => "context",
            DocKind::Task => "task",
        }
    }

    /// Compound file extension, e.g. `auth.decision.md`.
    pub fn extension(self) -> &'static str {
        match self {
            DocKind::Decision => ".decision.md",
            DocKind::Feature => ".feature.md",
            DocKind::Spec => ".spec.md",
            DocKind::Context => ".context.md",
            DocKind::Task => ".task.md",
        }
    }

    /// Folder under the project root holding documents of this kind.
    pub fn dir(self) -> &'static str {
        match self {
            DocKind::Decision => "ai/decisions",
            DocKind::Feature => "ai/features",
            DocKind::Spec => "ai/specs",
            DocKind::Context => "ai/contexts",
            DocKind::Task => "ai/tasks",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocKind {
    type Err = crate::error::GlamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(DocKind::Decision),
            "feature" => Ok(DocKind::Feature),
            "spec" => Ok(DocKind::Spec),
            "context" => Ok(DocKind::Context),
            "task" => Ok(DocKind::Task),
            _ => Err(crate::error::GlamError::UnknownKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DecisionStatus / TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Proposed,
    Accepted,
    Deprecated,
    Superseded,
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Deprecated => "deprecated",
            DecisionStatus::Superseded => "superseded",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Typed frontmatter, one struct per document kind
// ---------------------------------------------------------------------------

/// Hand-authored frontmatter writes ID lists either as a scalar or a
/// sequence; accept both, always serialize as a sequence.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMeta {
    pub decision_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DecisionStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMeta {
    pub feature_id: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub spec_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub context_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl FeatureMeta {
    pub fn new(feature_id: impl Into<String>) -> Self {
        Self {
            feature_id: feature_id.into(),
            spec_id: Vec::new(),
            decision_id: None,
            context_id: Vec::new(),
            background: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecMeta {
    pub spec_id: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub feature_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub context_id: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMeta {
    pub context_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMeta {
    pub task_id: String,
    pub decision_id: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub spec_id: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub feature_id: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub context_id: Vec<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub order: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
