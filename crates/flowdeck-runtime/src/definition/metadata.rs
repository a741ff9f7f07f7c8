//! Descriptive workflow metadata.

use jiff::Timestamp;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Metadata a workspace stores alongside its workflow graph.
///
/// Display name, free-form description, a semver stamp for the saved
/// revision, and edit timestamps. All of it is informational: the resolver
/// and engine never read these fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Display name shown in the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What the workflow does, in the author's words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Revision of the saved workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// When the workflow was first created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// When the workflow was last saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl WorkflowMetadata {
    /// Creates metadata for a freshly created workflow: named, at revision
    /// 1.0.0, with both timestamps set to now.
    pub fn named(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            name: Some(name.into()),
            description: None,
            version: Some(Version::new(1, 0, 0)),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the workflow as saved now.
    pub fn touch(&mut self) {
        self.updated_at = Some(Timestamp::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_metadata() {
        let meta = WorkflowMetadata::named("Chat").with_description("answers questions");
        assert_eq!(meta.name.as_deref(), Some("Chat"));
        assert_eq!(meta.description.as_deref(), Some("answers questions"));
        assert_eq!(meta.version, Some(Version::new(1, 0, 0)));
        assert_eq!(meta.created_at, meta.updated_at);
    }

    #[test]
    fn test_touch_advances_updated_at() {
        let mut meta = WorkflowMetadata::named("Chat");
        let created = meta.created_at.unwrap();
        meta.touch();
        assert!(meta.updated_at.unwrap() >= created);
        assert_eq!(meta.created_at, Some(created));
    }

    #[test]
    fn test_empty_metadata_serializes_empty() {
        let json = serde_json::to_value(WorkflowMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
