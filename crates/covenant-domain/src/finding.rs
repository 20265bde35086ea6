//! Language-model findings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the model reported for one canonical target
///
/// All fields are empty strings when the model found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmFinding {
    /// Best matching section or subsection title
    #[serde(default)]
    pub title: String,
    /// Short excerpt around the section start
    #[serde(default)]
    pub excerpt: String,
    /// Why the model picked this section
    #[serde(default)]
    pub rationale: String,
}

impl LlmFinding {
    /// True when the model reported neither a title nor an excerpt
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.excerpt.trim().is_empty()
    }
}

/// Findings keyed by canonical target
pub type SemanticFindings = BTreeMap<String, LlmFinding>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(LlmFinding::default().is_empty());
    }

    #[test]
    fn test_rationale_alone_is_empty() {
        let finding = LlmFinding {
            rationale: "nothing matched".to_string(),
            ..Default::default()
        };
        assert!(finding.is_empty());
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let finding: LlmFinding = serde_json::from_str(r#"{"title": "Liens"}"#).unwrap();
        assert_eq!(finding.title, "Liens");
        assert_eq!(finding.excerpt, "");
        assert!(!finding.is_empty());
    }
}
