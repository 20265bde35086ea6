//! LLM prompt engineering for covenant lookup

use crate::error::ExtractorError;
use covenant_domain::{ChatPrompt, TargetVocabulary};
use serde::Serialize;
use std::collections::BTreeMap;

/// Builds chat prompts asking the model to locate covenant sections
pub struct PromptBuilder<'a> {
    text: &'a str,
    targets: &'a [String],
    text_cap_chars: usize,
    descriptions: BTreeMap<&'a str, &'a str>,
}

#[derive(Serialize)]
struct UserPayload<'a> {
    instruction: &'static str,
    targets: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    descriptions: Option<&'a BTreeMap<&'a str, &'a str>>,
    requirements: &'static [&'static str],
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for canonical `targets`
    pub fn new(text: &'a str, targets: &'a [String], text_cap_chars: usize) -> Self {
        Self {
            text,
            targets,
            text_cap_chars,
            descriptions: BTreeMap::new(),
        }
    }

    /// Describe each target that has a vocabulary description
    pub fn with_descriptions(mut self, vocabulary: &'a TargetVocabulary) -> Self {
        self.descriptions = self
            .targets
            .iter()
            .filter_map(|t| vocabulary.get(t))
            .filter(|entry| !entry.description.is_empty())
            .map(|entry| (entry.canonical.as_str(), entry.description.as_str()))
            .collect();
        self
    }

    /// Text actually sent, cut to the character cap
    pub fn capped_text(&self) -> &'a str {
        truncate_chars(self.text, self.text_cap_chars)
    }

    /// Build the system and user messages
    pub fn build(&self) -> Result<ChatPrompt, ExtractorError> {
        let payload = UserPayload {
            instruction: PAYLOAD_INSTRUCTION,
            targets: self.targets,
            descriptions: (!self.descriptions.is_empty()).then_some(&self.descriptions),
            requirements: REQUIREMENTS,
            text: self.capped_text(),
        };
        let user = format!("{}\n\n{}", OUTPUT_FORMAT_REMINDER, serde_json::to_string(&payload)?);
        Ok(ChatPrompt::new(SYSTEM_INSTRUCTIONS, user))
    }
}

/// Longest prefix of `text` with at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map(|(end, _)| &text[..end])
        .unwrap_or(text)
}

const SYSTEM_INSTRUCTIONS: &str = "You are a legal AI that extracts covenant sections from agreements. \
Identify the best matching section title and an excerpt for each target. \
Return strict JSON with keys for each target (canonical, lowercase).";

const PAYLOAD_INSTRUCTION: &str = "Find these targets (canonical, lowercase):";

const REQUIREMENTS: &[&str] = &[
    "If not found, set title='' and excerpt=''",
    "Prefer section or subsection titles",
    "Return concise 3-6 sentence excerpt around the section start",
    "Give a one-sentence rationale for each choice",
];

const OUTPUT_FORMAT_REMINDER: &str =
    "Extract and return JSON only. Format: {target: {title, excerpt, rationale}}";

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<String> {
        vec!["restricted payments".to_string(), "change of control".to_string()]
    }

    #[test]
    fn test_prompt_includes_targets_and_text() {
        let targets = targets();
        let prompt = PromptBuilder::new("Section 4.1 Restricted Payments", &targets, 100_000)
            .build()
            .unwrap();

        assert!(prompt.system.contains("covenant sections"));
        assert!(prompt.user.starts_with("Extract and return JSON only."));

        let json_part = &prompt.user[prompt.user.find("\n\n").unwrap() + 2..];
        let payload: serde_json::Value = serde_json::from_str(json_part).unwrap();
        assert_eq!(payload["targets"][0], "restricted payments");
        assert_eq!(payload["targets"][1], "change of control");
        assert_eq!(payload["text"], "Section 4.1 Restricted Payments");
        assert_eq!(payload["requirements"].as_array().unwrap().len(), REQUIREMENTS.len());
        assert!(payload.get("descriptions").is_none());
    }

    #[test]
    fn test_text_is_capped_in_chars() {
        let targets = targets();
        let text = "é".repeat(50);
        let builder = PromptBuilder::new(&text, &targets, 10);
        assert_eq!(builder.capped_text().chars().count(), 10);

        let short = PromptBuilder::new("short", &targets, 10);
        assert_eq!(short.capped_text(), "short");
    }

    #[test]
    fn test_descriptions_from_vocabulary() {
        let vocab = TargetVocabulary::builtin();
        let targets = vec!["liens".to_string(), "unknown thing".to_string()];
        let prompt = PromptBuilder::new("text", &targets, 100)
            .with_descriptions(&vocab)
            .build()
            .unwrap();

        let json_part = &prompt.user[prompt.user.find("\n\n").unwrap() + 2..];
        let payload: serde_json::Value = serde_json::from_str(json_part).unwrap();
        assert_eq!(
            payload["descriptions"]["liens"],
            "Limitations on creating liens or security interests"
        );
        assert!(payload["descriptions"].get("unknown thing").is_none());
    }
}
