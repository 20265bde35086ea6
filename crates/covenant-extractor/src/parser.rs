//! Parse LLM output into per-target findings

use crate::error::ExtractorError;
use covenant_domain::{normalize, LlmFinding, SemanticFindings};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse a model response into one finding per requested target
///
/// Targets the model left out, or reported as something other than an
/// object, get an empty finding. Fields that are not strings become empty.
/// Response keys are matched after normalization.
///
/// # Errors
///
/// Returns `JsonParse` when the response is not a JSON object.
pub fn parse_findings(
    response: &str,
    targets: &[String],
) -> Result<SemanticFindings, ExtractorError> {
    let json_str = extract_json(response);
    let value: Value = serde_json::from_str(json_str)?;
    let object = value
        .as_object()
        .ok_or_else(|| ExtractorError::JsonParse("Expected a JSON object".to_string()))?;

    let by_key: Map<String, Value> = object
        .iter()
        .map(|(key, v)| (normalize(key), v.clone()))
        .collect();

    Ok(targets
        .iter()
        .map(|target| {
            let finding = by_key
                .get(target.as_str())
                .and_then(Value::as_object)
                .map(finding_from_object)
                .unwrap_or_default();
            if finding.is_empty() {
                debug!(covenant = %target, "model reported no section");
            }
            (target.clone(), finding)
        })
        .collect())
}

fn finding_from_object(obj: &Map<String, Value>) -> LlmFinding {
    let field = |name: &str| {
        obj.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    LlmFinding {
        title: field("title"),
        excerpt: field("excerpt"),
        rationale: field("rationale"),
    }
}

/// Extract JSON from response, handling markdown code blocks and stray prose
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Check if wrapped in markdown code block
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // Skip the language tag line, drop the closing fence
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.trim_end().strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    };

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(open), Some(close)) if open < close => &unfenced[open..=close],
        _ => unfenced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<String> {
        vec!["restricted payments".to_string(), "change of control".to_string()]
    }

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "restricted payments": {
                "title": "Section 4.1 Restricted Payments",
                "excerpt": "The Company shall not declare any dividend.",
                "rationale": "Heading matches."
            },
            "change of control": {"title": "", "excerpt": ""}
        }"#;

        let findings = parse_findings(response, &targets()).unwrap();
        assert_eq!(findings.len(), 2);
        let rp = &findings["restricted payments"];
        assert_eq!(rp.title, "Section 4.1 Restricted Payments");
        assert_eq!(rp.rationale, "Heading matches.");
        assert!(findings["change of control"].is_empty());
    }

    #[test]
    fn test_missing_targets_filled() {
        let findings = parse_findings("{}", &targets()).unwrap();
        assert_eq!(findings.len(), 2);
        assert!(findings.values().all(LlmFinding::is_empty));
    }

    #[test]
    fn test_extra_keys_ignored_and_keys_normalized() {
        let response = r#"{"Restricted  Payments": {"title": "RP"}, "liens": {"title": "L"}}"#;
        let findings = parse_findings(response, &targets()).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings["restricted payments"].title, "RP");
        assert!(!findings.contains_key("liens"));
    }

    #[test]
    fn test_non_object_values_and_fields() {
        let response = r#"{"restricted payments": "Section 4.1", "change of control": {"title": 7, "excerpt": "x"}}"#;
        let findings = parse_findings(response, &targets()).unwrap();
        assert!(findings["restricted payments"].is_empty());
        assert_eq!(findings["change of control"].title, "");
        assert_eq!(findings["change of control"].excerpt, "x");
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"change of control\": {\"title\": \"CoC\"}}\n```";
        let findings = parse_findings(response, &targets()).unwrap();
        assert_eq!(findings["change of control"].title, "CoC");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_findings("This is not JSON", &targets()).is_err());
        assert!(parse_findings("[1, 2]", &targets()).is_err());
    }

    #[test]
    fn test_extract_json_from_plain_json() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json), json);
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let response = "Here you go: {\"key\": 1} hope that helps";
        assert_eq!(extract_json(response), "{\"key\": 1}");
    }
}
