//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Which section-boundary algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Match heading lines, end at the next heading or a line cap
    #[default]
    LineWindow,
    /// Match spans over the whole text, end at a boundary pattern or a character cap
    Span,
}

impl Strategy {
    /// Name used in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::LineWindow => "line_window",
            Strategy::Span => "span",
        }
    }
}

/// Where the confidence floor applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Both strategies drop candidates below the floor
    #[default]
    Uniform,
    /// Only the span strategy filters; line-window keeps every match
    SpanOnly,
    /// Nothing is filtered
    Disabled,
}

impl FloorPolicy {
    /// Whether the floor filters candidates produced by `strategy`
    pub fn applies_to(self, strategy: Strategy) -> bool {
        match self {
            FloorPolicy::Uniform => true,
            FloorPolicy::SpanOnly => strategy == Strategy::Span,
            FloorPolicy::Disabled => false,
        }
    }
}

/// Settings for the language-model bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat model name
    pub model: String,

    /// Input text is truncated to this many characters
    pub text_cap_chars: usize,

    /// Response token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Alternate OpenAI-compatible endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            text_cap_chars: 100_000,
            max_tokens: 800,
            temperature: 0.0,
            base_url: None,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Section-boundary algorithm
    pub strategy: Strategy,

    /// Line-window cap: a section spans at most this many lines
    pub max_section_lines: usize,

    /// Span cap: a section holds at most this many characters
    pub max_section_chars: usize,

    /// A length-capped span is cut back to its last blank line when that
    /// line lies beyond this fraction of the span
    pub paragraph_cut_ratio: f64,

    /// Candidates scoring below this are dropped
    pub confidence_floor: f64,

    /// Which strategies the floor applies to
    pub floor_policy: FloorPolicy,

    /// Language-model bridge settings
    pub llm: LlmConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_section_lines == 0 {
            return Err("max_section_lines must be greater than 0".to_string());
        }
        if self.max_section_chars == 0 {
            return Err("max_section_chars must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.paragraph_cut_ratio) {
            return Err("paragraph_cut_ratio must be within [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err("confidence_floor must be within [0.0, 1.0]".to_string());
        }
        if self.llm.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.llm.text_cap_chars == 0 {
            return Err("llm.text_cap_chars must be greater than 0".to_string());
        }
        if self.llm.max_tokens == 0 {
            return Err("llm.max_tokens must be greater than 0".to_string());
        }
        if self.llm.temperature.is_nan() || self.llm.temperature < 0.0 {
            return Err("llm.temperature must not be negative".to_string());
        }
        Ok(())
    }

    /// Whether the confidence floor filters candidates under this configuration
    pub fn floor_applies(&self) -> bool {
        self.floor_policy.applies_to(self.strategy)
    }
}

impl Default for ExtractorConfig {
    /// Line-window matching with the floor applied to both strategies
    fn default() -> Self {
        Self {
            strategy: Strategy::LineWindow,
            max_section_lines: 120,
            max_section_chars: 5_000,
            paragraph_cut_ratio: 0.7,
            confidence_floor: 0.3,
            floor_policy: FloorPolicy::Uniform,
            llm: LlmConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Line-window preset
    pub fn line_window() -> Self {
        Self::default()
    }

    /// Span preset
    pub fn span() -> Self {
        Self {
            strategy: Strategy::Span,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
