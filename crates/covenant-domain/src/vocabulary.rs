//! Target vocabulary
//!
//! Maps canonical covenant names to the phrases and patterns used to find
//! them. The vocabulary is an immutable value built once (from the built-in
//! table or a TOML file) and handed to the extractor, so tests can swap in
//! their own.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Indicator phrases used for targets without a vocabulary entry
pub const GENERIC_INDICATORS: &[&str] = &[
    "shall not",
    "may not",
    "prohibited",
    "limitation",
    "restriction",
];

/// Normalize a free-text target name to its canonical key
///
/// Lower-cases, collapses internal whitespace runs to one space, and trims.
/// Idempotent.
///
/// # Examples
///
/// ```
/// use covenant_domain::normalize;
///
/// assert_eq!(normalize("  Change   of\tControl "), "change of control");
/// ```
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything known about one canonical covenant type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Canonical key (normalized)
    pub canonical: String,

    /// Heading phrases matched line by line; words may be joined by spaces or hyphens
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Regular expressions run over the whole text; capture group 1 is the title
    #[serde(default)]
    pub span_patterns: Vec<String>,

    /// Subject-matter keywords for confidence scoring
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Drafting phrases typical of the clause for confidence scoring
    #[serde(default)]
    pub indicators: Vec<String>,

    /// Natural-language description used in model prompts
    #[serde(default)]
    pub description: String,
}

impl VocabularyEntry {
    /// Entry for a target with no configured vocabulary
    ///
    /// The canonical phrase is its own synonym and keyword.
    pub fn fallback(canonical: &str) -> Self {
        let canonical = normalize(canonical);
        Self {
            synonyms: vec![canonical.clone()],
            span_patterns: Vec::new(),
            keywords: vec![canonical.clone()],
            indicators: GENERIC_INDICATORS.iter().map(|s| s.to_string()).collect(),
            description: format!("Sections titled or describing \"{}\"", canonical),
            canonical,
        }
    }

    /// Synonyms, or the canonical key itself when none are configured
    pub fn synonyms(&self) -> Vec<&str> {
        if self.synonyms.is_empty() {
            vec![self.canonical.as_str()]
        } else {
            self.synonyms.iter().map(String::as_str).collect()
        }
    }

    /// Heading-style title derived from the canonical key
    pub fn display_title(&self) -> String {
        self.canonical
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// On-disk shape of a vocabulary file
#[derive(Debug, Deserialize, Serialize)]
struct VocabularyFile {
    #[serde(default)]
    entry: Vec<VocabularyEntry>,
}

/// Immutable canonical-name → entry table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetVocabulary {
    entries: BTreeMap<String, VocabularyEntry>,
}

impl TargetVocabulary {
    /// Build from entries; canonical keys are normalized, later duplicates win
    pub fn new(entries: impl IntoIterator<Item = VocabularyEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.canonical = normalize(&entry.canonical);
                (entry.canonical.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// The eight covenant types found in leveraged loan and bond agreements
    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    /// Load `[[entry]]` tables from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let file: VocabularyFile =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse vocabulary TOML: {}", e))?;
        if let Some(bad) = file.entry.iter().find(|e| normalize(&e.canonical).is_empty()) {
            return Err(format!("Vocabulary entry has an empty canonical name: {:?}", bad));
        }
        Ok(Self::new(file.entry))
    }

    /// Serialize to the TOML shape accepted by [`TargetVocabulary::from_toml`]
    pub fn to_toml(&self) -> Result<String, String> {
        let file = VocabularyFile {
            entry: self.entries.values().cloned().collect(),
        };
        toml::to_string_pretty(&file).map_err(|e| format!("Failed to serialize vocabulary: {}", e))
    }

    /// Configured entry for a canonical key
    pub fn get(&self, canonical: &str) -> Option<&VocabularyEntry> {
        self.entries.get(canonical)
    }

    /// Configured entry, or a fallback built from the name itself
    pub fn entry_for(&self, target: &str) -> Cow<'_, VocabularyEntry> {
        let canonical = normalize(target);
        match self.entries.get(&canonical) {
            Some(entry) => Cow::Borrowed(entry),
            None => Cow::Owned(VocabularyEntry::fallback(&canonical)),
        }
    }

    /// Synonym phrases for a canonical key, falling back to the key itself
    pub fn synonyms_for(&self, canonical: &str) -> Vec<String> {
        match self.entries.get(canonical) {
            Some(entry) => entry.synonyms().into_iter().map(str::to_string).collect(),
            None => vec![canonical.to_string()],
        }
    }

    /// All configured canonical keys, sorted
    pub fn canonical_targets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All configured entries, sorted by key
    pub fn entries(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.values()
    }

    /// Number of configured entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is configured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_entries() -> Vec<VocabularyEntry> {
    vec![
        VocabularyEntry {
            canonical: "restricted payments".to_string(),
            synonyms: strings(&[
                "restricted payment",
                "restricted payments",
                "limitation on restricted payments",
                "limitations on restricted payments",
                "limitations on dividends and distributions",
                "restricted dividends",
            ]),
            span_patterns: strings(&[
                r"(?i)(restricted\s+payments?|dividend\s+restrictions?|distribution\s+limitations?)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(restricted\s+payments?|limitations?\s+on\s+dividends?)",
                r"(?i)(?:covenants?\s+regarding|limitations?\s+on)\s+(payments?|dividends?|distributions?)",
            ]),
            keywords: strings(&["restricted payment", "dividend", "distribution", "payment restriction"]),
            indicators: strings(&["shall not", "may not", "prohibited", "limitation", "restriction"]),
            description: "Restrictions on dividends, distributions, or payments to equity holders".to_string(),
        },
        VocabularyEntry {
            canonical: "change of control".to_string(),
            synonyms: strings(&[
                "change of control",
                "change-of-control",
                "change in control",
                "change-of-control provision",
            ]),
            span_patterns: strings(&[
                r"(?i)(change\s+(?:of|in)\s+control)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(change[\s-]+(?:of|in)[\s-]+control)",
                r"(?i)(?:upon|in\s+the\s+event\s+of)\s+(?:a\s+)?(change\s+(?:of|in)\s+control)",
            ]),
            keywords: strings(&["change of control", "change in control", "control change", "acquisition"]),
            indicators: strings(&["means", "shall mean", "defined as", "constitutes", "triggers"]),
            description: "Provisions triggered by ownership changes or acquisitions".to_string(),
        },
        VocabularyEntry {
            canonical: "debt incurrence".to_string(),
            synonyms: strings(&[
                "debt incurrence",
                "incurrence of debt",
                "incurrence of indebtedness",
                "limitation on indebtedness",
                "limitation on incurrence of indebtedness",
                "limitations on debt",
            ]),
            span_patterns: strings(&[
                r"(?i)(incurrence\s+of\s+(?:debt|indebtedness)|debt\s+incurrence)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(limitations?\s+on\s+(?:debt|indebtedness))",
                r"(?i)(additional\s+(?:debt|indebtedness)|borrowing\s+restrictions?)",
            ]),
            keywords: strings(&["debt", "indebtedness", "borrowing", "leverage", "debt incurrence"]),
            indicators: strings(&["shall not incur", "may not incur", "limitation", "ratio", "permitted"]),
            description: "Limitations on taking on new debt or leverage ratios".to_string(),
        },
        VocabularyEntry {
            canonical: "asset sales".to_string(),
            synonyms: strings(&[
                "asset sale",
                "asset sales",
                "sale of assets",
                "disposition of assets",
                "limitation on asset sales",
            ]),
            span_patterns: strings(&[
                r"(?i)(asset\s+sales?|sale\s+of\s+assets?|disposition\s+of\s+assets?)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(limitations?\s+on\s+asset\s+sales?)",
                r"(?i)(restrictions?\s+on\s+(?:sales?|dispositions?)\s+of\s+(?:assets?|property))",
            ]),
            keywords: strings(&["asset sale", "disposition", "transfer of assets", "sale of property"]),
            indicators: strings(&["shall not sell", "may not dispose", "permitted asset sale", "exceptions"]),
            description: "Restrictions on selling or disposing of assets".to_string(),
        },
        VocabularyEntry {
            canonical: "merger restrictions".to_string(),
            synonyms: strings(&[
                "merger restrictions",
                "mergers and consolidations",
                "merger, consolidation",
                "limitation on mergers",
                "consolidation restrictions",
            ]),
            span_patterns: strings(&[
                r"(?i)(merger\s+(?:restrictions?|covenants?)|consolidation\s+restrictions?)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(mergers?\s+and\s+consolidations?)",
                r"(?i)(limitations?\s+on\s+(?:mergers?|consolidations?|amalgamations?))",
            ]),
            keywords: strings(&["merger", "consolidation", "amalgamation", "combination"]),
            indicators: strings(&["shall not merge", "may not consolidate", "prohibited", "permitted merger"]),
            description: "Limitations on mergers, consolidations, or amalgamations".to_string(),
        },
        VocabularyEntry {
            canonical: "investments".to_string(),
            synonyms: strings(&[
                "investments",
                "permitted investments",
                "limitation on investments",
                "investment restrictions",
            ]),
            span_patterns: strings(&[
                r"(?i)(permitted\s+investments?|investment\s+restrictions?)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(limitations?\s+on\s+investments?)",
                r"(?i)(restrictions?\s+on\s+investments?|investment\s+covenants?)",
            ]),
            keywords: strings(&["investment", "capital expenditure", "acquisition", "equity investment"]),
            indicators: strings(&["shall not invest", "permitted investments", "investment basket", "limitations"]),
            description: "Restrictions on investments or capital expenditures".to_string(),
        },
        VocabularyEntry {
            canonical: "liens".to_string(),
            synonyms: strings(&["liens", "limitation on liens", "negative pledge", "permitted liens"]),
            span_patterns: strings(&[
                r"(?i)(liens?\s+(?:restrictions?|covenants?)|negative\s+pledge)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(limitations?\s+on\s+liens?)",
                r"(?i)(permitted\s+liens?|security\s+interests?\s+restrictions?)",
            ]),
            keywords: strings(&["lien", "security interest", "encumbrance", "pledge", "mortgage"]),
            indicators: strings(&["shall not create", "permitted liens", "negative pledge", "exceptions"]),
            description: "Limitations on creating liens or security interests".to_string(),
        },
        VocabularyEntry {
            canonical: "transactions with affiliates".to_string(),
            synonyms: strings(&[
                "transactions with affiliates",
                "transaction with affiliates",
                "affiliate transactions",
                "limitation on transactions with affiliates",
            ]),
            span_patterns: strings(&[
                r"(?i)(transactions?\s+with\s+affiliates?|affiliate\s+transactions?)",
                r"(?i)section\s*\d+\.?\d*\s*[-–—]?\s*(affiliate\s+transactions?)",
                r"(?i)(related\s+party\s+transactions?|intercompany\s+transactions?)",
            ]),
            keywords: strings(&["affiliate", "related party", "intercompany", "subsidiary transaction"]),
            indicators: strings(&["arm's length", "fair market value", "prohibited", "permitted"]),
            description: "Restrictions on related party transactions".to_string(),
        },
    ]
}
