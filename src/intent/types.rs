use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is trying to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Search,
    Download,
    Modify,
    Explain,
    Open,
    List,
    Help,
    Chat,
}

impl IntentKind {
    pub const ALL: [IntentKind; 8] = [
        IntentKind::Search,
        IntentKind::Download,
        IntentKind::Modify,
        IntentKind::Explain,
        IntentKind::Open,
        IntentKind::List,
        IntentKind::Help,
        IntentKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Search => "search",
            IntentKind::Download => "download",
            IntentKind::Modify => "modify",
            IntentKind::Explain => "explain",
            IntentKind::Open => "open",
            IntentKind::List => "list",
            IntentKind::Help => "help",
            IntentKind::Chat => "chat",
        }
    }

    /// Case-insensitive label lookup. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl IntentParameters {
    /// Classifiers often return `""` for fields that do not apply.
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            query: keep(self.query),
            project_name: keep(self.project_name),
            action: keep(self.action),
            file_path: keep(self.file_path),
            language: keep(self.language),
        }
    }
}

/// Classified user request. Built once per turn and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredIntent {
    #[serde(rename = "intent")]
    pub kind: IntentKind,
    pub confidence: f32, // 0.0 - 1.0
    pub parameters: IntentParameters,
    pub raw_query: String,
}

impl StructuredIntent {
    pub fn new(kind: IntentKind, confidence: f32, parameters: IntentParameters, raw_query: &str) -> Self {
        Self {
            kind,
            confidence: clamp_confidence(confidence),
            parameters,
            raw_query: raw_query.to_string(),
        }
    }

    /// `parameters.query`, or the raw input when absent.
    pub fn search_query(&self) -> &str {
        self.parameters.query.as_deref().unwrap_or(&self.raw_query)
    }

    /// `parameters.projectName`, or the raw input when absent.
    pub fn project_reference(&self) -> &str {
        self.parameters.project_name.as_deref().unwrap_or(&self.raw_query)
    }

    /// `parameters.action`, or the raw input when absent.
    pub fn instruction(&self) -> &str {
        self.parameters.action.as_deref().unwrap_or(&self.raw_query)
    }
}

pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        return 0.5;
    }
    value.clamp(0.0, 1.0)
}
