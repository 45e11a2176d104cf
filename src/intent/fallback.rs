//! Offline keyword classifier used whenever the completion endpoint is
//! unavailable or answers with something unusable.
//!
//! Rules are tried in table order and the first hit wins. Matching is plain
//! case-insensitive substring search, so "download the open-source one"
//! lands on `download` before `open` is ever considered.

use super::types::{IntentKind, IntentParameters, StructuredIntent};

pub const RULE_CONFIDENCE: f32 = 0.7;
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

pub const SEARCH_SYNONYMS: &[&str] = &["search", "find", "搜索", "找"];
pub const DOWNLOAD_SYNONYMS: &[&str] = &["download", "clone", "下载"];
pub const MODIFY_SYNONYMS: &[&str] = &["modify", "optimize", "change", "修改", "改", "优化"];
pub const OPEN_SYNONYMS: &[&str] = &["open", "打开"];
pub const LIST_SYNONYMS: &[&str] = &["list", "project", "列表", "项目"];

/// Builds the parameters for a matched rule from the raw text.
pub type Extractor = fn(&str) -> IntentParameters;

pub struct Rule {
    pub synonyms: &'static [&'static str],
    pub kind: IntentKind,
    pub extract: Extractor,
}

pub const RULES: &[Rule] = &[
    Rule { synonyms: SEARCH_SYNONYMS, kind: IntentKind::Search, extract: search_params },
    Rule { synonyms: DOWNLOAD_SYNONYMS, kind: IntentKind::Download, extract: no_params },
    Rule { synonyms: MODIFY_SYNONYMS, kind: IntentKind::Modify, extract: modify_params },
    Rule { synonyms: OPEN_SYNONYMS, kind: IntentKind::Open, extract: no_params },
    Rule { synonyms: LIST_SYNONYMS, kind: IntentKind::List, extract: no_params },
];

pub fn classify(text: &str) -> StructuredIntent {
    let lower = text.to_lowercase();

    for rule in RULES {
        if contains_any(&lower, rule.synonyms) {
            return StructuredIntent::new(rule.kind, RULE_CONFIDENCE, (rule.extract)(text), text);
        }
    }

    StructuredIntent::new(IntentKind::Chat, DEFAULT_CONFIDENCE, IntentParameters::default(), text)
}

fn contains_any(lower: &str, synonyms: &[&str]) -> bool {
    synonyms.iter().any(|s| lower.contains(&s.to_lowercase()))
}

fn search_params(text: &str) -> IntentParameters {
    IntentParameters {
        query: Some(strip_words(text, SEARCH_SYNONYMS)),
        ..Default::default()
    }
}

fn modify_params(text: &str) -> IntentParameters {
    IntentParameters {
        action: Some(text.to_string()),
        ..Default::default()
    }
}

fn no_params(_text: &str) -> IntentParameters {
    IntentParameters::default()
}

/// Removes every case-insensitive occurrence of `words` and trims the rest.
pub fn strip_words(text: &str, words: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'scan: while let Some(c) = rest.chars().next() {
        for word in words {
            if let Some(len) = prefix_len_ignore_case(rest, word) {
                rest = &rest[len..];
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out.trim().to_string()
}

/// Byte length of the prefix of `haystack` that equals `word` ignoring case.
fn prefix_len_ignore_case(haystack: &str, word: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for wc in word.chars() {
        let (_, hc) = hay.next()?;
        if !hc.to_lowercase().eq(wc.to_lowercase()) {
            return None;
        }
    }
    Some(hay.next().map(|(i, _)| i).unwrap_or(haystack.len()))
}
