//! Maps "download the second one" / "clone two" / "下载第一个" onto the last
//! search result list.

use crate::capabilities::RepositorySummary;
use crate::intent::fallback::{strip_words, DOWNLOAD_SYNONYMS};
use regex::Regex;
use std::sync::LazyLock;

/// A reference that is nothing but a number, e.g. `projectName: "2"`.
static BARE_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+|[一二三四五六七八九十]+)\s*$").expect("Invalid bare ordinal regex")
});

/// Digit or Chinese numeral preceded by a marker word. The run must not
/// continue into a name, so "clone 3d-engine" is not position 3.
static MARKED_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:第|下载|download|clone|number|no\.|#)\s*(?:the\s+)?(\d+|[一二三四五六七八九十]+)(?:$|[^A-Za-z0-9_\-])",
    )
    .expect("Invalid marked ordinal regex")
});

static ORDINAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b")
        .expect("Invalid ordinal word regex")
});

/// "2nd", "3rd", ...
static SUFFIXED_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)(?:st|nd|rd|th)\b").expect("Invalid suffixed ordinal regex")
});

const ORDINAL_WORDS: &[(&str, usize)] = &[
    ("一", 1), ("二", 2), ("三", 3), ("四", 4), ("五", 5),
    ("六", 6), ("七", 7), ("八", 8), ("九", 9), ("十", 10),
    ("first", 1), ("second", 2), ("third", 3), ("fourth", 4), ("fifth", 5),
    ("sixth", 6), ("seventh", 7), ("eighth", 8), ("ninth", 9), ("tenth", 10),
];

/// 1-based position named by `query`, if it contains an ordinal expression.
/// Unrecognized numeral words count as 1.
pub fn parse_ordinal(query: &str) -> Option<usize> {
    let token = [&*BARE_ORDINAL, &*MARKED_ORDINAL, &*ORDINAL_WORD, &*SUFFIXED_ORDINAL]
        .iter()
        .find_map(|re| re.captures(query))
        .and_then(|caps| caps.get(1))?
        .as_str();

    if token.chars().all(|c| c.is_ascii_digit()) {
        // Absurdly long digit runs cannot index anything.
        return Some(token.parse().unwrap_or(usize::MAX));
    }

    let lower = token.to_lowercase();
    let n = ORDINAL_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, n)| *n)
        .unwrap_or(1);
    Some(n)
}

/// Picks the repository the user refers to.
///
/// Ordinals index the list directly and return `None` when out of range.
/// Otherwise the first candidate whose full or short name contains the
/// reference wins, and with no such candidate the first result is used.
pub fn resolve_target<'a>(query: &str, candidates: &'a [RepositorySummary]) -> Option<&'a RepositorySummary> {
    if let Some(n) = parse_ordinal(query) {
        return n.checked_sub(1).and_then(|i| candidates.get(i));
    }

    let reference = strip_words(query, DOWNLOAD_SYNONYMS).to_lowercase();
    if !reference.is_empty() {
        let hit = candidates.iter().find(|repo| {
            repo.full_name.to_lowercase().contains(&reference) || repo.name.to_lowercase().contains(&reference)
        });
        if hit.is_some() {
            return hit;
        }
    }
    candidates.first()
}
