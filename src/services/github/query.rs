//! Rewrites a natural-language request ("找一个 python 爬虫", "find me a rust
//! cli") into GitHub search syntax.
//!
//! Keyword matching is substring based, so "go" also fires inside "mongo".
//! That is accepted behaviour.

use regex::RegexBuilder;

const FILLER: &[&str] = &[
    "找一个", "搜索", "找", "帮我", "给我", "想要", "需要",
    "find me", "search for", "i want", "i need", "help me",
];

/// Checked in order; the first keyword present wins.
const LANGUAGE_FILTERS: &[(&str, &str)] = &[
    ("python", "language:python"),
    ("javascript", "language:javascript"),
    ("typescript", "language:typescript"),
    ("react", "language:typescript OR language:javascript react"),
    ("vue", "language:javascript vue"),
    ("node", "language:javascript node"),
    ("java", "language:java"),
    ("go", "language:go"),
    ("rust", "language:rust"),
    ("cpp", "language:cpp"),
    ("c++", "language:cpp"),
];

fn remove_ignore_case(text: &str, word: &str) -> String {
    match RegexBuilder::new(&regex::escape(word)).case_insensitive(true).build() {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

pub fn to_search_query(natural: &str) -> String {
    let mut query = natural.trim().to_string();
    for word in FILLER {
        query = remove_ignore_case(&query, word);
    }

    let lower = query.to_lowercase();
    if let Some((keyword, filter)) = LANGUAGE_FILTERS.iter().find(|(k, _)| lower.contains(k)) {
        let rest = remove_ignore_case(&query, keyword);
        return format!("{} {}", rest.trim(), filter).trim().to_string();
    }

    let query = query.trim();
    if query.is_empty() {
        "*".to_string()
    } else {
        query.to_string()
    }
}
