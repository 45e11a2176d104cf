use crate::capabilities::{DownloadedProjectRecord, SearchResult};
use std::fmt::Write;

pub const SEARCH_PREVIEW_LEN: usize = 5;

pub const NO_RESULTS: &str = "🔍 No matching projects found. Try different keywords?";
pub const SEARCH_FIRST: &str =
    "❌ Search for projects first. Say \"find a [kind of] project\" to start a search.";
pub const NO_MATCH: &str = "❌ No matching project in the last search results, please pick again.";
pub const OPEN_FILE_FIRST: &str = "❌ Open a code file first.";
pub const NO_PROJECTS: &str = "📁 You have not downloaded any projects yet. Search and download one first!";

pub const THINKING: &str = "Thinking...";
pub const MODIFYING: &str = "🤖 Analyzing the code and generating changes...";
pub const EXPLAINING: &str = "📖 Analyzing the code...";
pub const MODIFIED: &str = "✅ The code has been modified.";

pub fn search_results(result: &SearchResult) -> String {
    let mut out = format!(
        "🔍 Found {} projects, here are the top {}:\n",
        result.total_count,
        result.repositories.len().min(SEARCH_PREVIEW_LEN)
    );
    for (index, repo) in result.repositories.iter().take(SEARCH_PREVIEW_LEN).enumerate() {
        let _ = write!(
            out,
            "\n{}. ⭐ {}\n   {}\n   {} stars · {} forks · {}\n",
            index + 1,
            repo.full_name,
            repo.description.as_deref().unwrap_or("No description"),
            repo.stars,
            repo.forks,
            repo.language.as_deref().unwrap_or("N/A"),
        );
    }
    out.push_str("\nTell me which one to download, or keep searching.");
    out
}

pub fn downloading(full_name: &str) -> String {
    format!("📥 Downloading {}...", full_name)
}

pub fn downloaded(project: &DownloadedProjectRecord) -> String {
    format!(
        "✅ Download complete! Saved to: {}\n\nSay \"open project\" or \"open {}\" to open it.",
        project.local_path.display(),
        project.name
    )
}

pub fn project_list(projects: &[DownloadedProjectRecord]) -> String {
    let lines = projects
        .iter()
        .map(|p| format!("• {} ({}) - {} ⭐", p.full_name, p.language.as_deref().unwrap_or("N/A"), p.stars))
        .collect::<Vec<_>>()
        .join("\n");
    format!("📁 Downloaded projects:\n\n{}", lines)
}

pub fn opened(full_name: &str) -> String {
    format!("✅ Opened project: {}", full_name)
}

pub fn explanation(text: &str) -> String {
    format!("📖 {}", text)
}

pub fn failure(what: &str, reason: impl std::fmt::Display) -> String {
    format!("❌ {} failed: {}", what, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{RepositoryOwner, RepositorySummary};

    fn repo(n: u64) -> RepositorySummary {
        RepositorySummary {
            id: n,
            name: format!("r{}", n),
            full_name: format!("o/r{}", n),
            description: None,
            html_url: String::new(),
            clone_url: String::new(),
            ssh_url: String::new(),
            stars: n * 10,
            forks: n,
            language: None,
            topics: vec![],
            created_at: String::new(),
            updated_at: String::new(),
            pushed_at: String::new(),
            owner: RepositoryOwner { login: "o".into(), avatar_url: String::new() },
        }
    }

    #[test]
    fn test_search_preview_caps_at_five() {
        let result = SearchResult {
            repositories: (1..=8).map(repo).collect(),
            total_count: 1234,
            query: "x".into(),
        };
        let text = search_results(&result);
        assert!(text.contains("Found 1234 projects"));
        assert!(text.contains("o/r5"));
        assert!(!text.contains("o/r6"));
        assert!(text.contains("No description"));
        assert!(text.contains("N/A"));
    }
}
