use crate::capabilities::{CodeEdit, SamplingOptions, TextCompletion};
use crate::error::{CapabilityError, CapabilityResult};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::info;

const MODIFY_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.3,
    max_tokens: 8000,
    timeout: Duration::from_secs(90),
};

const EXPLAIN_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.5,
    max_tokens: 2000,
    timeout: Duration::from_secs(30),
};

const EXPLAIN_PROMPT: &str = "You are a code explanation assistant. Explain clearly what the code does and how it is structured.";

static FUNCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:function|const|let|var|fn|def)\s+(\w+)\s*[=(<]").expect("Invalid function regex")
});

static CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:class|struct)\s+(\w+)").expect("Invalid class regex")
});

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:import\s+.+from\s+['"].+?['"]|use\s+[\w:]+|import\s+[\w.]+)"#).expect("Invalid import regex")
});

/// Opening fence with optional info string, closing fence.
static FENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[\w+-]*\n?").expect("Invalid fence regex")
});

/// Rewrites and explains files through the chat-completion endpoint.
#[derive(Clone)]
pub struct AiCodeModifier {
    completion: Arc<dyn TextCompletion>,
}

impl AiCodeModifier {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl CodeEdit for AiCodeModifier {
    async fn modify(&self, file_path: &Path, instruction: &str) -> CapabilityResult<String> {
        // A file that does not exist yet is modified from empty.
        let original = match tokio::fs::read_to_string(file_path).await {
            Ok(code) => code,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let language = detect_language(file_path);

        let system = format!(
            "You are a professional coding assistant. Modify the code file as the user asks.\n\n\
             Rules:\n\
             1. Return only the complete modified code, nothing else\n\
             2. Keep the existing style and structure\n\
             3. Make sure the code is syntactically correct\n\n\
             File path: {}\nLanguage: {}",
            file_path.display(),
            language
        );

        let mut user = format!("Original code:\n```{}\n{}\n```\n\nRequest: {}\n", language, original, instruction);
        if let Some(structure) = analyze_structure(&original) {
            user.push_str(&format!("\nCode structure: {}\n", structure));
        }
        user.push_str("\nReturn the complete modified code.");

        info!("Requesting modification of {}", file_path.display());
        let reply = self.completion.complete(&system, &user, &MODIFY_SAMPLING).await?;
        let code = clean_code(&reply);
        if code.is_empty() {
            return Err(CapabilityError::Api("the model returned no code".to_string()));
        }
        Ok(code)
    }

    async fn explain(&self, file_path: &Path) -> CapabilityResult<String> {
        let code = tokio::fs::read_to_string(file_path).await?;
        let user = format!("Explain the following code:\n\n```{}\n{}\n```", detect_language(file_path), code);

        let reply = self.completion.complete(EXPLAIN_PROMPT, &user, &EXPLAIN_SAMPLING).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            Ok("Unable to explain this code.".to_string())
        } else {
            Ok(reply.to_string())
        }
    }
}

pub fn detect_language(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "py" => "python",
        "java" => "java",
        "go" => "go",
        "rs" => "rust",
        "cpp" => "cpp",
        "c" => "c",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" => "kotlin",
        "vue" => "vue",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "xml" => "xml",
        "md" => "markdown",
        _ => "text",
    }
}

/// "classes: 1, functions: 3, imports: 2", or `None` for nothing recognisable.
pub fn analyze_structure(code: &str) -> Option<String> {
    let counts = [
        ("classes", CLASS_PATTERN.find_iter(code).count()),
        ("functions", FUNCTION_PATTERN.find_iter(code).count()),
        ("imports", IMPORT_PATTERN.find_iter(code).count()),
    ];
    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{}: {}", label, n))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Strips markdown fences from a model reply.
pub fn clean_code(reply: &str) -> String {
    FENCE_PATTERN.replace_all(reply, "").trim().to_string()
}
