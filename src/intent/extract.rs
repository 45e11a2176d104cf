/// Removes markdown code fences (```` ```json ```` and bare ```` ``` ````) and trims.
pub fn strip_code_fences(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("```") {
            // Keep whatever follows an info string on the same line, e.g. "```json {..}".
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            if !rest.trim().is_empty() {
                out.push_str(rest.trim());
                out.push('\n');
            }
            continue;
        }
        let line = line.trim_end().strip_suffix("```").unwrap_or(line);
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Returns the first brace-balanced `{...}` in `text`, ignoring braces that
/// appear inside JSON string literals.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fence stripping followed by object extraction.
pub fn extract_json_object(content: &str) -> Option<String> {
    let cleaned = strip_code_fences(content);
    first_json_object(&cleaned).map(str::to_string)
}
