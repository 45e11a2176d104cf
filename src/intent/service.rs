use super::extract::extract_json_object;
use super::fallback;
use super::types::{IntentKind, IntentParameters, StructuredIntent};
use crate::capabilities::{SamplingOptions, TextCompletion};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reply used whenever `generate_response` cannot produce anything better.
pub const NEUTRAL_REPLY: &str = "Done.";

const INTENT_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.3,
    max_tokens: 500,
    timeout: Duration::from_secs(10),
};

const REPLY_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.7,
    max_tokens: 200,
    timeout: Duration::from_secs(15),
};

const INTENT_PROMPT: &str = r#"You understand what a user wants to do with GitHub projects and code.

Possible intents:
1. search - search GitHub projects ("find a React project", "search Python machine learning libraries")
2. download - download a project ("download this one", "clone react-todo", "download the second one")
3. modify - change code ("add error handling", "optimize this function", "refactor the code")
4. explain - explain code ("what does this code do", "explain this function")
5. open - open a downloaded project ("open react-todo", "switch to that project")
6. list - list downloaded projects ("show my projects", "which projects do I have")
7. chat - small talk ("hello", "thanks")

Answer with JSON in exactly this shape:
{
  "intent": "search|download|modify|explain|open|list|chat",
  "confidence": 0.0-1.0,
  "parameters": {
    "query": "search keywords (search intent)",
    "projectName": "project name or position (download/open intent)",
    "action": "what to change (modify intent)",
    "filePath": "file path if mentioned",
    "language": "programming language if mentioned"
  }
}

Return only the JSON, nothing else."#;

const REPLY_PROMPT: &str = "You are a friendly, professional assistant. Reply briefly.";

/// Shape the completion is asked to produce. Everything is optional so a
/// partially filled answer still parses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifierReply {
    intent: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    parameters: Option<IntentParameters>,
}

/// Turns free text into a `StructuredIntent` using the completion endpoint,
/// degrading to the keyword classifier on any failure.
#[derive(Clone)]
pub struct IntentService {
    completion: Arc<dyn TextCompletion>,
}

impl IntentService {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    pub async fn understand_intent(&self, text: &str) -> StructuredIntent {
        let content = match self.completion.complete(INTENT_PROMPT, text, &INTENT_SAMPLING).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Intent classification unavailable, using keyword fallback: {}", e);
                return fallback::classify(text);
            }
        };

        match parse_intent(&content, text) {
            Some(intent) => {
                debug!("Classified {:?} as {} ({:.2})", text, intent.kind, intent.confidence);
                intent
            }
            None => {
                warn!("Unusable classifier output, using keyword fallback");
                debug!("Classifier output was: {:?}", content);
                fallback::classify(text)
            }
        }
    }

    /// Short conversational reply for `chat` and `help`.
    pub async fn generate_response(&self, kind: IntentKind, context: Option<&StructuredIntent>) -> String {
        let mut prompt = format!("The user performed the action: {}", kind);
        if let Some(ctx) = context.and_then(|c| serde_json::to_string(c).ok()) {
            prompt.push_str("\nContext: ");
            prompt.push_str(&ctx);
        }
        prompt.push_str("\n\nWrite a friendly, concise reply.");

        match self.completion.complete(REPLY_PROMPT, &prompt, &REPLY_SAMPLING).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => NEUTRAL_REPLY.to_string(),
            Err(e) => {
                warn!("Reply generation failed: {}", e);
                NEUTRAL_REPLY.to_string()
            }
        }
    }
}

/// Parses a classifier reply. `raw_query` always comes from the caller, never
/// from the completion. Unknown intent labels coerce to `chat` at 0.5.
pub fn parse_intent(content: &str, raw_query: &str) -> Option<StructuredIntent> {
    let json = extract_json_object(content)?;
    let reply: ClassifierReply = serde_json::from_str(&json).ok()?;
    let parameters = reply.parameters.unwrap_or_default().without_blanks();

    let intent = match IntentKind::from_label(&reply.intent) {
        Some(kind) => StructuredIntent::new(
            kind,
            reply.confidence.unwrap_or(fallback::DEFAULT_CONFIDENCE),
            parameters,
            raw_query,
        ),
        None => StructuredIntent::new(IntentKind::Chat, fallback::DEFAULT_CONFIDENCE, parameters, raw_query),
    };
    Some(intent)
}
