//! Topic generation via the Gemini `generateContent` REST endpoint.
//!
//! One request per run: the prompt goes out, the first candidate's text comes
//! back. No retries and no streaming. The model is trusted to honour the
//! requested count and to avoid the existing topics; neither is checked here.

mod prompt;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use topicgen_shared::{
    GeminiConfig, GeneratedText, GenerationRequest, Result, Secret, TopicGenError,
};
use tracing::{debug, info, instrument};

pub use prompt::build_prompt;

/// Service name used in error messages.
const SERVICE: &str = "Gemini";

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("topicgen/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all of its parts joined.
    fn into_text(self) -> Result<GeneratedText> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(TopicGenError::parse(match block_reason {
                Some(reason) => format!("Gemini returned no candidates (prompt blocked: {reason})"),
                None => "Gemini returned no candidates".to_string(),
            }));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(TopicGenError::parse(format!(
                "Gemini candidate has no text (finish reason: {reason})"
            )));
        }

        Ok(GeneratedText::new(text))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client bound to one model and API key.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from settings. Makes no network calls.
    pub fn new(config: &GeminiConfig, api_key: &Secret) -> Result<Self> {
        let mut key = HeaderValue::from_str(api_key.expose())
            .map_err(|_| TopicGenError::config("GEMINI_API_KEY contains invalid header characters"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TopicGenError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_base.as_str().trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// Ask the model for new topics.
    #[instrument(skip_all, fields(model = %self.model, domain = %request.domain, count = %request.count))]
    pub async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GeneratedText> {
        let prompt = build_prompt(request);
        debug!(existing = request.existing.len(), prompt_len = prompt.len(), "built prompt");

        info!("requesting new topics from Gemini");

        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| TopicGenError::Network(format!("{SERVICE} request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            TopicGenError::Network(format!("{SERVICE}: failed to read body: {e}"))
        })?;

        if !status.is_success() {
            return Err(TopicGenError::service(SERVICE, status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| TopicGenError::parse(format!("invalid {SERVICE} response: {e}")))?;

        let generated = parsed.into_text()?;
        info!(chars = generated.as_str().len(), "received generated topics");
        Ok(generated)
    }
}
