//! Minimal Google Gemini API client.
//!
//! This crate provides a focused client for the `generateContent` API with:
//! - Plain text generation
//! - Structured JSON output constrained by a response schema
//! - Speech (TTS) audio generation via response modalities

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod schema;

pub use schema::ResponseSchema;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for text and structured-output requests.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Model used for speech generation requests.
pub const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Errors that can occur when using the Gemini client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked by the API: {0}")]
    Blocked(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Gemini API client.
#[derive(Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Gemini {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a Gemini client from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Set the default model for this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a generation request and return the full response.
    pub async fn generate(&self, request: Request) -> Result<Response, Error> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let api_request = build_api_request(&request);
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(format!("{API_BASE}/models/{model}:generateContent"))
            .headers(headers)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        parse_response(api_response)
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| Error::Config(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A generation request to send to Gemini.
#[derive(Debug, Clone)]
pub struct Request {
    pub model: Option<String>,
    pub system: Option<String>,
    pub contents: Vec<Content>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<usize>,
    pub response_schema: Option<serde_json::Value>,
    pub response_modalities: Option<Vec<Modality>>,
    pub voice: Option<String>,
}

impl Request {
    /// Create a new request with the given contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            model: None,
            system: None,
            contents,
            temperature: None,
            max_output_tokens: None,
            response_schema: None,
            response_modalities: None,
            voice: None,
        }
    }

    /// Create a single-turn request from one user prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![Content::user(prompt)])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: usize) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Constrain the response to JSON matching the given schema.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Request audio output spoken with the given prebuilt voice.
    pub fn with_audio_output(mut self, voice: impl Into<String>) -> Self {
        self.response_modalities = Some(vec![Modality::Audio]);
        self.voice = Some(voice.into());
        self
    }
}

/// A content entry in the conversation.
#[derive(Debug, Clone)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user content entry with text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Create a model content entry with text.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

/// The role of a content entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// A part of a content entry.
#[derive(Debug, Clone)]
pub enum Part {
    Text {
        text: String,
    },
    /// Base64-encoded binary data (audio, images).
    InlineData {
        mime_type: String,
        data: String,
    },
}

impl Part {
    /// Extract text from a Text part.
    pub fn as_text(&self) -> Option<&str> {
        if let Part::Text { text } = self {
            Some(text)
        } else {
            None
        }
    }
}

/// Output modalities the model may respond with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Audio,
}

/// A generation response from Gemini.
#[derive(Debug, Clone)]
pub struct Response {
    pub model_version: Option<String>,
    pub content: Vec<Part>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

impl Response {
    /// Get all text content concatenated.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Get the first inline-data part as (mime type, base64 data).
    pub fn inline_data(&self) -> Option<(&str, &str)> {
        self.content.iter().find_map(|part| {
            if let Part::InlineData { mime_type, data } = part {
                Some((mime_type.as_str(), data.as_str()))
            } else {
                None
            }
        })
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

/// Token usage information.
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub output_tokens: usize,
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
enum ApiPart {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "inlineData", rename_all = "camelCase")]
    InlineData { mime_type: String, data: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<ApiSpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiSpeechConfig {
    voice_config: ApiVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiVoiceConfig {
    prebuilt_voice_config: ApiPrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiPrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<ApiUsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

fn build_api_request(request: &Request) -> ApiRequest {
    let system_instruction = request.system.as_ref().map(|text| ApiContent {
        role: None,
        parts: vec![ApiPart::Text(text.clone())],
    });

    let contents = request
        .contents
        .iter()
        .map(|c| ApiContent {
            role: Some(match c.role {
                Role::User => "user".to_string(),
                Role::Model => "model".to_string(),
            }),
            parts: c.parts.iter().map(|p| p.into()).collect(),
        })
        .collect();

    // responseMimeType must be application/json whenever a schema is set
    let response_mime_type = request
        .response_schema
        .as_ref()
        .map(|_| "application/json".to_string());

    let response_modalities = request.response_modalities.as_ref().map(|modalities| {
        modalities
            .iter()
            .map(|m| match m {
                Modality::Text => "TEXT".to_string(),
                Modality::Audio => "AUDIO".to_string(),
            })
            .collect()
    });

    let speech_config = request.voice.as_ref().map(|voice| ApiSpeechConfig {
        voice_config: ApiVoiceConfig {
            prebuilt_voice_config: ApiPrebuiltVoiceConfig {
                voice_name: voice.clone(),
            },
        },
    });

    let has_config = request.temperature.is_some()
        || request.max_output_tokens.is_some()
        || response_mime_type.is_some()
        || response_modalities.is_some()
        || speech_config.is_some();

    ApiRequest {
        system_instruction,
        contents,
        generation_config: has_config.then(|| ApiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            response_mime_type,
            response_schema: request.response_schema.clone(),
            response_modalities,
            speech_config,
        }),
    }
}

impl From<&Part> for ApiPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text { text } => ApiPart::Text(text.clone()),
            Part::InlineData { mime_type, data } => ApiPart::InlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            },
        }
    }
}

fn parse_response(api_response: ApiResponse) -> Result<Response, Error> {
    let Some(candidate) = api_response.candidates.into_iter().next() else {
        // A blocked prompt comes back with no candidates and a block reason.
        let reason = api_response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(Error::Blocked(reason));
    };

    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| match p {
                    ApiPart::Text(text) => Part::Text { text },
                    ApiPart::InlineData { mime_type, data } => {
                        Part::InlineData { mime_type, data }
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some("SAFETY") | Some("PROHIBITED_CONTENT") => FinishReason::Safety,
        Some(_) => FinishReason::Other,
    };

    let usage = api_response
        .usage_metadata
        .map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    Ok(Response {
        model_version: api_response.model_version,
        content,
        finish_reason,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_client_with_model() {
        let client = Gemini::new("test-key").with_model("gemini-2.5-pro");
        assert_eq!(client.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_request_builder() {
        let request = Request::from_prompt("Hola")
            .with_system("Eres un narrador")
            .with_max_output_tokens(1000)
            .with_temperature(0.7);

        assert_eq!(request.max_output_tokens, Some(1000));
        assert!(request.system.is_some());
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.contents.len(), 1);
    }

    #[test]
    fn test_audio_request_sets_modality() {
        let request = Request::from_prompt("a deep roar").with_audio_output("Algenib");
        assert_eq!(request.response_modalities, Some(vec![Modality::Audio]));
        assert_eq!(request.voice.as_deref(), Some("Algenib"));
    }

    #[test]
    fn test_schema_forces_json_mime_type() {
        let request =
            Request::from_prompt("dame JSON").with_response_schema(serde_json::json!({
                "type": "object",
                "properties": { "nombre": { "type": "string" } }
            }));
        let api = build_api_request(&request);
        let config = api.generation_config.expect("config should be present");
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(config.response_schema.is_some());
    }

    #[test]
    fn test_api_request_serialization() {
        let request = Request::from_prompt("Hola").with_system("sistema");
        let api = build_api_request(&request);
        let value = serde_json::to_value(&api).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sistema");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hola");
        // No generation config requested, so the key must be absent
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_speech_config_serialization() {
        let request = Request::from_prompt("a roar").with_audio_output("Algenib");
        let api = build_api_request(&request);
        let value = serde_json::to_value(&api).unwrap();

        assert_eq!(value["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Algenib"
        );
    }

    #[test]
    fn test_parse_text_response() {
        let raw = r#"{
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Xylos" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 },
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let response = parse_response(api).unwrap();

        assert_eq!(response.text(), "Xylos");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.prompt_tokens, 12);
        assert_eq!(response.usage.output_tokens, 3);
    }

    #[test]
    fn test_parse_audio_response() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let response = parse_response(api).unwrap();

        let (mime, data) = response.inline_data().expect("should have inline data");
        assert_eq!(mime, "audio/L16;rate=24000");
        assert_eq!(data, "AAAA");
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_parse_blocked_response() {
        let raw = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let err = parse_response(api).unwrap_err();
        assert!(matches!(err, Error::Blocked(reason) if reason == "SAFETY"));
    }
}
