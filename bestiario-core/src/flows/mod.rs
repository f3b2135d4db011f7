//! The generative flows.
//!
//! Every flow is a stateless request/response function around one model
//! call: assemble a Spanish instruction prompt, constrain the output to
//! a schema derived from the Rust output type, deserialize, and patch
//! the fields the model is known to get wrong. No retries, no caching.

mod combat;
mod describe;
mod planet;
mod saga;
mod sound;

pub use combat::{CombatReport, FighterOutcome};
pub use describe::CreatureValuation;
pub use saga::SagaTurn;
pub use sound::pcm_to_wav;

use gemini::{Gemini, Request, ResponseSchema};
use thiserror::Error;

/// Errors from the generative flows.
///
/// Everything the model side can do wrong collapses into this one
/// taxonomy; messages are user-facing and localized.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Error de la API generativa: {0}")]
    Api(#[from] gemini::Error),

    #[error("La IA no pudo generar una respuesta.")]
    Empty,

    #[error("La IA devolvió una respuesta inválida: {0}")]
    Invalid(String),
}

/// Configuration for the chronicler.
#[derive(Debug, Clone)]
pub struct ChroniclerConfig {
    /// The model to use (defaults to the client's default model).
    pub model: Option<String>,

    /// Maximum tokens for responses.
    pub max_output_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl Default for ChroniclerConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_output_tokens: 4096,
            temperature: Some(0.9),
        }
    }
}

/// The AI chronicler: narrator, bookmaker, and world-builder.
///
/// One instance wraps one API client; each flow method is a single
/// outstanding request.
pub struct Chronicler {
    client: Gemini,
    config: ChroniclerConfig,
}

impl Chronicler {
    /// Create a new chronicler with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Gemini::new(api_key),
            config: ChroniclerConfig::default(),
        }
    }

    /// Create a chronicler from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, FlowError> {
        Ok(Self {
            client: Gemini::from_env()?,
            config: ChroniclerConfig::default(),
        })
    }

    /// Configure the chronicler.
    pub fn with_config(mut self, config: ChroniclerConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn client(&self) -> &Gemini {
        &self.client
    }

    /// Run one schema-constrained generation and deserialize the result.
    pub(crate) async fn generate_structured<T: ResponseSchema>(
        &self,
        prompt: String,
    ) -> Result<T, FlowError> {
        let mut request =
            Request::from_prompt(prompt).with_response_schema(T::response_schema());

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        request = request.with_max_output_tokens(self.config.max_output_tokens);

        let response = self.client.generate(request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(FlowError::Empty);
        }

        serde_json::from_str(&text).map_err(|e| FlowError::Invalid(e.to_string()))
    }
}
