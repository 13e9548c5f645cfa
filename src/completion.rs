// WHY: Preview completions come from a hosted inference endpoint; this is a thin HTTP pass-through

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::env;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "HF_API_TOKEN";
/// Optional environment override for the model id
pub const MODEL_ENV: &str = "FAIRPROMPT_MODEL";

/// Returned when the endpoint answers with no generated text
pub const NO_OUTPUT: &str = "No output.";

/// Configuration for the inference client
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_token: String,
    pub model: String,
    /// Base URL; the model id is appended as a path
    pub endpoint: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub return_full_text: bool,
}

impl CompletionConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_new_tokens: 200,
            temperature: 0.7,
            return_full_text: false,
        }
    }

    /// Read token and model from the environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let token = env::var(TOKEN_ENV).unwrap_or_default();
        if token.trim().is_empty() {
            bail!("{TOKEN_ENV} is not set; add it to the environment or a .env file");
        }

        let mut config = Self::new(token.trim());
        if let Ok(model) = env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

/// Wrap a prompt in the instruction markers the hosted instruct models expect
pub fn format_instruction(prompt: &str) -> String {
    format!("<s>[INST] {prompt} [/INST]")
}

/// Extract the completion from a response body
pub fn parse_completion_body(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).context("Inference response is not valid JSON")?;

    let text = match &value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|first| first.get("generated_text"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        _ => None,
    };

    Ok(text.unwrap_or_else(|| NO_OUTPUT.to_string()))
}

/// HTTP client for one configured model
pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn request_body(&self, prompt: &str) -> InferenceRequest {
        InferenceRequest {
            inputs: format_instruction(prompt),
            parameters: InferenceParameters {
                max_new_tokens: self.config.max_new_tokens,
                temperature: self.config.temperature,
                return_full_text: self.config.return_full_text,
            },
        }
    }

    /// Send the prompt and return the generated text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.config.url();
        info!("Requesting completion from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&self.request_body(prompt))
            .send()
            .await
            .with_context(|| format!("Failed to reach inference endpoint {url}"))?;

        let status = response.status();
        // WHY: the body carries the error message on failure too
        let body = response.text().await.context("Failed to read inference response")?;
        debug!(%status, body = %body, "Raw inference response");

        if !status.is_success() {
            bail!("Inference API error ({status}): {body}");
        }

        parse_completion_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_instruction() {
        assert_eq!(format_instruction("Summarize this"), "<s>[INST] Summarize this [/INST]");
    }

    #[test]
    fn test_parse_generated_text_array() {
        let body = r#"[{"generated_text": "A short summary."}]"#;
        assert_eq!(parse_completion_body(body).unwrap(), "A short summary.");
    }

    #[test]
    fn test_parse_plain_string() {
        assert_eq!(parse_completion_body(r#""direct text""#).unwrap(), "direct text");
    }

    #[test]
    fn test_parse_missing_text_falls_back() {
        assert_eq!(parse_completion_body("[]").unwrap(), NO_OUTPUT);
        assert_eq!(parse_completion_body(r#"[{"generated_text": ""}]"#).unwrap(), NO_OUTPUT);
        assert_eq!(parse_completion_body(r#"{"estimated_time": 20.0}"#).unwrap(), NO_OUTPUT);
    }

    #[test]
    fn test_parse_invalid_json_is_error() {
        assert!(parse_completion_body("Service Unavailable").is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let client = CompletionClient::new(CompletionConfig::new("token"));
        let body = serde_json::to_value(client.request_body("Hi")).unwrap();
        assert_eq!(body["inputs"], "<s>[INST] Hi [/INST]");
        assert_eq!(body["parameters"]["max_new_tokens"], 200);
        assert_eq!(body["parameters"]["return_full_text"], false);
    }

    #[test]
    fn test_url_joins_model() {
        let mut config = CompletionConfig::new("token");
        config.endpoint = "http://localhost:8080/models/".to_string();
        config.model = "org/model".to_string();
        assert_eq!(config.url(), "http://localhost:8080/models/org/model");
    }
}
