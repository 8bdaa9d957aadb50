//! Gemini `generateContent` client

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::{GenerateRequest, ModelClient};
use crate::config::{Config, GatewayConfig};

/// Where the API key is looked up, resolved on every call
#[derive(Debug, Clone)]
pub struct ApiKeySource {
    pub env_var: String,
    /// Optional KEY=value file consulted when the env var is unset
    pub env_file: Option<PathBuf>,
}

impl ApiKeySource {
    pub fn resolve(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.env_var)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(ref env_file) = self.env_file
            && env_file.exists()
        {
            let content = fs::read_to_string(env_file).context("Failed to read .env file")?;
            if let Some(value) = lookup_env_line(&content, &self.env_var) {
                return Ok(value);
            }
        }

        match self.env_file {
            Some(ref env_file) => eyre::bail!(
                "Missing API key: {} not found in environment or {}",
                self.env_var,
                env_file.display()
            ),
            None => eyre::bail!("Missing API key: {} not found in environment", self.env_var),
        }
    }
}

fn lookup_env_line(content: &str, name: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=')
            && key.trim() == name
        {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Gemini API request structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiContent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

/// Gemini API response structures
#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn build_request<'a>(request: &'a GenerateRequest<'a>) -> GeminiRequest<'a> {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user"),
            parts: vec![GeminiRequestPart { text: request.prompt }],
        }],
        system_instruction: GeminiContent {
            role: None,
            parts: vec![GeminiRequestPart {
                text: request.system_instruction,
            }],
        },
        generation_config: request.response_schema.as_ref().map(|schema| GeminiGenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        }),
    }
}

/// Blocking client for the generative language REST API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: ApiKeySource,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKeySource) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        let api_key = ApiKeySource {
            env_var: config.api_key_env.clone(),
            env_file: Some(Config::app_dir().join(".env")),
        };
        Self::new(config.base_url.clone(), api_key)
    }

    pub fn api_key_source(&self) -> &ApiKeySource {
        &self.api_key
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), model)
    }
}

impl ModelClient for GeminiClient {
    fn ready(&self) -> Result<()> {
        self.api_key.resolve().map(|_| ())
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String> {
        // Checked before any network attempt
        let api_key = self.api_key.resolve()?;

        let url = self.endpoint(request.model);
        log::info!(
            "Calling {} (structured: {})",
            request.model,
            request.response_schema.is_some()
        );

        let request_body = serde_json::to_string(&build_request(request)).context("Failed to serialize request")?;

        let mut response = ureq::post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &api_key)
            .send(request_body.as_bytes())
            .context("Failed to call Gemini API")?;

        let response_body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read response")?;
        let response: GeminiResponse =
            serde_json::from_str(&response_body).context("Failed to parse Gemini response")?;

        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_request_body_shape_for_routing() {
        let schema = serde_json::json!({"type": "OBJECT"});
        let request = GenerateRequest {
            model: "gemini-3-flash-preview",
            system_instruction: "route it",
            prompt: "What is a deadlock?",
            response_schema: Some(schema),
        };

        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What is a deadlock?");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "route it");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_request_body_without_schema() {
        let request = GenerateRequest {
            model: "m",
            system_instruction: "teach",
            prompt: "p",
            response_schema: None,
        };
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "student."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "Hello, student.");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GeminiResponse = serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::new(
            "https://example.test/v1beta/",
            ApiKeySource {
                env_var: "UNUSED".to_string(),
                env_file: None,
            },
        );
        assert_eq!(
            client.endpoint("gemini-3-flash-preview"),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        // Unroutable base URL: reaching the network would give a different error
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            ApiKeySource {
                env_var: "GATE_PREP_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
                env_file: None,
            },
        );
        let request = GenerateRequest {
            model: "m",
            system_instruction: "s",
            prompt: "p",
            response_schema: None,
        };

        let err = client.generate(&request).unwrap_err();
        assert!(err.to_string().contains("Missing API key"));
        assert!(err.to_string().contains("GATE_PREP_TEST_KEY_THAT_IS_NEVER_SET"));
        assert!(client.ready().is_err());
    }

    #[test]
    fn test_key_from_env_file() {
        let dir = TempDir::new().unwrap();
        let env_file = dir.path().join(".env");
        fs::write(
            &env_file,
            "# comment\nOTHER=1\nexport GATE_PREP_TEST_FILE_KEY=\"abc123\"\n",
        )
        .unwrap();

        let source = ApiKeySource {
            env_var: "GATE_PREP_TEST_FILE_KEY".to_string(),
            env_file: Some(env_file.clone()),
        };
        assert_eq!(source.resolve().unwrap(), "abc123");

        let missing = ApiKeySource {
            env_var: "GATE_PREP_TEST_FILE_KEY_ABSENT".to_string(),
            env_file: Some(env_file),
        };
        let err = missing.resolve().unwrap_err();
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_lookup_env_line_skips_empty_values() {
        assert_eq!(lookup_env_line("API_KEY=\n", "API_KEY"), None);
        assert_eq!(lookup_env_line("API_KEY = 'k'\n", "API_KEY").as_deref(), Some("k"));
    }
}
