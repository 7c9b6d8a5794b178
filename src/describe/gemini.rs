//! Gemini `generateContent` client.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{clean_comment, failed_comment, prompts, strip_fence, Describer};
use crate::config::LlmConfig;
use crate::error::{ComprehendError, Result};

/// Delay before retry number `attempt + 1`: `initial * 2^attempt`.
pub fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    initial.saturating_mul(1u32 << attempt.min(20))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl GenerateRequest {
    fn new(prompt: String) -> Self {
        Self {
            system_instruction: Some(Content::text(prompts::SYSTEM_INSTRUCTION)),
            contents: vec![Content::text(prompt)],
            generation_config: None,
        }
    }

    fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig { temperature });
        self
    }
}

impl GenerateResponse {
    /// Text of the first candidate, all parts joined.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    attempts: u32,
    initial_delay: Duration,
    suggestions: bool,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        info!(model = %config.model, "description service configured");
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            attempts: config.retries.max(1),
            initial_delay: config.initial_retry_delay(),
            suggestions: config.suggestions,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let response: GenerateResponse = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()?
            .error_for_status()?
            .json()?;
        response.text().ok_or(ComprehendError::EmptyResponse)
    }

    /// Run a request until it yields text or the attempts run out.
    fn generate_with_retry(&self, request: &GenerateRequest, what: &str) -> Option<String> {
        for attempt in 0..self.attempts {
            debug!(attempt = attempt + 1, attempts = self.attempts, what, "requesting description");
            match self.generate(request) {
                Ok(text) => return Some(text),
                Err(e) => warn!(
                    attempt = attempt + 1,
                    attempts = self.attempts,
                    what,
                    error = %e,
                    "description request failed"
                ),
            }
            if attempt + 1 < self.attempts {
                let delay = backoff_delay(self.initial_delay, attempt);
                info!(delay_ms = delay.as_millis() as u64, "retrying description request");
                thread::sleep(delay);
            }
        }
        error!(attempts = self.attempts, what, "no description after all attempts");
        None
    }
}

impl Describer for GeminiClient {
    fn describe(&self, code: &str, role: &str) -> String {
        let request = GenerateRequest::new(prompts::comment_prompt(role, code, self.suggestions));
        match self.generate_with_retry(&request, role) {
            Some(text) => clean_comment(&text),
            None => failed_comment(role),
        }
    }

    fn overview(&self, structure_json: &str) -> Option<String> {
        let request = GenerateRequest::new(prompts::overview_prompt(structure_json));
        self.generate_with_retry(&request, "overview")
            .map(|text| strip_fence(&text, "markdown"))
    }

    fn simplify_diagram(&self, plantuml: &str) -> Option<String> {
        let request =
            GenerateRequest::new(prompts::simplify_diagram_prompt(plantuml)).with_temperature(0.1);
        self.generate_with_retry(&request, "diagram")
            .map(|text| strip_fence(&text, "plantuml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let initial = Duration::from_secs(2);
        assert_eq!(backoff_delay(initial, 0), Duration::from_secs(2));
        assert_eq!(backoff_delay(initial, 1), Duration::from_secs(4));
        assert_eq!(backoff_delay(initial, 3), Duration::from_secs(16));
        assert_eq!(backoff_delay(Duration::ZERO, 5), Duration::ZERO);
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest::new("hello".into()).with_temperature(0.5);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], prompts::SYSTEM_INSTRUCTION);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);

        let plain = serde_json::to_value(GenerateRequest::new("x".into())).unwrap();
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"A "},{"text":"comment"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("A comment"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn test_unreachable_service_falls_back() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:9/v1beta/".into(),
            retries: 2,
            initial_retry_delay_ms: 0,
            request_timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = GeminiClient::new("test-key", &config).unwrap();
        assert_eq!(
            client.url(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.0-flash:generateContent"
        );

        assert_eq!(client.describe("class A {}", "class"), failed_comment("class"));
        assert_eq!(client.overview("{}"), None);
        assert_eq!(client.simplify_diagram("@startuml\n@enduml"), None);
    }
}
