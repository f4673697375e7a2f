use crate::provider::{error_message_from_body, AnalysisProvider};
use async_trait::async_trait;
use codescope_core::{AnalysisResult, CodeScopeError, Language, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gemini analysis provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key for the Generative Language API.
    pub api_key: String,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// API base URL, overridable so tests can point at a local server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CodeScopeError::Internal(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables. A missing `GEMINI_API_KEY` is not
    /// an error here; requests will fail at call time instead.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::default())
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Single request to the provider. Exactly one attempt per inbound
    /// request; failures propagate instead of retrying.
    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        debug!(model = %self.config.model, "requesting code analysis");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| CodeScopeError::AnalysisProvider {
                status: None,
                message: format!("request failed: {e}"),
                details: None,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CodeScopeError::AnalysisProvider {
                status: Some(status.as_u16()),
                message: format!("failed to read response body: {e}"),
                details: None,
            })?;

        if !status.is_success() {
            return Err(CodeScopeError::AnalysisProvider {
                status: Some(status.as_u16()),
                message: error_message_from_body(&body)
                    .unwrap_or_else(|| format!("analysis request returned status {status}")),
                details: Some(body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|_| CodeScopeError::AnalysisProvider {
                status: Some(status.as_u16()),
                message: "unexpected response structure".to_string(),
                details: Some(body.clone()),
            })?;

        // The generated text lives at candidates[0].content.parts[0].text.
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| CodeScopeError::AnalysisProvider {
                status: Some(status.as_u16()),
                message: "unexpected response structure".to_string(),
                details: Some(body),
            })
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn analyze(&self, code: &str, language: Language) -> Result<AnalysisResult> {
        if !self.is_configured() {
            return Err(CodeScopeError::AnalysisProvider {
                status: None,
                message: "GEMINI_API_KEY is not configured".to_string(),
                details: None,
            });
        }

        let text = self.generate(build_analysis_prompt(code, language)).await?;

        // The mime-type hint asks for raw JSON but is not a guarantee; the
        // model occasionally wraps the object in a Markdown fence anyway.
        let cleaned = strip_json_fences(&text);
        match serde_json::from_str(cleaned) {
            Ok(result) => Ok(result),
            Err(e) => Err(CodeScopeError::AnalysisParse {
                message: e.to_string(),
                raw_text: text,
            }),
        }
    }
}

const PROMPT_INSTRUCTIONS: &str = r#"You are an expert software engineer performing static analysis on a code snippet. Reply with a single JSON object and nothing else: no Markdown fences, no commentary.

The object must contain exactly these keys:
- "time_complexity": the Big-O time complexity (string)
- "time_complexity_explanation": why that bound holds (string)
- "space_complexity": the Big-O space complexity (string)
- "space_complexity_explanation": why that bound holds (string)
- "optimization_suggestions": concrete improvements, most impactful first (array of strings)
- "identified_problem": the common name of the problem or pattern the code implements, e.g. "Binary Search" (string)
- "alternative_implementations": other ways to write the same behavior (array of objects with "title" and "code" string keys)

Example of the expected shape:
{
  "time_complexity": "O(n)",
  "time_complexity_explanation": "The loop visits each element exactly once.",
  "space_complexity": "O(1)",
  "space_complexity_explanation": "Only a fixed number of variables are allocated.",
  "optimization_suggestions": ["Use a generator to avoid building the full list."],
  "identified_problem": "Linear Iteration",
  "alternative_implementations": [
    {"title": "While loop", "code": "i = 0\nwhile i < n:\n    print(i)\n    i += 1"}
  ]
}"#;

/// Builds the analysis prompt: the key-by-key instructions above, then the
/// raw snippet in a fenced block labeled with its language.
pub fn build_analysis_prompt(code: &str, language: Language) -> String {
    format!("{PROMPT_INSTRUCTIONS}\n\nCode to analyze:\n```{language}\n{code}\n```\n")
}

/// Strips one enclosing Markdown code fence, with an optional info string
/// such as `json`. Anything else is returned trimmed and untouched.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

// Generative Language API request/response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                {"content": {"parts": [{"text": text}], "role": "model"}}
            ]
        })
    }

    #[test]
    fn prompt_embeds_code_and_required_keys() {
        let prompt = build_analysis_prompt("for i in range(n): print(i)", Language::Python);
        assert!(prompt.contains("```python\nfor i in range(n): print(i)\n```"));
        for key in [
            "time_complexity",
            "time_complexity_explanation",
            "space_complexity",
            "space_complexity_explanation",
            "optimization_suggestions",
            "identified_problem",
            "alternative_implementations",
        ] {
            assert!(prompt.contains(key), "prompt missing key {key}");
        }
    }

    #[test]
    fn strips_fenced_json() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        // unterminated fence is left alone
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }

    #[tokio::test]
    async fn analyze_parses_model_json() {
        let server = MockServer::start().await;
        let analysis = json!({
            "time_complexity": "O(n)",
            "time_complexity_explanation": "Single pass.",
            "space_complexity": "O(1)",
            "space_complexity_explanation": "Constant extra state.",
            "optimization_suggestions": ["None needed."],
            "identified_problem": "Linear Iteration",
            "alternative_implementations": [{"title": "While loop", "code": "while ..."}]
        });

        Mock::given(method("POST"))
            .and(path(format!("/models/{DEFAULT_MODEL}:generateContent")))
            .and(query_param("key", "test-key"))
            .and(body_string_contains("responseMimeType"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body(&analysis.to_string())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let result = client.analyze("for i in range(n): print(i)", Language::Python)
            .await
            .unwrap();
        assert_eq!(result.time_complexity, "O(n)");
        assert_eq!(result.identified_problem, "Linear Iteration");
        assert_eq!(result.alternative_implementations.len(), 1);
    }

    #[tokio::test]
    async fn analyze_accepts_fenced_model_output() {
        let server = MockServer::start().await;
        let fenced = "```json\n{\"time_complexity\": \"O(1)\"}\n```";

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(fenced)))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let result = client.analyze("x = 1", Language::Python).await.unwrap();
        assert_eq!(result.time_complexity, "O(1)");
    }

    #[tokio::test]
    async fn analyze_reports_unparseable_text_with_raw_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{not json")))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.analyze("x = 1", Language::Python).await.unwrap_err();
        match err {
            CodeScopeError::AnalysisParse { raw_text, .. } => assert_eq!(raw_text, "{not json"),
            other => panic!("expected AnalysisParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_surfaces_provider_error_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.analyze("x = 1", Language::Python).await.unwrap_err();
        match err {
            CodeScopeError::AnalysisProvider {
                status,
                message,
                details,
            } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Resource exhausted");
                assert!(details.unwrap().contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("expected AnalysisProvider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_rejects_missing_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.analyze("x = 1", Language::Python).await.unwrap_err();
        match err {
            CodeScopeError::AnalysisProvider { message, .. } => {
                assert_eq!(message, "unexpected response structure")
            }
            other => panic!("expected AnalysisProvider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_without_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient::new(GeminiConfig {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap();

        let err = client.analyze("x = 1", Language::Python).await.unwrap_err();
        assert!(matches!(
            err,
            CodeScopeError::AnalysisProvider { status: None, .. }
        ));
    }
}
