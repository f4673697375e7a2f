use crate::{CodeScopeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the analysis form accepts. Requests naming anything else are
/// rejected before any provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Ruby,
    Swift,
    Kotlin,
    Php,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Php => "php",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CodeScopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            "csharp" | "c#" => Ok(Language::CSharp),
            "go" | "golang" => Ok(Language::Go),
            "rust" => Ok(Language::Rust),
            "ruby" => Ok(Language::Ruby),
            "swift" => Ok(Language::Swift),
            "kotlin" => Ok(Language::Kotlin),
            "php" => Ok(Language::Php),
            other => Err(CodeScopeError::InvalidRequest(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}

/// Inbound payload of `POST /analyze-code`.
///
/// Both fields default so an absent field and an empty field are rejected the
/// same way, by `validate`, instead of failing JSON extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
}

impl AnalysisRequest {
    /// Checks the request invariant: both fields present and non-empty, and
    /// the language one of the supported set. Returns the parsed language.
    pub fn validate(&self) -> Result<Language> {
        if self.code.trim().is_empty() {
            return Err(CodeScopeError::InvalidRequest(
                "code must not be empty".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(CodeScopeError::InvalidRequest(
                "language must not be empty".to_string(),
            ));
        }
        self.language.parse()
    }
}

/// The model's analysis, parsed from its JSON reply.
///
/// Every field defaults: the contract only requires the reply to be valid
/// JSON, not to carry every key. Missing keys parse to empty values rather
/// than failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub time_complexity: String,
    #[serde(default)]
    pub time_complexity_explanation: String,
    #[serde(default)]
    pub space_complexity: String,
    #[serde(default)]
    pub space_complexity_explanation: String,
    #[serde(default)]
    pub optimization_suggestions: Vec<String>,
    #[serde(default)]
    pub identified_problem: String,
    #[serde(default)]
    pub alternative_implementations: Vec<AlternativeImplementation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternativeImplementation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub code: String,
}

/// One recommended video, in the provider's relevance order.
///
/// Field names are the wire contract of the form client; `channelTitle` is
/// camelCase because that is what the client renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecommendation {
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub description: String,
}

/// The single payload returned to the caller: the analysis fields at the top
/// level plus the video recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub youtube_videos: Vec<VideoRecommendation>,
    /// Set when the video search failed and the response degraded to the
    /// analysis alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos_warning: Option<String>,
}
