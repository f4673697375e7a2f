use async_trait::async_trait;
use codescope_core::{AnalysisResult, Language, Result, VideoRecommendation};

/// Seam over the text-generation service that produces the analysis.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, code: &str, language: Language) -> Result<AnalysisResult>;
}

/// Seam over the search service that produces video recommendations.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<VideoRecommendation>>;
}

/// Derives the video search query from an analysis. The identified problem
/// drives the query; without one, fall back to a generic query for the
/// language.
pub fn video_search_query(analysis: &AnalysisResult, language: Language) -> String {
    let problem = analysis.identified_problem.trim();
    if problem.is_empty() {
        format!("{language} programming tutorial")
    } else {
        format!("{problem} {language} tutorial")
    }
}

/// Both providers report errors as `{"error": {"message": ...}}`. Pull that
/// message out of a raw error body when it parses; callers fall back to a
/// generic message when it does not.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
