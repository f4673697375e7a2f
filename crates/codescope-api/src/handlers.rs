use crate::{ApiResult, AppState};
use axum::{extract::State, Json};
use codescope_core::{AnalysisRequest, CombinedResponse};
use codescope_providers::video_search_query;
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string(),
    })
}

/// The whole orchestration: validate, analyze, derive the video query,
/// search, assemble. The second call depends on the first's output, so the
/// flow is strictly sequential.
pub async fn analyze_code(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> ApiResult<Json<CombinedResponse>> {
    let language = request.validate()?;

    let analysis = state.analysis.analyze(&request.code, language).await?;

    // A failed video search degrades to the analysis alone instead of
    // discarding it; the caller sees an empty list plus a warning.
    let query = video_search_query(&analysis, language);
    let (youtube_videos, videos_warning) = match state.video.search(&query).await {
        Ok(videos) => (videos, None),
        Err(e) => {
            warn!("video search failed, returning analysis without videos: {e}");
            (
                Vec::new(),
                Some(format!("video recommendations unavailable: {e}")),
            )
        }
    };

    Ok(Json(CombinedResponse {
        analysis,
        youtube_videos,
        videos_warning,
    }))
}
