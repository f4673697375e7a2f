use codescope_providers::{AnalysisProvider, GeminiClient, VideoProvider, YouTubeClient};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<dyn AnalysisProvider>,
    pub video: Arc<dyn VideoProvider>,
}

impl AppState {
    /// Builds the real provider clients from the environment. Missing
    /// credentials do not prevent startup; the affected requests fail at
    /// call time.
    pub fn new() -> codescope_core::Result<Self> {
        let analysis = GeminiClient::from_env()?;
        if !analysis.is_configured() {
            warn!("GEMINI_API_KEY is not set; analysis requests will fail");
        }

        let video = YouTubeClient::from_env()?;
        if !video.is_configured() {
            warn!("YOUTUBE_API_KEY is not set; video recommendations will fail");
        }

        Ok(Self {
            analysis: Arc::new(analysis),
            video: Arc::new(video),
        })
    }

    pub fn with_providers(
        analysis: Arc<dyn AnalysisProvider>,
        video: Arc<dyn VideoProvider>,
    ) -> Self {
        Self { analysis, video }
    }
}
