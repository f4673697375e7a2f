use crate::provider::{error_message_from_body, VideoProvider};
use async_trait::async_trait;
use codescope_core::{CodeScopeError, Result, VideoRecommendation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RESULTS: u32 = 5;

/// Configuration for the YouTube video provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key for the YouTube Data API v3.
    pub api_key: String,
    /// API base URL, overridable so tests can point at a local server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Result-count cap passed to the search call.
    pub max_results: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            base_url: YOUTUBE_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Client for the YouTube Data API `search.list` endpoint.
pub struct YouTubeClient {
    config: YouTubeConfig,
    client: Client,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CodeScopeError::Internal(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables. A missing `YOUTUBE_API_KEY` is not
    /// an error here; requests will fail at call time instead.
    pub fn from_env() -> Result<Self> {
        Self::new(YouTubeConfig::default())
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn search(&self, query: &str) -> Result<Vec<VideoRecommendation>> {
        if !self.is_configured() {
            return Err(CodeScopeError::VideoProvider {
                status: None,
                message: "YOUTUBE_API_KEY is not configured".to_string(),
                details: None,
            });
        }

        debug!(%query, "searching for video recommendations");
        let max_results = self.config.max_results.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CodeScopeError::VideoProvider {
                status: None,
                message: format!("request failed: {e}"),
                details: None,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CodeScopeError::VideoProvider {
                status: Some(status.as_u16()),
                message: format!("failed to read response body: {e}"),
                details: None,
            })?;

        if !status.is_success() {
            return Err(CodeScopeError::VideoProvider {
                status: Some(status.as_u16()),
                message: error_message_from_body(&body)
                    .unwrap_or_else(|| format!("video search returned status {status}")),
                details: Some(body),
            });
        }

        let parsed: SearchListResponse =
            serde_json::from_str(&body).map_err(|_| CodeScopeError::VideoProvider {
                status: Some(status.as_u16()),
                message: "unexpected response structure".to_string(),
                details: Some(body),
            })?;

        Ok(parsed
            .items
            .into_iter()
            .filter_map(to_recommendation)
            .collect())
    }
}

/// Maps one search item, preserving provider order at the call site. Items
/// without a video id (playlists, channels) are skipped. The thumbnail is
/// chosen deterministically: high, then medium, then default.
fn to_recommendation(item: SearchItem) -> Option<VideoRecommendation> {
    let video_id = item.id?.video_id?;
    let snippet = item.snippet.unwrap_or_default();
    let thumbnail_url = snippet
        .thumbnails
        .high
        .or(snippet.thumbnails.medium)
        .or(snippet.thumbnails.default)
        .map(|t| t.url)
        .unwrap_or_default();

    Some(VideoRecommendation {
        title: snippet.title,
        channel_title: snippet.channel_title,
        thumbnail_url,
        video_url: format!("{WATCH_URL_BASE}{video_id}"),
        description: snippet.description,
    })
}

// YouTube Data API v3 search.list response types

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ResourceId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "channelTitle")]
    channel_title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}
