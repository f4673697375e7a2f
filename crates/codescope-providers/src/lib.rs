pub mod gemini;
pub mod provider;
pub mod youtube;

pub use gemini::{GeminiClient, GeminiConfig};
pub use provider::*;
pub use youtube::{YouTubeClient, YouTubeConfig};
