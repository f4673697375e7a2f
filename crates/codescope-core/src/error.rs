use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeScopeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Analysis provider error: {message}")]
    AnalysisProvider {
        /// HTTP status returned by the provider, absent when it was unreachable.
        status: Option<u16>,
        message: String,
        /// Raw error body, surfaced to the caller for diagnosis.
        details: Option<String>,
    },

    #[error("Failed to parse analysis response: {message}")]
    AnalysisParse {
        message: String,
        /// The unparsed model output, surfaced to the caller for diagnosis.
        raw_text: String,
    },

    #[error("Video provider error: {message}")]
    VideoProvider {
        status: Option<u16>,
        message: String,
        details: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CodeScopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_includes_message() {
        let err = CodeScopeError::AnalysisProvider {
            status: Some(503),
            message: "model overloaded".to_string(),
            details: None,
        };
        assert_eq!(
            err.to_string(),
            "Analysis provider error: model overloaded"
        );
    }

    #[test]
    fn parse_error_keeps_raw_text() {
        let err = CodeScopeError::AnalysisParse {
            message: "expected value at line 1".to_string(),
            raw_text: "{not json".to_string(),
        };
        match err {
            CodeScopeError::AnalysisParse { raw_text, .. } => {
                assert_eq!(raw_text, "{not json")
            }
            _ => unreachable!(),
        }
    }
}
