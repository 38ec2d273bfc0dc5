use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("failed to parse {language} source code: {reason}")]
    ParseUnavailable { language: &'static str, reason: String },

    #[error("malformed syntax tree at line {line}: {reason}")]
    Structural { line: usize, reason: String },

    #[error("source code too large ({size} bytes, limit {limit})")]
    SourceTooLarge { size: usize, limit: usize },

    #[error("syntax tree nesting exceeds {limit} levels at line {line}")]
    NestingTooDeep { line: usize, limit: usize },

    #[error("analysis timeout: exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u128 },

    #[error("analysis worker failed unexpectedly: {0}")]
    WorkerFailed(String),
}

impl AnalysisError {
    pub fn parse_unavailable(language: &'static str, reason: impl Into<String>) -> Self {
        Self::ParseUnavailable {
            language,
            reason: reason.into(),
        }
    }

    pub fn structural(line: usize, reason: impl Into<String>) -> Self {
        Self::Structural {
            line,
            reason: reason.into(),
        }
    }
}
