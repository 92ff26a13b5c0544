//! # uastgate - UAST gateway
//!
//! HTTP front door for syntax-tree tooling.
//!
//! uastgate provides:
//! - Language detection for source snippets (filename, shebang and content heuristics)
//! - Parsing through an external UAST service at a chosen transformation mode
//! - A path-query language for filtering batches of serialized trees
//! - A uniform response envelope that mirrors the HTTP status in the body

pub mod uast;
pub mod language;
pub mod query;
pub mod client;
pub mod orchestrator;
pub mod filter;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use uast::{Node, Position};
pub use language::{Category, Language, LanguageDetector};
pub use client::{Mode, UastClient, HttpUastClient};
pub use query::Query;
pub use orchestrator::ParseOrchestrator;

/// Result type alias for uastgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for uastgate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Invalid mode '{0}': expected one of \"\", native, annotated, semantic")]
    InvalidMode(String),

    #[error("Could not determine the language of the content")]
    LanguageUnresolved,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),

    #[error("Syntax error in source: {}", .0.join("; "))]
    UpstreamParse(Vec<String>),

    #[error("UAST service unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl Error {
    /// Classify the error for the response envelope
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadRequest(_) => ErrorKind::BadRequest,
            Error::InvalidMode(_) => ErrorKind::InvalidMode,
            Error::LanguageUnresolved => ErrorKind::LanguageUnresolved,
            Error::Decode(_) => ErrorKind::DecodeError,
            Error::Query(_) => ErrorKind::QueryError,
            Error::UpstreamParse(_) => ErrorKind::UpstreamParseError,
            Error::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
        }
    }

    /// Individual messages to report. A parse failure can carry several
    /// syntax errors; everything else reports one.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::UpstreamParse(errors) if !errors.is_empty() => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Error taxonomy exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    InvalidMode,
    LanguageUnresolved,
    DecodeError,
    QueryError,
    UpstreamParseError,
    UpstreamUnavailable,
}

impl ErrorKind {
    /// Whether the client's input, rather than the upstream link, is at fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::UpstreamUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_parse_expands_messages() {
        let err = Error::UpstreamParse(vec!["unexpected }".into(), "unexpected ]".into()]);
        assert_eq!(err.kind(), ErrorKind::UpstreamParseError);
        assert_eq!(err.messages(), vec!["unexpected }", "unexpected ]"]);
    }

    #[test]
    fn test_kind_attribution() {
        assert!(Error::LanguageUnresolved.kind().is_client_error());
        assert!(Error::UpstreamParse(vec![]).kind().is_client_error());
        assert!(!Error::UpstreamUnavailable("refused".into()).kind().is_client_error());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::UpstreamUnavailable).unwrap();
        assert_eq!(json, "\"upstream_unavailable\"");
    }
}
