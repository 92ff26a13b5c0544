//! Parse orchestration
//!
//! Per request, stopping at the first failure:
//! 1. validate the mode
//! 2. compile the optional filter
//! 3. resolve the language (explicit, else detected)
//! 4. call the UAST service once
//! 5. decode the tree and apply the filter
//!
//! Steps 1-3 never touch the network.

use serde::Deserialize;

use crate::client::{Mode, UastClient, UastRequest};
use crate::language::{table, LanguageDetector};
use crate::query::Query;
use crate::uast::Node;
use crate::{Error, Result};

/// Body of `POST /parse`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseRequest {
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Validates a parse request and dispatches it to the collaborators
pub struct ParseOrchestrator<'a> {
    detector: &'a LanguageDetector,
    client: &'a dyn UastClient,
}

impl<'a> ParseOrchestrator<'a> {
    pub fn new(detector: &'a LanguageDetector, client: &'a dyn UastClient) -> Self {
        Self { detector, client }
    }

    /// Parse the content; returns the root alone, or the filter's matches
    pub async fn parse(&self, request: &ParseRequest) -> Result<Vec<Node>> {
        let mode: Mode = request.mode.as_deref().unwrap_or("").parse()?;

        let query = match request.filter.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => Some(Query::parse(filter)?),
            _ => None,
        };

        let language = self.resolve_language(request)?;

        let uast_request = UastRequest {
            content: request.content.clone(),
            filename: request.filename.clone().unwrap_or_default(),
            language,
            mode,
        };
        let root = self
            .client
            .parse(&uast_request)
            .await?
            .decode()
            .map_err(|e| Error::UpstreamUnavailable(format!("service returned an unreadable tree: {}", e)))?;

        Ok(match query {
            Some(query) => query.evaluate(&root).into_iter().cloned().collect(),
            None => vec![root],
        })
    }

    /// Explicit language, otherwise the detected language's service id.
    ///
    /// An explicit name found in the language table (ignoring case) is sent
    /// as that entry's service id; any other name goes out verbatim.
    pub fn resolve_language(&self, request: &ParseRequest) -> Result<String> {
        if let Some(language) = request.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                return Ok(match table::find(language) {
                    Some(def) => def.service_id.to_string(),
                    None => language.to_string(),
                });
            }
        }

        let detected = self
            .detector
            .detect_def(&request.content, request.filename.as_deref())
            .ok_or(Error::LanguageUnresolved)?;

        tracing::debug!("Resolved language {} by detection", detected.name);
        Ok(detected.service_id.to_string())
    }
}
