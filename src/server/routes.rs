use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::Envelope;
use super::AppState;
use crate::filter::{filter_batch, FilterRequest};
use crate::language::{Category, Language};
use crate::orchestrator::{ParseOrchestrator, ParseRequest};
use crate::uast::Node;
use crate::{Error, Result};

#[derive(Deserialize)]
pub struct DetectLangRequest {
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectLangResponse {
    pub language: String,
    #[serde(rename = "type")]
    pub category: Category,
}

/// Unwrap a JSON body, reporting a malformed one as a client error
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

pub async fn get_languages(State(state): State<Arc<AppState>>) -> Envelope<Vec<Language>> {
    Envelope::ok(state.detector.list_languages())
}

pub async fn detect_lang(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DetectLangRequest>, JsonRejection>,
) -> Result<Envelope<DetectLangResponse>> {
    let request = body(payload)?;

    let detected = state.detector.detect(&request.content, request.filename.as_deref());
    if detected.is_unknown() {
        return Err(Error::LanguageUnresolved);
    }

    tracing::info!(
        "Detected {} ({}) for {:?}",
        detected.name,
        detected.category,
        request.filename.as_deref().unwrap_or("")
    );
    Ok(Envelope::ok(DetectLangResponse {
        language: detected.name,
        category: detected.category,
    }))
}

pub async fn parse(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Envelope<Vec<Node>>> {
    let request = body(payload)?;

    let orchestrator = ParseOrchestrator::new(&state.detector, state.client.as_ref());
    let nodes = orchestrator.parse(&request).await?;

    Ok(Envelope::ok(nodes))
}

pub async fn filter(payload: std::result::Result<Json<FilterRequest>, JsonRejection>) -> Result<Envelope<Vec<Node>>> {
    let request = body(payload)?;
    let nodes = filter_batch(&request.protobufs, &request.filter)?;
    Ok(Envelope::ok(nodes))
}
