//! HTTP implementation of the UAST client
//!
//! Protocol: `POST {base_url}/parse` with a JSON `UastRequest`. The reply is
//! JSON `{status, errors, language, uast}` where `status` is `ok`, `error`
//! (syntax errors in the source) or `fatal` (the driver failed).

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::time::Duration;

use super::{SerializedTree, UastClient, UastRequest};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReplyStatus {
    Ok,
    Error,
    Fatal,
}

#[derive(Debug, Deserialize)]
struct UastReply {
    status: ReplyStatus,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    uast: Option<String>,
}

/// Network client to the UAST service.
///
/// Holds a pooled `reqwest::Client`; cloning shares the pool.
#[derive(Clone)]
pub struct HttpUastClient {
    http: reqwest::Client,
    parse_url: String,
}

impl HttpUastClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::UpstreamUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            parse_url: format!("{}/parse", base_url.trim_end_matches('/')),
        })
    }

    pub fn parse_url(&self) -> &str {
        &self.parse_url
    }
}

#[async_trait]
impl UastClient for HttpUastClient {
    async fn parse(&self, request: &UastRequest) -> Result<SerializedTree> {
        tracing::debug!(
            "POST {} (language: {}, mode: {:?}, {} bytes)",
            self.parse_url,
            request.language,
            request.mode.as_str(),
            request.content.len()
        );

        let response = self
            .http
            .post(&self.parse_url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "UAST service replied {}",
                status
            )));
        }

        let reply: UastReply = response
            .json()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("malformed reply: {}", e)))?;

        match reply.status {
            ReplyStatus::Ok => {
                let encoded = reply.uast.ok_or_else(|| {
                    Error::UpstreamUnavailable("reply is missing the tree".to_string())
                })?;
                let bytes = general_purpose::STANDARD.decode(encoded).map_err(|e| {
                    Error::UpstreamUnavailable(format!("reply tree is not base64: {}", e))
                })?;
                tracing::debug!(
                    "Parsed as {} ({} tree bytes)",
                    reply.language.as_deref().unwrap_or(&request.language),
                    bytes.len()
                );
                Ok(SerializedTree(bytes))
            }
            ReplyStatus::Error => {
                let errors = if reply.errors.is_empty() {
                    vec!["the source could not be parsed".to_string()]
                } else {
                    reply.errors
                };
                Err(Error::UpstreamParse(errors))
            }
            ReplyStatus::Fatal => Err(Error::UpstreamUnavailable(if reply.errors.is_empty() {
                "driver failed".to_string()
            } else {
                reply.errors.join("; ")
            })),
        }
    }
}
