//! UAST service client
//!
//! The service turns source text into a syntax tree for a given language and
//! transformation mode. `UastClient` is the seam the orchestrator depends on;
//! `HttpUastClient` is the network implementation.

pub mod http;

use async_trait::async_trait;
use serde::Serialize;
use std::str::FromStr;

use crate::uast::{codec, Node};
use crate::{Error, Result};

pub use http::HttpUastClient;

/// Transformation level of the produced tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Let the service pick its default
    #[default]
    #[serde(rename = "")]
    Default,
    /// The driver's raw output
    Native,
    /// Native plus role annotations
    Annotated,
    /// Cross-language normalization on top of annotations
    Semantic,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Default => "",
            Mode::Native => "native",
            Mode::Annotated => "annotated",
            Mode::Semantic => "semantic",
        }
    }

    pub fn all() -> &'static [Mode] {
        &[Mode::Default, Mode::Native, Mode::Annotated, Mode::Semantic]
    }
}

impl FromStr for Mode {
    type Err = Error;

    /// Exact membership check; no case folding or trimming
    fn from_str(s: &str) -> Result<Self> {
        Mode::all()
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::InvalidMode(s.to_string()))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse request as sent to the service
#[derive(Debug, Clone, Serialize)]
pub struct UastRequest {
    pub content: String,
    pub filename: String,
    pub language: String,
    pub mode: Mode,
}

/// One tree in the service's binary encoding, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedTree(pub Vec<u8>);

impl SerializedTree {
    pub fn decode(&self) -> Result<Node> {
        codec::decode_tree(&self.0)
    }
}

/// Client to the UAST-producing service.
///
/// Implementations make a single attempt per call. Failures are either
/// `Error::UpstreamParse` (the source has syntax errors) or
/// `Error::UpstreamUnavailable` (anything wrong with the service or the link).
#[async_trait]
pub trait UastClient: Send + Sync {
    async fn parse(&self, request: &UastRequest) -> Result<SerializedTree>;
}
