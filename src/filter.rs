//! Batch filtering
//!
//! Decodes a base64 batch of trees, compiles the query, then runs it against
//! each tree on its own. Matches are concatenated in batch order, each tree
//! contributing its matches in document order.

use serde::Deserialize;

use crate::query::Query;
use crate::uast::{codec, Node};
use crate::Result;

/// Body of `POST /filter`
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    /// Base64 framed batch of encoded trees
    pub protobufs: String,
    pub filter: String,
}

/// Run `filter` over every tree of the encoded batch.
///
/// Decoding happens first and fails for the whole batch; the query is
/// compiled before any tree is scanned.
pub fn filter_batch(encoded: &str, filter: &str) -> Result<Vec<Node>> {
    let trees = codec::decode_base64_batch(encoded)?;
    let query = Query::parse(filter)?;

    let matches = apply(&query, &trees);
    tracing::debug!(
        "Filter {} matched {} nodes across {} trees",
        query,
        matches.len(),
        trees.len()
    );
    Ok(matches)
}

/// Per-tree evaluation, consolidated in batch order
pub fn apply(query: &Query, trees: &[Node]) -> Vec<Node> {
    trees
        .iter()
        .flat_map(|tree| query.evaluate(tree))
        .cloned()
        .collect()
}
