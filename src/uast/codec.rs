//! Wire format for tree batches
//!
//! A batch is a sequence of frames. Each frame is a 4-byte big-endian length
//! followed by that many bytes holding one tree in the compact binary serde
//! encoding (varint integers, no trailing bytes). Over JSON the batch travels
//! as standard base64.

use base64::{engine::general_purpose, Engine as _};
use bincode::Options;

use super::Node;
use crate::{Error, Result};

/// Size of the frame length prefix
pub const HEADER_LEN: usize = 4;

/// Upper bound for a single encoded tree
pub const MAX_TREE_BYTES: usize = 64 * 1024 * 1024;

fn tree_options(limit: usize) -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(limit as u64)
        .reject_trailing_bytes()
}

/// Encode a single tree
pub fn encode_tree(node: &Node) -> bincode::Result<Vec<u8>> {
    tree_options(MAX_TREE_BYTES).serialize(node)
}

/// Decode a single tree.
///
/// The limit is the input length, so a corrupt length prefix inside the tree
/// cannot make the decoder claim more than the frame actually holds. Nesting
/// is capped at `MAX_TREE_DEPTH` nodes per path.
pub fn decode_tree(bytes: &[u8]) -> Result<Node> {
    if bytes.len() > MAX_TREE_BYTES {
        return Err(Error::Decode(format!(
            "tree of {} bytes exceeds the {} byte limit",
            bytes.len(),
            MAX_TREE_BYTES
        )));
    }
    tree_options(bytes.len())
        .deserialize(bytes)
        .map_err(|e| Error::Decode(format!("invalid tree encoding: {}", e)))
}

/// Encode trees as a framed batch
pub fn encode_batch(trees: &[Node]) -> bincode::Result<Vec<u8>> {
    let mut out = Vec::new();
    for tree in trees {
        let bytes = encode_tree(tree)?;
        let len = u32::try_from(bytes.len()).map_err(|_| Box::new(bincode::ErrorKind::SizeLimit))?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

/// Split a framed batch into its tree payloads without decoding them
pub fn split_frames(bytes: &[u8]) -> Result<Vec<&[u8]>> {
    let mut frames = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        if rest.len() < HEADER_LEN {
            return Err(Error::Decode(format!(
                "truncated frame header at byte {}",
                offset
            )));
        }

        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let body = &rest[HEADER_LEN..];
        if body.len() < len {
            return Err(Error::Decode(format!(
                "frame at byte {} declares {} bytes but only {} remain",
                offset,
                len,
                body.len()
            )));
        }

        frames.push(&body[..len]);
        offset += HEADER_LEN + len;
    }

    Ok(frames)
}

/// Decode every tree of a framed batch, in batch order
pub fn decode_batch(bytes: &[u8]) -> Result<Vec<Node>> {
    split_frames(bytes)?
        .into_iter()
        .enumerate()
        .map(|(i, frame)| {
            decode_tree(frame).map_err(|e| Error::Decode(format!("tree {}: {}", i, e)))
        })
        .collect()
}

/// Decode a base64 string holding a framed batch
pub fn decode_base64_batch(encoded: &str) -> Result<Vec<Node>> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::Decode(format!("invalid base64: {}", e)))?;
    decode_batch(&bytes)
}

/// Encode trees as a base64 framed batch
pub fn encode_base64_batch(trees: &[Node]) -> bincode::Result<String> {
    Ok(general_purpose::STANDARD.encode(encode_batch(trees)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uast::{Position, MAX_TREE_DEPTH};

    fn tree(name: &str) -> Node {
        Node::new("File")
            .with_property("sourceType", "module")
            .with_child(
                Node::new("Identifier")
                    .with_token(name)
                    .with_role("Identifier")
                    .with_span(Position::new(0, 1, 1), Position::new(3, 1, 4)),
            )
    }

    #[test]
    fn test_batch_preserves_order() {
        let trees = vec![tree("a"), tree("b"), tree("c")];
        let encoded = encode_base64_batch(&trees).unwrap();
        let decoded = decode_base64_batch(&encoded).unwrap();
        assert_eq!(decoded, trees);
    }

    #[test]
    fn test_empty_batch() {
        assert!(decode_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_base64_batch("not-proto").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_truncated_header() {
        let err = decode_batch(&[0, 0]).unwrap_err();
        assert!(err.to_string().contains("truncated frame header"));
    }

    #[test]
    fn test_truncated_body() {
        let mut bytes = encode_batch(&[tree("a")]).unwrap();
        bytes.pop();
        let err = decode_batch(&bytes).unwrap_err();
        assert!(err.to_string().contains("remain"));
    }

    #[test]
    fn test_garbage_frame() {
        let mut bytes = 3u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xff, 0xff]);
        let err = decode_batch(&bytes).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("tree 0"));
    }

    #[test]
    fn test_trailing_bytes_inside_frame_rejected() {
        let mut body = encode_tree(&tree("a")).unwrap();
        body.push(0);
        let mut bytes = (body.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(&body);
        assert!(decode_batch(&bytes).is_err());
    }

    /// Frame bytes for a single path of `nodes` nodes, written by hand so
    /// that very deep inputs never exist as a `Node`
    fn chain_frame(nodes: usize) -> Vec<u8> {
        let mut body = Vec::with_capacity(nodes * 8);
        for i in 0..nodes {
            // internalType "N", empty token, no properties, child count
            body.extend_from_slice(&[1, b'N', 0, 0, u8::from(i + 1 < nodes)]);
        }
        for _ in 0..nodes {
            // no start, no end, no roles
            body.extend_from_slice(&[0, 0, 0]);
        }
        body
    }

    fn chain(nodes: usize) -> Node {
        (1..nodes).fold(Node::new("N"), |child, _| Node::new("N").with_child(child))
    }

    #[test]
    fn test_chain_frame_matches_encoder() {
        assert_eq!(chain_frame(3), encode_tree(&chain(3)).unwrap());
    }

    #[test]
    fn test_shallow_chain_decodes() {
        let tree = decode_tree(&chain_frame(11)).unwrap();
        assert_eq!(tree.size(), 11);
    }

    #[test]
    fn test_depth_limit_is_inclusive() {
        let tree = decode_tree(&chain_frame(MAX_TREE_DEPTH)).unwrap();
        assert_eq!(tree.size(), MAX_TREE_DEPTH);
    }

    #[test]
    fn test_too_deep_tree_rejected() {
        let err = decode_tree(&chain_frame(MAX_TREE_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("maximum depth"));
    }

    #[test]
    fn test_very_deep_frame_rejected_without_overflow() {
        let body = chain_frame(200_000);
        let mut bytes = (body.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(&body);

        let encoded = general_purpose::STANDARD.encode(&bytes);
        let err = decode_base64_batch(&encoded).unwrap_err();
        assert!(err.to_string().contains("maximum depth"));

        // the depth counter is released after a failed decode
        assert_eq!(decode_tree(&chain_frame(11)).unwrap().size(), 11);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = encode_batch(&[tree("x")]).unwrap();
        let b = encode_batch(&[tree("x")]).unwrap();
        assert_eq!(a, b);
    }
}
