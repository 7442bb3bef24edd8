//! Hashing - SHA-256 over canonical IR
//!
//! Identical inputs produce identical digests. Besides the whole-document
//! `irHash`, every artboard gets its own digest so emitters can regenerate
//! only the pages that changed between two conversions.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::assets::AssetMap;
use crate::ir::ArtboardIr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardHash {
    pub id: String,
    pub hash: String,
}

#[derive(Serialize)]
struct DocumentPayload<'a> {
    artboards: &'a [ArtboardIr],
    assets: &'a AssetMap,
}

pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Sorted keys, no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&canonicalize(serde_json::to_value(value)?))
}

// `preserve_order` keeps insertion order in `Map`, so keys are re-inserted sorted.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Streams the canonical form straight into the hasher.
pub fn compute_ir_hash<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, &canonicalize(serde_json::to_value(payload)?))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest of `{artboards, assets}`.
pub fn document_hash(artboards: &[ArtboardIr], assets: &AssetMap) -> Result<String, serde_json::Error> {
    compute_ir_hash(&DocumentPayload { artboards, assets })
}

/// One digest per artboard, in forest order.
pub fn artboard_hashes(artboards: &[ArtboardIr]) -> Result<Vec<ArtboardHash>, serde_json::Error> {
    artboards
        .iter()
        .map(|artboard| {
            Ok(ArtboardHash {
                id: artboard.id.clone(),
                hash: compute_ir_hash(artboard)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArtboardNode, IrNode, NodeCommon};
    use serde_json::json;

    fn artboard(id: &str, name: &str) -> ArtboardIr {
        ArtboardIr {
            name: name.to_string(),
            id: id.to_string(),
            is_overlay: false,
            width: Some(100.0),
            height: Some(100.0),
            viewport_height: None,
            root: IrNode::Artboard(ArtboardNode {
                common: NodeCommon::default(),
                background_color: None,
                children: vec![],
            }),
        }
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"y": true, "b": null}});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":{"b":null,"y":true},"z":1}"#);
    }

    #[test]
    fn test_ir_hash_ignores_key_order() {
        let a = json!({"artboards": [{"id": "home", "width": 800}], "assets": []});
        let b = json!({"assets": [], "artboards": [{"width": 800, "id": "home"}]});
        assert_eq!(compute_ir_hash(&a).unwrap(), compute_ir_hash(&b).unwrap());
    }

    #[test]
    fn test_streamed_hash_matches_canonical_string() {
        let payload = json!({"b": [1, 2, {"d": "x", "c": 0.5}], "a": "ü"});
        let expected = sha256_hex(canonical_json(&payload).unwrap().as_bytes());
        assert_eq!(compute_ir_hash(&payload).unwrap(), expected);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_artboard_hashes_change_only_for_edited_page() {
        let before = vec![artboard("home", "Home"), artboard("about", "About")];
        let after = vec![artboard("home", "Home"), artboard("about", "About us")];

        let old = artboard_hashes(&before).unwrap();
        let new = artboard_hashes(&after).unwrap();

        assert_eq!(old[0].id, "home");
        assert_eq!(old[0], new[0]);
        assert_eq!(old[1].id, new[1].id);
        assert_ne!(old[1].hash, new[1].hash);

        let assets = AssetMap::default();
        assert_ne!(
            document_hash(&before, &assets).unwrap(),
            document_hash(&after, &assets).unwrap()
        );
    }
}
