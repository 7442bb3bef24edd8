//! Asset Map Builder
//!
//! Catalogues every image identifier referenced by a pattern fill, including
//! ones reachable only through state subtrees, and assigns each a unique,
//! readable file name. Assignment is order dependent: artboards in source
//! order, then children depth-first in source order, then states.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::config::AssetNaming;
use crate::container::RawDocument;
use crate::raw::RawNode;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMapEntry {
    pub source_id: String,
    pub resource_locator: String,
    pub mime_type: Option<String>,
    pub assigned_file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMap {
    pub entries: Vec<AssetMapEntry>,
    /// Referenced identifiers with no resource entry.
    pub unmatched: Vec<String>,
}

impl AssetMap {
    pub fn get(&self, source_id: &str) -> Option<&AssetMapEntry> {
        self.entries.iter().find(|e| e.source_id == source_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names already handed out. Collisions get `-2`, `-3`, ... in order.
#[derive(Debug, Clone, Default)]
pub struct FileNameRegistry {
    used: HashSet<String>,
}

impl FileNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, slug: &str) -> String {
        let mut name = slug.to_string();
        let mut counter = 2;
        while self.used.contains(&name) {
            name = format!("{}-{}", slug, counter);
            counter += 1;
        }
        self.used.insert(name.clone());
        name
    }
}

/// Lowercase, non-alphanumeric runs collapsed to `-`, trimmed, capped.
pub fn slugify(name: &str, max_len: usize) -> String {
    let lowered = name.to_lowercase();
    let collapsed = NON_ALNUM.replace_all(&lowered, "-");
    collapsed.trim_matches('-').chars().take(max_len).collect()
}

fn truncate(id: &str, len: usize) -> String {
    id.chars().take(len).collect()
}

/// Distinct image identifiers with the first node name seen for each.
pub fn collect_image_refs(doc: &RawDocument, naming: &AssetNaming) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut refs = vec![];
    for tree in doc.artboards.iter().filter_map(|a| a.tree.as_ref()) {
        visit(tree, naming, &mut seen, &mut refs);
    }
    refs
}

fn visit(node: &RawNode, naming: &AssetNaming, seen: &mut HashSet<String>, refs: &mut Vec<(String, String)>) {
    let uid = node
        .fill()
        .and_then(|f| f.pattern.as_ref())
        .and_then(|p| p.uid());
    if let Some(uid) = uid {
        if seen.insert(uid.to_string()) {
            let label = node
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| truncate(uid, naming.id_fallback_len));
            refs.push((uid.to_string(), label));
        }
    }

    for child in node.children() {
        visit(child, naming, seen, refs);
    }
    for state in node.states() {
        visit(state, naming, seen, refs);
    }
}

pub fn build_asset_map(doc: &RawDocument, naming: &AssetNaming, registry: &mut FileNameRegistry) -> AssetMap {
    let mut map = AssetMap::default();

    for (uid, label) in collect_image_refs(doc, naming) {
        let Some(resource) = doc.resource(&uid) else {
            warn!(uid = %uid, "Referenced image has no resource entry");
            map.unmatched.push(uid);
            continue;
        };

        let mut slug = slugify(&label, naming.slug_max_len);
        if slug.is_empty() {
            slug = truncate(&uid, naming.id_fallback_len);
        }
        let base = registry.assign(&slug);

        map.entries.push(AssetMapEntry {
            assigned_file_name: format!("{}.{}", base, resource.extension),
            source_id: uid,
            resource_locator: resource.locator.clone(),
            mime_type: resource.mime_type.clone(),
        });
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{RawArtboard, ResourceEntry};
    use serde_json::json;

    fn image(name: Option<&str>, uid: &str) -> serde_json::Value {
        let mut node = json!({
            "type": "shape",
            "shape": {"type": "rect"},
            "style": {"fill": {"type": "pattern", "pattern": {"meta": {"ux": {"uid": uid}}}}}
        });
        if let Some(name) = name {
            node["name"] = json!(name);
        }
        node
    }

    fn doc(trees: Vec<serde_json::Value>, hashes: &[(&str, &str)]) -> RawDocument {
        RawDocument {
            artboards: trees
                .into_iter()
                .enumerate()
                .map(|(i, t)| RawArtboard {
                    name: format!("A{}", i),
                    id: None,
                    path: None,
                    bounds: None,
                    viewport_height: None,
                    tree: Some(serde_json::from_value(t).unwrap()),
                })
                .collect(),
            resources: hashes
                .iter()
                .map(|(hash, mime)| {
                    (
                        hash.to_string(),
                        ResourceEntry {
                            id: None,
                            locator: format!("resources/{}", hash),
                            mime_type: Some(mime.to_string()),
                            extension: crate::container::extension_for_mime(Some(*mime)),
                        },
                    )
                })
                .collect(),
            ..RawDocument::default()
        }
    }

    fn artboard(children: Vec<serde_json::Value>) -> serde_json::Value {
        json!({"type": "artboard", "artboard": {"children": children}})
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hero Image #1", 60), "hero-image-1");
        assert_eq!(slugify("  --Team   Photo!! ", 60), "team-photo");
        assert_eq!(slugify("***", 60), "");
        assert_eq!(slugify("abcdefghij", 4), "abcd");
    }

    #[test]
    fn test_registry_suffixes_in_order() {
        let mut registry = FileNameRegistry::new();
        let names: Vec<_> = (0..4).map(|_| registry.assign("photo")).collect();
        assert_eq!(names, vec!["photo", "photo-2", "photo-3", "photo-4"]);
        assert_eq!(registry.assign("photo-2"), "photo-2-2");
    }

    #[test]
    fn test_colliding_slugs_get_numeric_suffixes() {
        let d = doc(
            vec![
                artboard(vec![image(Some("Photo"), "h1"), image(Some("photo!"), "h2")]),
                artboard(vec![image(Some("PHOTO"), "h3")]),
            ],
            &[("h1", "image/png"), ("h2", "image/jpeg"), ("h3", "image/png")],
        );

        let map = build_asset_map(&d, &AssetNaming::default(), &mut FileNameRegistry::new());
        let names: Vec<_> = map.entries.iter().map(|e| e.assigned_file_name.as_str()).collect();
        assert_eq!(names, vec!["photo.png", "photo-2.jpg", "photo-3.png"]);
        assert_eq!(map.get("h2").unwrap().resource_locator, "resources/h2");
    }

    #[test]
    fn test_first_writer_wins_and_unmatched_excluded() {
        let d = doc(
            vec![artboard(vec![
                image(Some("Banner"), "h1"),
                image(Some("Other Name"), "h1"),
                image(Some("Ghost"), "missing"),
            ])],
            &[("h1", "image/webp")],
        );

        let map = build_asset_map(&d, &AssetNaming::default(), &mut FileNameRegistry::new());
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries[0].assigned_file_name, "banner.webp");
        assert_eq!(map.unmatched, vec!["missing".to_string()]);
    }

    #[test]
    fn test_empty_slug_falls_back_to_truncated_id() {
        let d = doc(
            vec![artboard(vec![image(Some("!!!"), "0123456789abcdef"), image(None, "fedcba9876543210")])],
            &[("0123456789abcdef", "image/png"), ("fedcba9876543210", "image/gif")],
        );

        let map = build_asset_map(&d, &AssetNaming::default(), &mut FileNameRegistry::new());
        assert_eq!(map.entries[0].assigned_file_name, "0123456789ab.png");
        assert_eq!(map.entries[1].assigned_file_name, "fedcba987654.gif");
    }

    #[test]
    fn test_state_only_images_are_catalogued() {
        let group = json!({
            "type": "group",
            "group": {"children": [{"type": "syncRef", "guid": "s"}]},
            "meta": {"ux": {"states": {"Hover": {"type": "group", "group": {"children": [image(Some("Hover Art"), "h9")]}}}}}
        });
        let d = doc(vec![artboard(vec![group])], &[("h9", "image/svg+xml")]);

        let map = build_asset_map(&d, &AssetNaming::default(), &mut FileNameRegistry::new());
        assert_eq!(map.entries[0].assigned_file_name, "hover-art.svg");
    }

    #[test]
    fn test_unknown_mime_uses_generic_extension() {
        let d = doc(vec![artboard(vec![image(Some("Scan"), "h1")])], &[("h1", "image/tiff")]);
        let map = build_asset_map(&d, &AssetNaming::default(), &mut FileNameRegistry::new());
        assert_eq!(map.entries[0].assigned_file_name, "scan.bin");
    }
}
