//! Artboard Orchestrator
//!
//! Normalizes each artboard, applies manifest bounds and classifies overlay
//! targets. Overlay classification needs the full destination set first.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::ConvertConfig;
use crate::container::{RawArtboard, RawDocument};
use crate::ir::{ArtboardIr, IrNode, Size};
use crate::normalize::Normalizer;
use crate::raw::InteractionGraph;

const OVERLAY_ACTION: &str = "overlay-transition";

/// Destinations of every overlay transition in the interaction graph.
pub fn overlay_targets(interactions: &InteractionGraph) -> HashSet<String> {
    interactions
        .interactions
        .values()
        .flatten()
        .filter(|action| action.action.as_deref() == Some(OVERLAY_ACTION))
        .filter_map(|action| action.destination())
        .map(str::to_string)
        .collect()
}

/// Container path minus the conventional prefix, else the raw identifier.
pub fn artboard_id(artboard: &RawArtboard, prefix: &str) -> String {
    artboard
        .path
        .as_deref()
        .map(|p| p.strip_prefix(prefix).unwrap_or(p))
        .filter(|id| !id.is_empty())
        .or(artboard.id.as_deref())
        .unwrap_or_default()
        .to_string()
}

/// Normalized artboards plus the positions of those whose tree was present
/// but did not normalize. Names may repeat, so skips are tracked by index
/// into `RawDocument::artboards`.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub artboards: Vec<ArtboardIr>,
    pub skipped: Vec<usize>,
}

pub fn build_forest(doc: &RawDocument, config: &ConvertConfig) -> Forest {
    let targets = overlay_targets(&doc.interactions);
    let normalizer = Normalizer::new(config);
    let mut forest = Forest::default();

    for (index, artboard) in doc.artboards.iter().enumerate() {
        let Some(tree) = artboard.tree.as_ref() else {
            continue;
        };
        let Some(root) = normalizer.normalize(tree, None) else {
            warn!(artboard = %artboard.name, index, "Artboard root did not normalize; skipped");
            forest.skipped.push(index);
            continue;
        };

        let id = artboard_id(artboard, &config.artboard_prefix);
        let is_overlay = targets.contains(&id);
        let bounds = artboard.bounds.map(|b| Size::new(b.width, b.height));
        debug!(artboard = %artboard.name, id = %id, is_overlay, "Artboard normalized");

        forest.artboards.push(ArtboardIr {
            name: artboard.name.clone(),
            id,
            is_overlay,
            width: bounds.and_then(|b| b.width),
            height: bounds.and_then(|b| b.height),
            viewport_height: artboard.viewport_height,
            root: with_size(root, bounds),
        });
    }

    forest
}

/// Manifest bounds override whatever normalization produced.
fn with_size(root: IrNode, bounds: Option<Size>) -> IrNode {
    match (root, bounds) {
        (IrNode::Artboard(mut artboard), Some(size)) => {
            artboard.common.size = size;
            IrNode::Artboard(artboard)
        }
        (root, _) => root,
    }
}
