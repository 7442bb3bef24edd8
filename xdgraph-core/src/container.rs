//! Container Reader
//!
//! Opens the archive package and eagerly extracts everything the pipeline
//! needs: manifest, one fragment per artboard, resource directory and the
//! optional interaction graph. Only the manifest is mandatory.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::ConvertConfig;
use crate::raw::{Bounds, Fragment, InteractionGraph, Manifest, RawNode};

const MANIFEST_ENTRY: &str = "manifest";
const PRIMARY_REL: &str = "primary";
const GENERIC_EXTENSION: &str = "bin";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to open container: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable container archive: {0}")]
    Archive(#[from] ZipError),

    #[error("Container has no manifest")]
    MissingManifest,

    #[error("Unparseable manifest: {0}")]
    InvalidManifest(serde_json::Error),
}

/// An opaque binary asset addressed by content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub id: Option<String>,
    pub locator: String,
    pub mime_type: Option<String>,
    pub extension: &'static str,
}

/// One artwork child of the manifest with its fragment tree, if any.
#[derive(Debug, Clone)]
pub struct RawArtboard {
    pub name: String,
    pub id: Option<String>,
    pub path: Option<String>,
    pub bounds: Option<Bounds>,
    pub viewport_height: Option<f64>,
    pub tree: Option<RawNode>,
}

#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub name: Option<String>,
    pub artboards: Vec<RawArtboard>,
    pub resources: BTreeMap<String, ResourceEntry>,
    pub interactions: InteractionGraph,
}

impl RawDocument {
    pub fn resource(&self, hash: &str) -> Option<&ResourceEntry> {
        self.resources.get(hash)
    }
}

/// Open a container with the default conventions.
pub fn open(path: &Path) -> Result<RawDocument, FormatError> {
    ContainerReader::new(&ConvertConfig::default()).open(path)
}

pub struct ContainerReader<'a> {
    config: &'a ConvertConfig,
}

impl<'a> ContainerReader<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }

    pub fn open(&self, path: &Path) -> Result<RawDocument, FormatError> {
        let file = File::open(path)?;
        self.read(file)
    }

    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<RawDocument, FormatError> {
        let mut archive = ZipArchive::new(reader)?;

        let manifest_bytes = read_entry(&mut archive, MANIFEST_ENTRY)?.ok_or(FormatError::MissingManifest)?;
        let manifest: Manifest =
            serde_json::from_slice(&manifest_bytes).map_err(FormatError::InvalidManifest)?;

        let artboards = self.extract_artboards(&manifest, &mut archive);
        let resources = self.build_resources(&manifest);
        let interactions = self.extract_interactions(&mut archive);

        debug!(
            artboards = artboards.len(),
            resources = resources.len(),
            actions = interactions.action_count(),
            "Container read"
        );

        Ok(RawDocument {
            name: manifest.name.clone(),
            artboards,
            resources,
            interactions,
        })
    }

    fn extract_artboards<R: Read + Seek>(
        &self,
        manifest: &Manifest,
        archive: &mut ZipArchive<R>,
    ) -> Vec<RawArtboard> {
        let Some(artwork) = manifest.entry(&self.config.artwork_entry) else {
            warn!("Manifest has no artwork entry");
            return vec![];
        };
        let artwork_path = artwork.path.as_deref().unwrap_or(&self.config.artwork_entry);

        artwork
            .children
            .iter()
            .filter(|child| child.name.as_deref() != Some(self.config.pasteboard_name.as_str()))
            .map(|child| {
                let name = child.name.clone().unwrap_or_default();
                let tree = child
                    .path
                    .as_deref()
                    .and_then(|p| self.read_fragment(archive, artwork_path, p, &name));

                RawArtboard {
                    name,
                    id: child.id.clone(),
                    path: child.path.clone(),
                    bounds: child.bounds,
                    viewport_height: child.viewport.and_then(|v| v.height),
                    tree,
                }
            })
            .collect()
    }

    fn read_fragment<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        artwork_path: &str,
        artboard_path: &str,
        name: &str,
    ) -> Option<RawNode> {
        let fragment_path = format!("{}/{}/{}", artwork_path, artboard_path, self.config.fragment_suffix);
        let bytes = match read_entry(archive, &fragment_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!(artboard = %name, path = %fragment_path, "Artboard fragment missing");
                return None;
            }
            Err(e) => {
                warn!(artboard = %name, path = %fragment_path, error = %e, "Artboard fragment unreadable");
                return None;
            }
        };

        match serde_json::from_slice::<Fragment>(&bytes) {
            Ok(fragment) => fragment.children.into_iter().next(),
            Err(e) => {
                warn!(artboard = %name, path = %fragment_path, error = %e, "Artboard fragment unparseable");
                None
            }
        }
    }

    fn build_resources(&self, manifest: &Manifest) -> BTreeMap<String, ResourceEntry> {
        let mut resources = BTreeMap::new();
        let Some(entry) = manifest.entry(&self.config.resources_entry) else {
            return resources;
        };

        for component in &entry.components {
            if component.rel.as_deref() != Some(PRIMARY_REL) {
                continue;
            }
            let Some(hash) = component.path.as_deref() else {
                continue;
            };
            resources.insert(
                hash.to_string(),
                ResourceEntry {
                    id: component.id.clone(),
                    locator: format!("{}/{}", self.config.resources_dir, hash),
                    mime_type: component.mime_type.clone(),
                    extension: extension_for_mime(component.mime_type.as_deref()),
                },
            );
        }

        resources
    }

    fn extract_interactions<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> InteractionGraph {
        let bytes = match read_entry(archive, &self.config.interactions_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return InteractionGraph::default(),
            Err(e) => {
                warn!(error = %e, "Interaction graph unreadable; treating as empty");
                return InteractionGraph::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, "Interaction graph unparseable; treating as empty");
            InteractionGraph::default()
        })
    }
}

/// Closed MIME table; anything else is generic binary.
pub fn extension_for_mime(mime_type: Option<&str>) -> &'static str {
    match mime_type {
        Some("image/png") => "png",
        Some("image/jpeg") => "jpg",
        Some("image/svg+xml") => "svg",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        _ => GENERIC_EXTENSION,
    }
}

/// `Ok(None)` only when the entry is absent; damaged entries are errors.
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>, FormatError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(Some(buf))
}
