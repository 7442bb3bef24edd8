//! Conversion Pipeline - Single Entry Point
//!
//! Container read -> artboard forest -> asset map -> diagnostics -> digest.
//! Only a container FormatError aborts; every other gap is absorbed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::artboards::{artboard_id, build_forest};
use crate::assets::{build_asset_map, AssetMap, FileNameRegistry};
use crate::config::{ConfigError, ConvertConfig};
use crate::container::{ContainerReader, FormatError, RawDocument};
use crate::diagnostics::{ConversionView, Diagnostic, Diagnostician};
use crate::hashing::{artboard_hashes, document_hash, ArtboardHash};
use crate::ir::ArtboardIr;
use crate::raw::Bounds;
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutput {
    pub source: String,
    pub document_name: Option<String>,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub artboards: Vec<ArtboardIr>,
    pub assets: AssetMap,
    pub diagnostics: Vec<Diagnostic>,
    pub ir_hash: String,
    pub artboard_hashes: Vec<ArtboardHash>,
}

/// Raw container summary, before normalization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    pub source: String,
    pub document_name: Option<String>,
    pub artboards: Vec<ArtboardSummary>,
    pub resource_count: usize,
    pub interaction_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardSummary {
    pub name: String,
    pub id: String,
    pub bounds: Option<Bounds>,
    pub has_fragment: bool,
}

pub struct ConversionPipeline {
    config: ConvertConfig,
    diagnostician: Diagnostician,
}

impl ConversionPipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            diagnostician: Diagnostician::new(),
        }
    }

    pub fn read(&self, path: &Path) -> Result<RawDocument, PipelineError> {
        Ok(ContainerReader::new(&self.config).open(path)?)
    }

    pub fn inspect(&self, path: &Path) -> Result<ContainerSummary, PipelineError> {
        let doc = self.read(path)?;
        Ok(ContainerSummary {
            source: path.display().to_string(),
            document_name: doc.name.clone(),
            artboards: doc
                .artboards
                .iter()
                .map(|a| ArtboardSummary {
                    name: a.name.clone(),
                    id: artboard_id(a, &self.config.artboard_prefix),
                    bounds: a.bounds,
                    has_fragment: a.tree.is_some(),
                })
                .collect(),
            resource_count: doc.resources.len(),
            interaction_count: doc.interactions.action_count(),
        })
    }

    /// Asset map only; a fresh name registry per document.
    pub fn assets(&self, path: &Path) -> Result<AssetMap, PipelineError> {
        let doc = self.read(path)?;
        Ok(build_asset_map(&doc, &self.config.assets, &mut FileNameRegistry::new()))
    }

    pub fn convert(&self, path: &Path) -> Result<ConversionOutput, PipelineError> {
        let doc = self.read(path)?;
        info!(
            source = %path.display(),
            artboards = doc.artboards.len(),
            resources = doc.resources.len(),
            "Container parsed"
        );
        self.convert_document(&doc, path.display().to_string())
    }

    pub fn convert_document(&self, doc: &RawDocument, source: String) -> Result<ConversionOutput, PipelineError> {
        let forest = build_forest(doc, &self.config);
        let assets = build_asset_map(doc, &self.config.assets, &mut FileNameRegistry::new());
        info!(
            artboards = forest.artboards.len(),
            skipped = forest.skipped.len(),
            images = assets.len(),
            "Design data normalized"
        );

        let diagnostics = self.diagnostician.run(&ConversionView {
            document: doc,
            artboards: &forest.artboards,
            skipped: &forest.skipped,
            assets: &assets,
        });

        let ir_hash = document_hash(&forest.artboards, &assets)?;
        let artboard_hashes = artboard_hashes(&forest.artboards)?;

        Ok(ConversionOutput {
            source,
            document_name: doc.name.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            artboards: forest.artboards,
            assets,
            diagnostics,
            ir_hash,
            artboard_hashes,
        })
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(ConvertConfig::default())
    }
}
