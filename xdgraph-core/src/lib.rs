//! XD Graph Core - Design Container to Visual Document IR
//!
//! # Guarantees
//! 1. Only a missing or unparseable manifest is fatal
//! 2. Positions are parent-relative, never global
//! 3. Normalization is pure recursion over an immutable container
//! 4. Asset file names are unique and assigned in source order
//! 5. Identical inputs produce identical IR hashes

pub mod raw;
pub mod config;
pub mod container;
pub mod color;
pub mod geometry;
pub mod ir;
pub mod symbols;
pub mod normalize;
pub mod artboards;
pub mod assets;
pub mod diagnostics;
pub mod hashing;
pub mod logging;
pub mod pipeline;

pub use config::{ConvertConfig, ConfigError};
pub use container::{open, ContainerReader, FormatError, RawArtboard, RawDocument, ResourceEntry};
pub use ir::{ArtboardIr, BlendMode, IrNode, NodeCommon, PathBounds, Point, Size};
pub use normalize::Normalizer;
pub use artboards::{build_forest, Forest};
pub use assets::{build_asset_map, AssetMap, AssetMapEntry, FileNameRegistry};
pub use diagnostics::{Diagnostic, Severity};
pub use hashing::{artboard_hashes, canonical_json, compute_ir_hash, document_hash, ArtboardHash};
pub use pipeline::{ConversionOutput, ConversionPipeline, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
