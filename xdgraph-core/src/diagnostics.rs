//! Diagnostics - Non-fatal Gap Reporting
//!
//! Rules inspect a finished conversion and produce structured diagnostics.
//! Diagnostics never fail a conversion.

use serde::{Deserialize, Serialize};

use crate::assets::AssetMap;
use crate::container::RawDocument;
use crate::ir::ArtboardIr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub subject: Option<String>,
}

/// Everything a rule may look at.
pub struct ConversionView<'a> {
    pub document: &'a RawDocument,
    pub artboards: &'a [ArtboardIr],
    /// Indices into `document.artboards` whose root did not normalize.
    pub skipped: &'a [usize],
    pub assets: &'a AssetMap,
}

pub trait DiagnosticRule {
    fn name(&self) -> &'static str;
    fn check(&self, view: &ConversionView<'_>) -> Vec<Diagnostic>;

    fn diagnostic(&self, severity: Severity, message: String, subject: Option<String>) -> Diagnostic {
        Diagnostic {
            rule: self.name().to_string(),
            severity,
            message,
            subject,
        }
    }
}

// --- Concrete Rules ---

pub struct MissingFragmentRule;

impl DiagnosticRule for MissingFragmentRule {
    fn name(&self) -> &'static str { "missing_fragment" }

    fn check(&self, view: &ConversionView<'_>) -> Vec<Diagnostic> {
        view.document
            .artboards
            .iter()
            .filter(|a| a.tree.is_none())
            .map(|a| {
                self.diagnostic(
                    Severity::Warning,
                    "Artboard has no readable document fragment".to_string(),
                    Some(a.name.clone()),
                )
            })
            .collect()
    }
}

pub struct SkippedArtboardRule;

impl DiagnosticRule for SkippedArtboardRule {
    fn name(&self) -> &'static str { "skipped_artboard" }

    fn check(&self, view: &ConversionView<'_>) -> Vec<Diagnostic> {
        view.skipped
            .iter()
            .filter_map(|&index| view.document.artboards.get(index))
            .map(|a| {
                self.diagnostic(
                    Severity::Warning,
                    "Artboard root is not a recognized node".to_string(),
                    Some(a.name.clone()),
                )
            })
            .collect()
    }
}

pub struct MissingResourceRule;

impl DiagnosticRule for MissingResourceRule {
    fn name(&self) -> &'static str { "missing_resource" }

    fn check(&self, view: &ConversionView<'_>) -> Vec<Diagnostic> {
        view.assets
            .unmatched
            .iter()
            .map(|uid| {
                self.diagnostic(
                    Severity::Warning,
                    "Image referenced without a resource entry".to_string(),
                    Some(uid.clone()),
                )
            })
            .collect()
    }
}

pub struct OverlayRule;

impl DiagnosticRule for OverlayRule {
    fn name(&self) -> &'static str { "overlay_artboard" }

    fn check(&self, view: &ConversionView<'_>) -> Vec<Diagnostic> {
        view.artboards
            .iter()
            .filter(|a| a.is_overlay)
            .map(|a| {
                self.diagnostic(
                    Severity::Info,
                    "Artboard is an overlay transition target".to_string(),
                    Some(a.id.clone()),
                )
            })
            .collect()
    }
}

/// Runs every rule in a fixed order.
pub struct Diagnostician {
    rules: Vec<Box<dyn DiagnosticRule>>,
}

impl Diagnostician {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(MissingFragmentRule),
                Box::new(SkippedArtboardRule),
                Box::new(MissingResourceRule),
                Box::new(OverlayRule),
            ],
        }
    }

    pub fn run(&self, view: &ConversionView<'_>) -> Vec<Diagnostic> {
        self.rules.iter().flat_map(|rule| rule.check(view)).collect()
    }
}

impl Default for Diagnostician {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::RawArtboard;
    use crate::ir::{ArtboardNode, IrNode, NodeCommon};
    use crate::raw::RawNode;

    fn raw(name: &str, tree: bool) -> RawArtboard {
        RawArtboard {
            name: name.to_string(),
            id: None,
            path: None,
            bounds: None,
            viewport_height: None,
            tree: tree.then(RawNode::default),
        }
    }

    fn normalized(name: &str, overlay: bool) -> ArtboardIr {
        ArtboardIr {
            name: name.to_string(),
            id: name.to_lowercase(),
            is_overlay: overlay,
            width: None,
            height: None,
            viewport_height: None,
            root: IrNode::Artboard(ArtboardNode {
                common: NodeCommon::default(),
                background_color: None,
                children: vec![],
            }),
        }
    }

    #[test]
    fn test_rules_report_gaps() {
        let document = RawDocument {
            artboards: vec![raw("Home", true), raw("Lost", false), raw("Broken", true), raw("Modal", true)],
            ..RawDocument::default()
        };
        let artboards = vec![normalized("Home", false), normalized("Modal", true)];
        let assets = AssetMap {
            entries: vec![],
            unmatched: vec!["deadbeef".to_string()],
        };

        let diagnostics = Diagnostician::new().run(&ConversionView {
            document: &document,
            artboards: &artboards,
            skipped: &[2],
            assets: &assets,
        });

        let summary: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.rule.as_str(), d.subject.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("missing_fragment", "Lost"),
                ("skipped_artboard", "Broken"),
                ("missing_resource", "deadbeef"),
                ("overlay_artboard", "modal"),
            ]
        );
        assert_eq!(diagnostics[3].severity, Severity::Info);
    }

    #[test]
    fn test_clean_conversion_has_no_warnings() {
        let document = RawDocument {
            artboards: vec![raw("Home", true)],
            ..RawDocument::default()
        };
        let artboards = vec![normalized("Home", false)];
        let assets = AssetMap::default();

        let diagnostics = Diagnostician::default().run(&ConversionView {
            document: &document,
            artboards: &artboards,
            skipped: &[],
            assets: &assets,
        });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_skipped_artboard_reported_when_name_is_shared() {
        let document = RawDocument {
            artboards: vec![raw("Page", true), raw("Page", true)],
            ..RawDocument::default()
        };
        let artboards = vec![normalized("Page", false)];
        let assets = AssetMap::default();

        let diagnostics = Diagnostician::new().run(&ConversionView {
            document: &document,
            artboards: &artboards,
            skipped: &[1],
            assets: &assets,
        });

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "skipped_artboard");
        assert_eq!(diagnostics[0].subject.as_deref(), Some("Page"));
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }
}
