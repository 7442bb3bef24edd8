//! Document Normalizer
//!
//! Recursive raw-tree to IR conversion. Pure: the only context is the
//! structural parent passed down explicitly, which placeholders need to
//! reach their parent's states.

use tracing::debug;

use crate::color::{color_hex, fill_color};
use crate::config::ConvertConfig;
use crate::geometry::{compute_path_bounds, resolve_dimensions, resolve_position};
use crate::ir::{
    ArtboardNode, BlendMode, CircleNode, CompoundPathNode, GroupNode, ImageNode, IrNode, LineNode, NodeCommon,
    RectNode, TextNode, TextRun,
};
use crate::raw::{RawKind, RawNode, RawRadius, RawStroke};
use crate::symbols::resolve_placeholder;

const DEFAULT_ARTBOARD_NAME: &str = "Artboard";

pub struct Normalizer<'a> {
    config: &'a ConvertConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }

    /// Convert one raw node. Unknown kinds and unresolved placeholders yield
    /// nothing.
    pub fn normalize(&self, node: &RawNode, parent: Option<&RawNode>) -> Option<IrNode> {
        match node.kind() {
            RawKind::Artboard => Some(self.artboard(node)),
            RawKind::Group => Some(self.group(node)),
            RawKind::Shape => Some(self.shape(node)),
            RawKind::Text => Some(self.text(node)),
            RawKind::SyncRef => resolve_placeholder(self, node, parent),
            RawKind::Unrecognized => {
                debug!(kind = ?node.kind, id = ?node.id, "Skipping unrecognized node kind");
                None
            }
        }
    }

    fn children(&self, node: &RawNode, parent: Option<&RawNode>) -> Vec<IrNode> {
        node.children()
            .iter()
            .filter_map(|child| self.normalize(child, parent))
            .collect()
    }

    /// Dimensions stay unset; the manifest bounds are authoritative.
    /// Direct children get no structural parent, so placeholders placed
    /// straight on an artboard never resolve.
    fn artboard(&self, node: &RawNode) -> IrNode {
        IrNode::Artboard(ArtboardNode {
            common: NodeCommon {
                id: node.id.clone(),
                name: node.name.clone().unwrap_or_else(|| DEFAULT_ARTBOARD_NAME.to_string()),
                ..NodeCommon::default()
            },
            background_color: fill_color(node.fill()),
            children: self.children(node, None),
        })
    }

    fn group(&self, node: &RawNode) -> IrNode {
        IrNode::Group(GroupNode {
            common: NodeCommon {
                blend_mode: None,
                ..common(node)
            },
            children: self.children(node, Some(node)),
        })
    }

    fn shape(&self, node: &RawNode) -> IrNode {
        let shape = node.shape.as_ref();
        let kind = shape.and_then(|s| s.kind());
        let fill = node.fill();
        let stroke = node.stroke();

        if let Some(pattern) = fill.filter(|f| f.is_pattern()) {
            let pattern = pattern.pattern.as_ref();
            return IrNode::Image(ImageNode {
                common: common(node),
                image_id: pattern.and_then(|p| p.uid()).map(str::to_string),
                fit_mode: pattern
                    .and_then(|p| p.scale_behavior())
                    .unwrap_or(self.config.default_fit_mode.as_str())
                    .to_string(),
                circular: kind == Some("circle"),
            });
        }

        match kind {
            Some("circle") => IrNode::Circle(CircleNode {
                common: common(node),
                background_color: fill_color(fill),
                border_color: solid_stroke(stroke).and_then(|s| color_hex(s.color.as_ref())),
                border_width: solid_stroke(stroke).and_then(|s| s.width),
            }),
            Some("line") => {
                let visible = stroke.filter(|s| s.kind() != Some("none"));
                IrNode::Line(LineNode {
                    common: NodeCommon {
                        blend_mode: None,
                        opacity: None,
                        ..common(node)
                    },
                    stroke_color: visible.and_then(|s| color_hex(s.color.as_ref())),
                    stroke_width: stroke.and_then(|s| s.width).filter(|w| *w != 0.0).unwrap_or(1.0),
                })
            }
            Some("compound") => {
                let path = shape.and_then(|s| s.path.clone()).unwrap_or_default();
                let bounds = compute_path_bounds(&path);
                let base = common(node);
                IrNode::CompoundPath(CompoundPathNode {
                    common: NodeCommon {
                        position: base.position.map(|p| p.offset(bounds.min_x, bounds.min_y)),
                        blend_mode: None,
                        ..base
                    },
                    path,
                    path_bounds: bounds,
                    background_color: fill_color(fill),
                })
            }
            _ => IrNode::Rect(RectNode {
                common: common(node),
                background_color: fill_color(fill),
                border_color: solid_stroke(stroke).and_then(|s| color_hex(s.color.as_ref())),
                border_width: solid_stroke(stroke).and_then(|s| s.width),
                corner_radius: shape.and_then(|s| s.r.as_ref()).and_then(corner_radius),
            }),
        }
    }

    fn text(&self, node: &RawNode) -> IrNode {
        let style = node.style.as_ref();
        let font = style.and_then(|s| s.font.as_ref());
        let attrs = style.and_then(|s| s.text_attributes.as_ref());
        let text = node.text.as_ref();
        let defaults = &self.config.text;

        IrNode::Text(TextNode {
            common: NodeCommon {
                blend_mode: None,
                ..common(node)
            },
            raw_text: text.and_then(|t| t.raw_text.clone()).unwrap_or_default(),
            font_family: font
                .and_then(|f| f.family.clone())
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| defaults.font_family.clone()),
            font_style: font
                .and_then(|f| f.style.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| defaults.font_style.clone()),
            font_size: font.and_then(|f| f.size).filter(|s| *s != 0.0).unwrap_or(defaults.font_size),
            color: fill_color(node.fill()),
            letter_spacing: attrs.and_then(|a| a.letter_spacing),
            line_height: attrs.and_then(|a| a.line_height),
            auto_grow: text.and_then(|t| t.frame.as_ref()).and_then(|f| f.kind.as_deref()) == Some("positioned"),
            runs: text_runs(node),
        })
    }
}

fn common(node: &RawNode) -> NodeCommon {
    NodeCommon {
        id: node.id.clone(),
        name: node.name.clone().unwrap_or_default(),
        position: Some(resolve_position(node)),
        size: resolve_dimensions(node),
        opacity: node.opacity(),
        blend_mode: node.blend_mode().and_then(BlendMode::parse),
    }
}

fn solid_stroke(stroke: Option<&RawStroke>) -> Option<&RawStroke> {
    stroke.filter(|s| s.kind() == Some("solid"))
}

/// A scalar broadcasts to all four corners; a per-corner list passes through.
fn corner_radius(radius: &RawRadius) -> Option<Vec<f64>> {
    match radius {
        RawRadius::Uniform(r) if *r != 0.0 => Some(vec![*r; 4]),
        RawRadius::Uniform(_) => None,
        RawRadius::PerCorner(corners) => Some(corners.clone()),
    }
}

/// Ordered style runs; a single run means uniform styling and yields none.
fn text_runs(node: &RawNode) -> Vec<TextRun> {
    let Some(ranged) = node.ux().map(|ux| &ux.ranged_styles) else {
        return vec![];
    };
    if ranged.len() <= 1 {
        return vec![];
    }

    ranged
        .iter()
        .map(|rs| TextRun {
            length: rs.length.unwrap_or(0),
            font_family: rs.font_family.clone().filter(|f| !f.is_empty()),
            font_style: rs.font_style.clone().filter(|s| !s.is_empty()),
            font_size: rs.font_size.filter(|s| *s != 0.0),
            color: color_hex(rs.fill.as_ref()),
            letter_spacing: rs.char_spacing,
            underline: rs.underline.unwrap_or(false),
            text_transform: rs.text_transform.clone().filter(|t| !t.is_empty()),
        })
        .collect()
}
