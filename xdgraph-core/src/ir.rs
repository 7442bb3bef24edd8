//! Visual Document IR
//!
//! Closed node model produced by normalization. Positions are always relative
//! to the immediate parent.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Axis-aligned box sampled from a path's numeric literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PathBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// `normal` and unknown keywords carry no blend token.
    pub fn parse(keyword: &str) -> Option<Self> {
        let mode = match keyword {
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "overlay" => BlendMode::Overlay,
            "darken" => BlendMode::Darken,
            "lighten" => BlendMode::Lighten,
            "color-dodge" => BlendMode::ColorDodge,
            "color-burn" => BlendMode::ColorBurn,
            "hard-light" => BlendMode::HardLight,
            "soft-light" => BlendMode::SoftLight,
            "difference" => BlendMode::Difference,
            "exclusion" => BlendMode::Exclusion,
            "hue" => BlendMode::Hue,
            "saturation" => BlendMode::Saturation,
            "color" => BlendMode::Color,
            "luminosity" => BlendMode::Luminosity,
            _ => return None,
        };
        Some(mode)
    }
}

/// Fields every node kind carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCommon {
    pub id: Option<String>,
    pub name: String,
    pub position: Option<Point>,
    #[serde(flatten)]
    pub size: Size,
    pub opacity: Option<f64>,
    pub blend_mode: Option<BlendMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrNode {
    Artboard(ArtboardNode),
    Group(GroupNode),
    Rect(RectNode),
    Circle(CircleNode),
    Line(LineNode),
    CompoundPath(CompoundPathNode),
    Image(ImageNode),
    Text(TextNode),
}

impl IrNode {
    pub fn common(&self) -> &NodeCommon {
        match self {
            IrNode::Artboard(n) => &n.common,
            IrNode::Group(n) => &n.common,
            IrNode::Rect(n) => &n.common,
            IrNode::Circle(n) => &n.common,
            IrNode::Line(n) => &n.common,
            IrNode::CompoundPath(n) => &n.common,
            IrNode::Image(n) => &n.common,
            IrNode::Text(n) => &n.common,
        }
    }

    pub fn children(&self) -> &[IrNode] {
        match self {
            IrNode::Artboard(n) => &n.children,
            IrNode::Group(n) => &n.children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub background_color: Option<String>,
    pub children: Vec<IrNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub children: Vec<IrNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corner_radius: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub stroke_color: Option<String>,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundPathNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub path: String,
    pub path_bounds: PathBounds,
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub image_id: Option<String>,
    pub fit_mode: String,
    pub circular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub raw_text: String,
    pub font_family: String,
    pub font_style: String,
    pub font_size: f64,
    pub color: Option<String>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    /// Auto-growing point text, as opposed to frame-constrained area text.
    pub auto_grow: bool,
    pub runs: Vec<TextRun>,
}

/// One styled run; unset fields inherit the node's uniform style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub length: usize,
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub letter_spacing: Option<f64>,
    pub underline: bool,
    pub text_transform: Option<String>,
}

/// One normalized top-level canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardIr {
    pub name: String,
    pub id: String,
    pub is_overlay: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub viewport_height: Option<f64>,
    pub root: IrNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_mode_known_and_unknown() {
        assert_eq!(BlendMode::parse("color-dodge"), Some(BlendMode::ColorDodge));
        assert_eq!(
            serde_json::to_value(BlendMode::parse("luminosity")).unwrap(),
            serde_json::json!("luminosity")
        );
        assert_eq!(serde_json::to_value(BlendMode::HardLight).unwrap(), serde_json::json!("hard-light"));
        assert_eq!(BlendMode::parse("normal"), None);
        assert_eq!(BlendMode::parse("pass-through"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let node = IrNode::Rect(RectNode {
            common: NodeCommon {
                id: Some("r1".to_string()),
                name: "Box".to_string(),
                position: Some(Point { x: 1.0, y: 2.0 }),
                size: Size::new(10.0, 20.0),
                opacity: None,
                blend_mode: Some(BlendMode::HardLight),
            },
            background_color: Some("#FF0000".to_string()),
            border_color: None,
            border_width: None,
            corner_radius: None,
        });

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "rect");
        assert_eq!(value["width"], 10.0);
        assert_eq!(value["position"]["y"], 2.0);
        assert_eq!(value["blendMode"], "hard-light");
        assert_eq!(value["backgroundColor"], "#FF0000");
        assert!(value["borderColor"].is_null());
    }
}
