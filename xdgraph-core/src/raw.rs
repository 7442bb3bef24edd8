//! Raw Container Model
//!
//! Serde view of the manifest, per-artboard fragments and interaction graph.
//! Every field is optional: source documents routinely omit parts of it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

// --- Manifest ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.children.iter().find(|c| c.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub children: Vec<ManifestEntry>,
    #[serde(default)]
    pub components: Vec<ManifestComponent>,
    #[serde(default, rename = "uxdesign#bounds")]
    pub bounds: Option<Bounds>,
    #[serde(default, rename = "uxdesign#viewport")]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestComponent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub rel: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub height: Option<f64>,
}

// --- Fragment ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fragment {
    #[serde(default, deserialize_with = "lenient_list")]
    pub children: Vec<RawNode>,
}

/// Declared kind of a raw node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Artboard,
    Group,
    Shape,
    Text,
    SyncRef,
    Unrecognized,
}

impl RawKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "artboard" => RawKind::Artboard,
            "group" => RawKind::Group,
            "shape" => RawKind::Shape,
            "text" => RawKind::Text,
            "syncRef" => RawKind::SyncRef,
            _ => RawKind::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: Option<RawTransform>,
    #[serde(default)]
    pub style: Option<RawStyle>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub artboard: Option<RawContainer>,
    #[serde(default)]
    pub group: Option<RawContainer>,
    #[serde(default)]
    pub shape: Option<RawShape>,
    #[serde(default)]
    pub text: Option<RawText>,
}

impl RawNode {
    pub fn kind(&self) -> RawKind {
        self.kind.as_deref().map_or(RawKind::Unrecognized, RawKind::from_tag)
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind() == RawKind::SyncRef
    }

    /// Literal children: the artboard or group child list, whichever is present.
    pub fn children(&self) -> &[RawNode] {
        self.artboard
            .as_ref()
            .or(self.group.as_ref())
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn ux(&self) -> Option<&RawUx> {
        self.meta.as_ref().and_then(|m| m.ux.as_ref())
    }

    /// Alternate state subtrees, in stored order.
    pub fn states(&self) -> &[RawNode] {
        self.ux().map(|ux| ux.states.as_slice()).unwrap_or(&[])
    }

    pub fn fill(&self) -> Option<&RawFill> {
        self.style.as_ref().and_then(|s| s.fill.as_ref())
    }

    pub fn stroke(&self) -> Option<&RawStroke> {
        self.style.as_ref().and_then(|s| s.stroke.as_ref())
    }

    pub fn opacity(&self) -> Option<f64> {
        self.style.as_ref().and_then(|s| s.opacity)
    }

    pub fn blend_mode(&self) -> Option<&str> {
        self.style.as_ref().and_then(|s| s.blend_mode.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContainer {
    #[serde(default, deserialize_with = "lenient_list")]
    pub children: Vec<RawNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawTransform {
    #[serde(default)]
    pub tx: Option<f64>,
    #[serde(default)]
    pub ty: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub ux: Option<RawUx>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUx {
    #[serde(default)]
    pub local_transform: Option<RawTransform>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub aspect_lock: Option<RawSize>,
    #[serde(default, deserialize_with = "deserialize_states")]
    pub states: Vec<RawNode>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ranged_styles: Vec<RawRangedStyle>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub scale_behavior: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawSize {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// States arrive either as a list or as a name-keyed map; both keep stored order.
fn deserialize_states<'de, D>(deserializer: D) -> Result<Vec<RawNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => list_items(other),
    };
    Ok(parse_each(items))
}

/// A list whose malformed elements are dropped one by one. `null` or any
/// non-list value reads as empty, so one bad node never sinks its siblings.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_each(list_items(value)))
}

fn list_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => vec![],
    }
}

fn parse_each<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!(error = %e, "Skipping malformed element");
                None
            }
        })
        .collect()
}

// --- Style ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStyle {
    #[serde(default)]
    pub fill: Option<RawFill>,
    #[serde(default)]
    pub stroke: Option<RawStroke>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub blend_mode: Option<String>,
    #[serde(default)]
    pub font: Option<RawFont>,
    #[serde(default)]
    pub text_attributes: Option<RawTextAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFill {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub color: Option<RawColor>,
    #[serde(default)]
    pub pattern: Option<RawPattern>,
}

impl RawFill {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn is_pattern(&self) -> bool {
        self.kind() == Some("pattern")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPattern {
    #[serde(default)]
    pub meta: Option<RawMeta>,
}

impl RawPattern {
    pub fn uid(&self) -> Option<&str> {
        self.meta.as_ref()?.ux.as_ref()?.uid.as_deref()
    }

    pub fn scale_behavior(&self) -> Option<&str> {
        self.meta.as_ref()?.ux.as_ref()?.scale_behavior.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStroke {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub color: Option<RawColor>,
    #[serde(default)]
    pub width: Option<f64>,
}

impl RawStroke {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

/// A color in either of the container's two encodings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawColor {
    #[serde(default)]
    pub value: Option<RawColorValue>,
    #[serde(default)]
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawColorValue {
    Packed(i64),
    Channels(RawChannels),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawChannels {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFont {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTextAttributes {
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub line_height: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRangedStyle {
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub fill: Option<RawColor>,
    #[serde(default)]
    pub char_spacing: Option<f64>,
    #[serde(default)]
    pub underline: Option<bool>,
    #[serde(default)]
    pub text_transform: Option<String>,
}

// --- Shape / Text payloads ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawShape {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub r: Option<RawRadius>,
    #[serde(default)]
    pub x1: Option<f64>,
    #[serde(default)]
    pub y1: Option<f64>,
    #[serde(default)]
    pub x2: Option<f64>,
    #[serde(default)]
    pub y2: Option<f64>,
    #[serde(default)]
    pub path: Option<String>,
}

impl RawShape {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRadius {
    Uniform(f64),
    PerCorner(Vec<f64>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawText {
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub frame: Option<RawTextFrame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTextFrame {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

// --- Interactions ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionGraph {
    #[serde(default)]
    pub interactions: HashMap<String, Vec<RawInteraction>>,
}

impl InteractionGraph {
    pub fn action_count(&self) -> usize {
        self.interactions.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteraction {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub properties: Option<RawInteractionProperties>,
}

impl RawInteraction {
    pub fn destination(&self) -> Option<&str> {
        self.properties.as_ref()?.destination.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteractionProperties {
    #[serde(default)]
    pub destination: Option<String>,
}
