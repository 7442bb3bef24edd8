//! Geometry Resolver
//!
//! Position and dimension resolution per node kind, plus an approximate path
//! bounding box.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{PathBounds, Point, Size};
use crate::raw::{RawNode, RawRadius, RawShape, RawTransform};

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("static pattern"));

/// Parent-relative offset. The local transform wins over the global one;
/// the global transform would double-count ancestor offsets.
pub fn resolve_position(node: &RawNode) -> Point {
    let local = node.ux().and_then(|ux| ux.local_transform.as_ref());
    match local.or(node.transform.as_ref()) {
        Some(t) => offset(t),
        None => Point::ORIGIN,
    }
}

fn offset(t: &RawTransform) -> Point {
    Point {
        x: t.tx.unwrap_or(0.0),
        y: t.ty.unwrap_or(0.0),
    }
}

pub fn resolve_dimensions(node: &RawNode) -> Size {
    if let Some(frame) = node.text.as_ref().and_then(|t| t.frame.as_ref()) {
        return Size {
            width: frame.width.filter(|w| *w != 0.0),
            height: frame.height.filter(|h| *h != 0.0),
        };
    }

    if let Some(shape) = node.shape.as_ref() {
        match shape.kind() {
            Some("rect") => {
                return Size {
                    width: shape.width,
                    height: shape.height,
                }
            }
            Some("circle") => {
                let diameter = circle_radius(shape).map(|r| r * 2.0);
                return Size {
                    width: diameter,
                    height: diameter,
                };
            }
            Some("line") => {
                let width = (shape.x2.unwrap_or(0.0) - shape.x1.unwrap_or(0.0)).abs();
                let stroke = node.stroke().and_then(|s| s.width).filter(|w| *w != 0.0).unwrap_or(1.0);
                return Size::new(width, stroke.max(1.0));
            }
            Some("compound") => {
                if let Some(size) = metadata_size(node) {
                    return size;
                }
                let bounds = compute_path_bounds(shape.path.as_deref().unwrap_or(""));
                return Size::new(bounds.width(), bounds.height());
            }
            _ => {}
        }
    }

    if let Some(size) = metadata_size(node) {
        return size;
    }

    node.ux()
        .and_then(|ux| ux.aspect_lock)
        .map(|lock| Size {
            width: lock.width,
            height: lock.height,
        })
        .unwrap_or_default()
}

fn metadata_size(node: &RawNode) -> Option<Size> {
    let ux = node.ux()?;
    match (ux.width, ux.height) {
        (Some(w), Some(h)) if w != 0.0 && h != 0.0 => Some(Size::new(w, h)),
        _ => None,
    }
}

pub fn circle_radius(shape: &RawShape) -> Option<f64> {
    match shape.r.as_ref()? {
        RawRadius::Uniform(r) => Some(*r),
        RawRadius::PerCorner(_) => None,
    }
}

/// Samples every numeric literal in emission order as consecutive (x, y)
/// pairs. Not curve-aware: control points count as samples. A trailing
/// unpaired literal is ignored; no pair at all yields the zero box.
pub fn compute_path_bounds(path: &str) -> PathBounds {
    let numbers: Vec<f64> = NUMBER
        .find_iter(path)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    let mut pairs = numbers
        .chunks_exact(2)
        .map(|p| (p[0], p[1]))
        .filter(|(x, y)| x.is_finite() && y.is_finite());

    let Some((x0, y0)) = pairs.next() else {
        return PathBounds::default();
    };

    pairs.fold(
        PathBounds {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        },
        |b, (x, y)| PathBounds {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        },
    )
}
