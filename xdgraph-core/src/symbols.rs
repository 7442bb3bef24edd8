//! Symbolic Reference Resolver
//!
//! A placeholder (`syncRef`) defers to whatever one of its parent's alternate
//! states holds at the same ordinal position. Correspondence is positional,
//! not by identity: if a state's ordering diverges from the primary child
//! list, the wrong element is picked without any signal.

use tracing::debug;

use crate::ir::IrNode;
use crate::normalize::Normalizer;
use crate::raw::RawNode;

/// Ordinal of `placeholder` within the parent's own child list.
///
/// Placeholders are matched by guid; without a guid, by identity.
pub fn placeholder_index(placeholder: &RawNode, parent: &RawNode) -> Option<usize> {
    parent.children().iter().position(|child| {
        child.is_placeholder()
            && match (&child.guid, &placeholder.guid) {
                (Some(a), Some(b)) => a == b,
                _ => std::ptr::eq(child, placeholder),
            }
    })
}

/// First state, in stored order, offering a non-placeholder child at the
/// placeholder's ordinal. Returns the state and the child.
pub fn locate<'a>(placeholder: &RawNode, parent: &'a RawNode) -> Option<(&'a RawNode, &'a RawNode)> {
    let states = parent.states();
    if states.is_empty() {
        return None;
    }
    let index = placeholder_index(placeholder, parent)?;

    states.iter().find_map(|state| {
        state
            .children()
            .get(index)
            .filter(|child| !child.is_placeholder())
            .map(|child| (state, child))
    })
}

/// Normalize the referenced content with its state as structural parent.
/// An unresolved reference contributes no node.
pub fn resolve_placeholder(
    normalizer: &Normalizer<'_>,
    placeholder: &RawNode,
    parent: Option<&RawNode>,
) -> Option<IrNode> {
    let Some((state, child)) = parent.and_then(|p| locate(placeholder, p)) else {
        debug!(guid = ?placeholder.guid, "Placeholder unresolved; dropped");
        return None;
    };
    normalizer.normalize(child, Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertConfig;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    fn rect(name: &str) -> serde_json::Value {
        json!({"type": "shape", "name": name, "shape": {"type": "rect", "width": 1, "height": 1}})
    }

    fn parent_with_states(states: serde_json::Value) -> RawNode {
        node(json!({
            "type": "group",
            "group": {"children": [
                rect("literal"),
                {"type": "syncRef", "guid": "slot-1"}
            ]},
            "meta": {"ux": {"states": states}}
        }))
    }

    #[test]
    fn test_later_state_fills_missing_index() {
        let parent = parent_with_states(json!({
            "A": {"type": "group", "name": "A", "group": {"children": [rect("a0")]}},
            "B": {"type": "group", "name": "B", "group": {"children": [rect("b0"), rect("b1")]}}
        }));
        let placeholder = &parent.children()[1];

        let (state, child) = locate(placeholder, &parent).unwrap();
        assert_eq!(state.name.as_deref(), Some("B"));
        assert_eq!(child.name.as_deref(), Some("b1"));

        let config = ConvertConfig::default();
        let resolved = resolve_placeholder(&Normalizer::new(&config), placeholder, Some(&parent)).unwrap();
        assert_eq!(resolved.common().name, "b1");
    }

    #[test]
    fn test_first_match_wins_in_stored_order() {
        let parent = parent_with_states(json!({
            "zulu": {"type": "group", "group": {"children": [rect("z0"), rect("z1")]}},
            "alpha": {"type": "group", "group": {"children": [rect("a0"), rect("a1")]}}
        }));
        let (_, child) = locate(&parent.children()[1], &parent).unwrap();
        assert_eq!(child.name.as_deref(), Some("z1"));
    }

    #[test]
    fn test_placeholder_in_state_is_skipped() {
        let parent = parent_with_states(json!([
            {"type": "group", "group": {"children": [rect("x0"), {"type": "syncRef", "guid": "slot-1"}]}},
            {"type": "group", "group": {"children": [rect("y0"), rect("y1")]}}
        ]));
        let (_, child) = locate(&parent.children()[1], &parent).unwrap();
        assert_eq!(child.name.as_deref(), Some("y1"));
    }

    #[test]
    fn test_unresolved_yields_nothing() {
        let config = ConvertConfig::default();
        let normalizer = Normalizer::new(&config);

        let stateless = node(json!({"type": "group", "group": {"children": [{"type": "syncRef", "guid": "g"}]}}));
        let placeholder = &stateless.children()[0];
        assert!(resolve_placeholder(&normalizer, placeholder, Some(&stateless)).is_none());
        assert!(resolve_placeholder(&normalizer, placeholder, None).is_none());

        let short = parent_with_states(json!([{"type": "group", "group": {"children": [rect("only")]}}]));
        assert!(resolve_placeholder(&normalizer, &short.children()[1], Some(&short)).is_none());
    }

    #[test]
    fn test_foreign_placeholder_has_no_index() {
        let parent = parent_with_states(json!([]));
        let stranger = node(json!({"type": "syncRef", "guid": "elsewhere"}));
        assert_eq!(placeholder_index(&stranger, &parent), None);
    }

    // Positional correspondence: a reordered state silently supplies a
    // different element than the designer intended.
    #[test]
    fn test_reordered_state_picks_by_position() {
        let parent = parent_with_states(json!([
            {"type": "group", "group": {"children": [rect("icon"), rect("label")]}}
        ]));
        let (_, child) = locate(&parent.children()[1], &parent).unwrap();
        assert_eq!(child.name.as_deref(), Some("label"));

        let reordered = parent_with_states(json!([
            {"type": "group", "group": {"children": [rect("label"), rect("icon")]}}
        ]));
        let (_, child) = locate(&reordered.children()[1], &reordered).unwrap();
        assert_eq!(child.name.as_deref(), Some("icon"));
    }
}
