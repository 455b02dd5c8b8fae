//! Layout persistence - the serializable tree value
//!
//! `SavedState` is a structural, order-preserving mirror of the layout tree
//! plus the active pane id. Serialization produces the host-facing shape
//! (camelCase keys, `"leaf"`/`"split"` type tags, pane ids as strings);
//! all reading and writing of the value is the host's responsibility.
//!
//! Deserialization is defensive and never errors: a malformed subtree (an
//! unknown node shape, a missing orientation, an empty child sequence, an
//! unparseable pane id) degrades to a single fallback leaf in place, so a
//! corrupt save file loads as a reduced layout instead of failing.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::pane::{PaneId, PaneRegistry};
use crate::tree::{LayoutTree, Node, NodeId, Orientation};

/// A node of the persisted layout value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SavedNode {
    Leaf {
        #[serde(rename = "paneId", serialize_with = "ser_pane_id")]
        pane: PaneId,
    },
    Split {
        orientation: Orientation,
        children: Vec<SavedNode>,
    },
}

/// The persisted layout value: tree plus active pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedState {
    pub root: SavedNode,
    pub active_pane: Option<PaneId>,
}

fn ser_pane_id<S: Serializer>(id: &PaneId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&id.0)
}

impl Serialize for SavedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SavedState", 2)?;
        state.serialize_field("root", &self.root)?;
        match self.active_pane {
            Some(id) => state.serialize_field("activePaneId", &id.0.to_string())?,
            None => state.serialize_field("activePaneId", &Option::<String>::None)?,
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for SavedState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SavedState::from_value(&value))
    }
}

impl<'de> Deserialize<'de> for SavedNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SavedNode::from_value(Some(&value)))
    }
}

impl SavedState {
    pub fn leaf(pane: PaneId) -> Self {
        Self {
            root: SavedNode::Leaf { pane },
            active_pane: Some(pane),
        }
    }

    /// Defensive structural read; malformed pieces degrade locally
    pub fn from_value(value: &Value) -> Self {
        let root = SavedNode::from_value(value.get("root"));
        let active_pane = value.get("activePaneId").and_then(parse_pane_id);
        Self { root, active_pane }
    }
}

impl SavedNode {
    /// Substitute for any subtree that cannot be read
    fn fallback() -> Self {
        SavedNode::Leaf { pane: PaneId(0) }
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(object) = value.and_then(Value::as_object) else {
            return Self::fallback();
        };
        match object.get("type").and_then(Value::as_str) {
            Some("leaf") => match object.get("paneId").and_then(parse_pane_id) {
                Some(pane) => SavedNode::Leaf { pane },
                None => Self::fallback(),
            },
            Some("split") => {
                let orientation = match object.get("orientation").and_then(Value::as_str) {
                    Some("horizontal") => Orientation::Horizontal,
                    Some("vertical") => Orientation::Vertical,
                    _ => return Self::fallback(),
                };
                let children = match object.get("children").and_then(Value::as_array) {
                    Some(children) if !children.is_empty() => children,
                    _ => return Self::fallback(),
                };
                SavedNode::Split {
                    orientation,
                    children: children
                        .iter()
                        .map(|child| SavedNode::from_value(Some(child)))
                        .collect(),
                }
            }
            _ => Self::fallback(),
        }
    }

    /// Largest pane id mentioned anywhere in the subtree
    pub(crate) fn max_pane_id(&self) -> u64 {
        match self {
            SavedNode::Leaf { pane } => pane.0,
            SavedNode::Split { children, .. } => {
                children.iter().map(SavedNode::max_pane_id).max().unwrap_or(0)
            }
        }
    }
}

fn parse_pane_id(value: &Value) -> Option<PaneId> {
    match value {
        Value::String(s) => s.parse().ok().map(PaneId),
        // older saves wrote ids as raw numbers
        Value::Number(n) => n.as_u64().map(PaneId),
        _ => None,
    }
}

/// Mirror the live tree into the persisted shape
pub(crate) fn snapshot(tree: &LayoutTree, node: NodeId) -> SavedNode {
    match tree.node(node) {
        Some(Node::Leaf { pane }) => SavedNode::Leaf { pane: *pane },
        Some(Node::Split {
            orientation,
            children,
        }) => SavedNode::Split {
            orientation: *orientation,
            children: children.iter().map(|c| snapshot(tree, *c)).collect(),
        },
        None => SavedNode::fallback(),
    }
}

/// Instantiate a saved subtree, registering its panes
///
/// Pane ids are reused as found; a duplicate id (possible in a corrupted
/// save) is re-keyed with a fresh one so each pane stays unique.
pub(crate) fn rebuild(saved: &SavedNode, panes: &mut PaneRegistry, tree: &mut LayoutTree) -> NodeId {
    match saved {
        SavedNode::Leaf { pane } => {
            let id = if panes.create_with_id(*pane) {
                *pane
            } else {
                tracing::debug!(target: "persist", pane = pane.0, "duplicate pane id re-keyed");
                panes.create()
            };
            tree.alloc_leaf(id)
        }
        SavedNode::Split {
            orientation,
            children,
        } => {
            let nodes: Vec<NodeId> = children
                .iter()
                .map(|child| rebuild(child, panes, tree))
                .collect();
            tree.alloc_split(*orientation, nodes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let state = SavedState {
            root: SavedNode::Split {
                orientation: Orientation::Horizontal,
                children: vec![
                    SavedNode::Leaf { pane: PaneId(1) },
                    SavedNode::Leaf { pane: PaneId(2) },
                ],
            },
            active_pane: Some(PaneId(2)),
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "root": {
                    "type": "split",
                    "orientation": "horizontal",
                    "children": [
                        { "type": "leaf", "paneId": "1" },
                        { "type": "leaf", "paneId": "2" },
                    ],
                },
                "activePaneId": "2",
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let state = SavedState {
            root: SavedNode::Split {
                orientation: Orientation::Vertical,
                children: vec![
                    SavedNode::Leaf { pane: PaneId(3) },
                    SavedNode::Leaf { pane: PaneId(7) },
                ],
            },
            active_pane: None,
        };
        let text = serde_json::to_string(&state).unwrap();
        let back: SavedState = serde_json::from_str(&text).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_unknown_node_shape_degrades_to_leaf() {
        let state = SavedState::from_value(&json!({
            "root": { "type": "carousel", "children": [] },
            "activePaneId": "1",
        }));
        assert!(matches!(state.root, SavedNode::Leaf { .. }));
    }

    #[test]
    fn test_missing_orientation_degrades_subtree() {
        let state = SavedState::from_value(&json!({
            "root": {
                "type": "split",
                "orientation": "horizontal",
                "children": [
                    { "type": "leaf", "paneId": "1" },
                    { "type": "split", "children": [{ "type": "leaf", "paneId": "2" }] },
                ],
            },
        }));
        match state.root {
            SavedNode::Split { children, .. } => {
                assert_eq!(children[0], SavedNode::Leaf { pane: PaneId(1) });
                // the garbled inner split collapsed to a fallback leaf
                assert!(matches!(children[1], SavedNode::Leaf { .. }));
            }
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_children_degrade_to_leaf() {
        let state = SavedState::from_value(&json!({
            "root": { "type": "split", "orientation": "vertical", "children": [] },
        }));
        assert!(matches!(state.root, SavedNode::Leaf { .. }));
    }

    #[test]
    fn test_numeric_pane_ids_accepted() {
        let state = SavedState::from_value(&json!({
            "root": { "type": "leaf", "paneId": 4 },
            "activePaneId": 4,
        }));
        assert_eq!(state.root, SavedNode::Leaf { pane: PaneId(4) });
        assert_eq!(state.active_pane, Some(PaneId(4)));
    }

    #[test]
    fn test_garbage_is_a_single_pane_layout() {
        let state = SavedState::from_value(&json!("not even an object"));
        assert!(matches!(state.root, SavedNode::Leaf { .. }));
        assert_eq!(state.active_pane, None);
    }
}
