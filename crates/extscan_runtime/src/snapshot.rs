//! Serializable copies of trees, for JSON output and golden tests.

use extscan_core::{Point, Symbol, TextPos};
use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub kind: String,
    pub symbol: Symbol,
    pub named: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub extra: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_error: bool,
    pub start_byte: TextPos,
    pub end_byte: TextPos,
    pub start_point: Point,
    pub end_point: Point,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn of(node: Node<'_>) -> Self {
        Self {
            kind: node.kind().to_string(),
            symbol: node.symbol(),
            named: node.is_named(),
            extra: node.is_extra(),
            has_error: node.has_error(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_point: node.start_point(),
            end_point: node.end_point(),
            children: node.children().map(NodeSnapshot::of).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub language: String,
    pub root: NodeSnapshot,
}

impl TreeSnapshot {
    pub fn of(tree: &Tree) -> Self {
        Self {
            language: tree.language().name().to_string(),
            root: NodeSnapshot::of(tree.root_node()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
