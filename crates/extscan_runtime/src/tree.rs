//! Immutable parse trees and tree edits.
//!
//! A tree is a flat arena of nodes. Index 0 is the root; every other node
//! records its parent and the root lists its children in source order.
//! Editing never touches a tree another holder can see: callers clone first
//! (trees are cheap to clone relative to a reparse) and edit the copy.

use std::sync::Arc;

use extscan_core::{InputEdit, Point, Symbol, TextPos, TextRange, ERROR_SYMBOL};
use extscan_scanner::ScannerSnapshot;

use crate::language::Language;
use crate::node::Node;
use crate::snapshot::TreeSnapshot;

pub(crate) type NodeIndex = u32;

pub(crate) const ROOT: NodeIndex = 0;

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) symbol: Symbol,
    pub(crate) named: bool,
    pub(crate) extra: bool,
    pub(crate) missing: bool,
    pub(crate) has_changes: bool,
    pub(crate) has_error: bool,
    pub(crate) range: TextRange,
    pub(crate) start_point: Point,
    pub(crate) end_point: Point,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    /// One past the furthest byte the scanner examined to produce this leaf.
    pub(crate) lookahead_end: TextPos,
    /// Scanner state right after this leaf; leaves only.
    pub(crate) scanner_state: Option<ScannerSnapshot>,
}

/// A leaf produced by the parse loop, before it is placed in a tree.
#[derive(Debug, Clone)]
pub(crate) struct Leaf {
    pub(crate) symbol: Symbol,
    pub(crate) range: TextRange,
    pub(crate) start_point: Point,
    pub(crate) end_point: Point,
    pub(crate) lookahead_end: TextPos,
    pub(crate) scanner_state: ScannerSnapshot,
}

/// A parse tree.
#[derive(Debug, Clone)]
pub struct Tree {
    language: Arc<Language>,
    nodes: Vec<NodeData>,
    /// Smallest start byte of the edits applied since the parse.
    changed_from: Option<TextPos>,
}

impl Tree {
    /// Assemble a tree whose root spans `0..end` and holds `leaves`.
    pub(crate) fn from_leaves(
        language: Arc<Language>,
        leaves: Vec<Leaf>,
        end: TextPos,
        end_point: Point,
    ) -> Self {
        let root_symbol = language.root_symbol();
        let mut nodes = Vec::with_capacity(leaves.len() + 1);
        nodes.push(NodeData {
            symbol: root_symbol,
            named: true,
            extra: false,
            missing: false,
            has_changes: false,
            has_error: false,
            range: TextRange::new(0, end),
            start_point: Point::default(),
            end_point,
            parent: None,
            children: Vec::with_capacity(leaves.len()),
            lookahead_end: end,
            scanner_state: None,
        });

        let mut has_error = false;
        for leaf in leaves {
            let metadata = language.symbol_metadata(leaf.symbol);
            let is_error = leaf.symbol == ERROR_SYMBOL;
            has_error |= is_error;
            let index = nodes.len() as NodeIndex;
            nodes.push(NodeData {
                symbol: leaf.symbol,
                named: metadata.map_or(false, |m| m.named),
                extra: metadata.map_or(false, |m| m.extra),
                missing: false,
                has_changes: false,
                has_error: is_error,
                range: leaf.range,
                start_point: leaf.start_point,
                end_point: leaf.end_point,
                parent: Some(ROOT),
                children: Vec::new(),
                lookahead_end: leaf.lookahead_end,
                scanner_state: Some(leaf.scanner_state),
            });
            nodes[ROOT as usize].children.push(index);
        }
        nodes[ROOT as usize].has_error = has_error;

        Self {
            language,
            nodes,
            changed_from: None,
        }
    }

    #[inline]
    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    /// The node spanning the whole input.
    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, ROOT)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether [`edit`](Self::edit) has been applied since the parse.
    pub fn is_edited(&self) -> bool {
        self.changed_from.is_some()
    }

    /// A serializable copy of the whole tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::of(self)
    }

    pub(crate) fn data(&self, index: NodeIndex) -> &NodeData {
        &self.nodes[index as usize]
    }

    pub(crate) fn node(&self, index: NodeIndex) -> Option<Node<'_>> {
        ((index as usize) < self.nodes.len()).then(|| Node::new(self, index))
    }

    /// Shift the positions of this tree to reflect `edit`.
    ///
    /// Nodes whose range touches the edited range are flagged as changed,
    /// along with their ancestors.
    pub fn edit(&mut self, edit: &InputEdit) {
        tracing::debug!(
            start = edit.start_byte,
            old_end = edit.old_end_byte,
            new_end = edit.new_end_byte,
            "edit tree"
        );

        for index in 0..self.nodes.len() {
            let node = &mut self.nodes[index];
            let touched = edit.touches(node.range.pos, node.range.end);

            let (start, start_point) = edit.edit_position(node.range.pos, node.start_point);
            let (end, end_point) = edit.edit_position(node.range.end, node.end_point);
            node.range = TextRange::new(start, end.max(start));
            node.start_point = start_point;
            node.end_point = end_point.max(start_point);
            node.lookahead_end = edit.edit_byte(node.lookahead_end);

            if touched {
                node.has_changes = true;
                let mut parent = node.parent;
                while let Some(p) = parent {
                    let ancestor = &mut self.nodes[p as usize];
                    ancestor.has_changes = true;
                    parent = ancestor.parent;
                }
            }
        }

        self.changed_from = Some(match self.changed_from {
            Some(from) => from.min(edit.start_byte),
            None => edit.start_byte,
        });
    }

    /// Leaves that an incremental reparse can keep as they are.
    ///
    /// A leaf is kept when everything its scanner looked at lies before the
    /// first edit. An unedited tree is assumed to match the new text, end of
    /// input included.
    pub(crate) fn reusable_leaves(&self) -> Vec<Leaf> {
        let limit = self
            .changed_from
            .unwrap_or(self.nodes[ROOT as usize].range.end + 1);
        self.nodes[ROOT as usize]
            .children
            .iter()
            .map(|&index| &self.nodes[index as usize])
            .take_while(|node| node.lookahead_end <= limit && !node.has_changes)
            .map(|node| Leaf {
                symbol: node.symbol,
                range: node.range,
                start_point: node.start_point,
                end_point: node.end_point,
                lookahead_end: node.lookahead_end,
                scanner_state: node.scanner_state.clone().unwrap_or_default(),
            })
            .collect()
    }
}
