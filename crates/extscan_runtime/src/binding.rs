//! Handle-based access to parsers, trees and nodes.
//!
//! Hosts that cannot hold Rust references (foreign runtimes, C callers, a
//! garbage-collected object model) work through [`Session`] with plain `Copy`
//! handles. Handles own nothing: dropping or finalizing one never frees a
//! tree. A tree lives until [`Session::delete_tree`] is called for it, after
//! which every handle into it, node handles included, resolves to
//! [`BindingError::StaleTree`] instead of dangling.

use std::fmt;
use std::sync::Arc;

use extscan_core::{InputEdit, Point, Symbol, TextPos};
use extscan_scanner::ReadSource;

use crate::error::BindingError;
use crate::language::Language;
use crate::node::Node;
use crate::parser::Parser;
use crate::tree::{NodeIndex, Tree};

/// Slot index plus the generation the slot had when the handle was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SlotKey {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserHandle(SlotKey);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeHandle(SlotKey);

impl fmt::Display for ParserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index, self.0.generation)
    }
}

impl fmt::Display for TreeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index, self.0.generation)
    }
}

const NULL_NODE: NodeIndex = NodeIndex::MAX;

/// A node of a live tree, or the null node.
///
/// The null node stands for "no such node": navigation that finds nothing
/// returns it, and it is distinguishable at every accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    tree: TreeHandle,
    index: NodeIndex,
}

impl NodeHandle {
    fn null(tree: TreeHandle) -> Self {
        Self {
            tree,
            index: NULL_NODE,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.index == NULL_NODE
    }

    /// The tree this node belongs to.
    #[inline]
    pub fn tree(&self) -> TreeHandle {
        self.tree
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slots; freed slots are reused with a bumped generation.
struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> SlotTable<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, value: T) -> SlotKey {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        Some(value)
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }
}

/// Owns every parser and tree a host has created.
pub struct Session {
    parsers: SlotTable<Parser>,
    trees: SlotTable<Tree>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            parsers: SlotTable::new(),
            trees: SlotTable::new(),
        }
    }

    /// Number of trees not yet deleted.
    pub fn live_trees(&self) -> usize {
        self.trees.len()
    }

    // ── Parsers ────────────────────────────────────────────────────────────

    pub fn new_parser(&mut self, language: Arc<Language>) -> ParserHandle {
        ParserHandle(self.parsers.insert(Parser::new(language)))
    }

    pub fn delete_parser(&mut self, parser: ParserHandle) -> Result<(), BindingError> {
        self.parsers
            .remove(parser.0)
            .map(drop)
            .ok_or(BindingError::UnknownParser(parser))
    }

    pub fn parser_mut(&mut self, parser: ParserHandle) -> Result<&mut Parser, BindingError> {
        self.parsers
            .get_mut(parser.0)
            .ok_or(BindingError::UnknownParser(parser))
    }

    // ── Trees ──────────────────────────────────────────────────────────────

    /// Parse input pulled chunk by chunk from `read`, optionally reusing an
    /// edited `old_tree`. The old tree stays live.
    pub fn parse(
        &mut self,
        parser: ParserHandle,
        old_tree: Option<TreeHandle>,
        read: &mut dyn ReadSource,
    ) -> Result<TreeHandle, BindingError> {
        let old = match old_tree {
            Some(handle) => Some(
                self.trees
                    .get(handle.0)
                    .ok_or(BindingError::StaleTree(handle))?,
            ),
            None => None,
        };
        let parser = self
            .parsers
            .get_mut(parser.0)
            .ok_or(BindingError::UnknownParser(parser))?;
        let tree = parser.parse_with(read, old);
        Ok(TreeHandle(self.trees.insert(tree)))
    }

    /// Parse a complete in-memory buffer.
    pub fn parse_string(
        &mut self,
        parser: ParserHandle,
        source: &[u8],
    ) -> Result<TreeHandle, BindingError> {
        let tree = self.parser_mut(parser)?.parse_string(source, None);
        Ok(TreeHandle(self.trees.insert(tree)))
    }

    /// Free a tree. Nodes of other trees are unaffected; handles into this
    /// one become stale.
    pub fn delete_tree(&mut self, tree: TreeHandle) -> Result<(), BindingError> {
        self.trees
            .remove(tree.0)
            .ok_or(BindingError::StaleTree(tree))?;
        tracing::debug!(tree = %tree, "delete tree");
        Ok(())
    }

    /// Apply `edit` to a copy of `tree` and return the copy.
    pub fn edit_tree(
        &mut self,
        tree: TreeHandle,
        edit: &InputEdit,
    ) -> Result<TreeHandle, BindingError> {
        let mut copy = self.tree(tree)?.clone();
        copy.edit(edit);
        Ok(TreeHandle(self.trees.insert(copy)))
    }

    pub fn tree(&self, tree: TreeHandle) -> Result<&Tree, BindingError> {
        self.trees.get(tree.0).ok_or(BindingError::StaleTree(tree))
    }

    pub fn root_node(&self, tree: TreeHandle) -> Result<NodeHandle, BindingError> {
        let root = self.tree(tree)?.root_node();
        Ok(NodeHandle {
            tree,
            index: root.id(),
        })
    }

    // ── Nodes ──────────────────────────────────────────────────────────────

    /// Resolve a handle to a native node view.
    pub fn node(&self, node: NodeHandle) -> Result<Node<'_>, BindingError> {
        let tree = self.tree(node.tree)?;
        if node.is_null() {
            return Err(BindingError::NullNode);
        }
        tree.node(node.index).ok_or(BindingError::NullNode)
    }

    fn read<T>(&self, node: NodeHandle, f: impl FnOnce(Node<'_>) -> T) -> Result<T, BindingError> {
        self.node(node).map(f)
    }

    /// Step from `node` with `f`. Nothing found gives the null handle; a null
    /// `node` is an error like for any other accessor.
    fn navigate(
        &self,
        node: NodeHandle,
        f: impl FnOnce(Node<'_>) -> Option<Node<'_>>,
    ) -> Result<NodeHandle, BindingError> {
        let found = f(self.node(node)?);
        Ok(found.map_or(NodeHandle::null(node.tree), |found| NodeHandle {
            tree: node.tree,
            index: found.id(),
        }))
    }

    /// Whether `node` is the null node. Fails only when its tree was deleted.
    pub fn is_null(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.tree(node.tree)?;
        Ok(node.is_null())
    }

    pub fn node_string(&self, node: NodeHandle) -> Result<String, BindingError> {
        self.read(node, |n| n.to_sexp())
    }

    pub fn node_type(&self, node: NodeHandle) -> Result<&'static str, BindingError> {
        self.read(node, |n| n.kind())
    }

    pub fn node_symbol(&self, node: NodeHandle) -> Result<Symbol, BindingError> {
        self.read(node, |n| n.symbol())
    }

    pub fn is_error(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.is_error())
    }

    pub fn has_changes(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.has_changes())
    }

    pub fn has_error(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.has_error())
    }

    pub fn is_missing(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.is_missing())
    }

    pub fn is_named(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.is_named())
    }

    pub fn is_extra(&self, node: NodeHandle) -> Result<bool, BindingError> {
        self.read(node, |n| n.is_extra())
    }

    pub fn start_byte(&self, node: NodeHandle) -> Result<TextPos, BindingError> {
        self.read(node, |n| n.start_byte())
    }

    pub fn end_byte(&self, node: NodeHandle) -> Result<TextPos, BindingError> {
        self.read(node, |n| n.end_byte())
    }

    pub fn start_point(&self, node: NodeHandle) -> Result<Point, BindingError> {
        self.read(node, |n| n.start_point())
    }

    pub fn end_point(&self, node: NodeHandle) -> Result<Point, BindingError> {
        self.read(node, |n| n.end_point())
    }

    pub fn child_count(&self, node: NodeHandle) -> Result<usize, BindingError> {
        self.read(node, |n| n.child_count())
    }

    pub fn named_child_count(&self, node: NodeHandle) -> Result<usize, BindingError> {
        self.read(node, |n| n.named_child_count())
    }

    pub fn child(&self, node: NodeHandle, index: usize) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.child(index))
    }

    pub fn named_child(&self, node: NodeHandle, index: usize) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.named_child(index))
    }

    pub fn next_sibling(&self, node: NodeHandle) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.next_sibling())
    }

    pub fn prev_sibling(&self, node: NodeHandle) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.prev_sibling())
    }

    pub fn parent(&self, node: NodeHandle) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.parent())
    }

    pub fn descendant_for_point_range(
        &self,
        node: NodeHandle,
        start: Point,
        end: Point,
    ) -> Result<NodeHandle, BindingError> {
        self.navigate(node, |n| n.descendant_for_point_range(start, end))
    }

    pub fn index(&self, node: NodeHandle) -> Result<usize, BindingError> {
        self.read(node, |n| n.index())
    }

    pub fn named_index(&self, node: NodeHandle) -> Result<usize, BindingError> {
        self.read(node, |n| n.named_index())
    }

    pub fn bounded_named_index(&self, node: NodeHandle) -> Result<usize, BindingError> {
        self.read(node, |n| n.bounded_named_index())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
