//! Read-only views into a [`Tree`].

use std::fmt;

use extscan_core::{Point, Symbol, TextPos, TextRange, ERROR_SYMBOL};

use crate::tree::{NodeData, NodeIndex, Tree};

/// A node of a tree. Copyable and valid for as long as the tree is borrowed.
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree Tree,
    index: NodeIndex,
}

impl<'tree> Node<'tree> {
    pub(crate) fn new(tree: &'tree Tree, index: NodeIndex) -> Self {
        Self { tree, index }
    }

    #[inline]
    fn data(&self) -> &'tree NodeData {
        self.tree.data(self.index)
    }

    #[inline]
    fn at(&self, index: NodeIndex) -> Node<'tree> {
        Node::new(self.tree, index)
    }

    /// Position of this node in the tree's arena.
    #[inline]
    pub fn id(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn tree(&self) -> &'tree Tree {
        self.tree
    }

    pub fn kind(&self) -> &'static str {
        self.tree.language().symbol_name(self.data().symbol)
    }

    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.data().symbol
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    #[inline]
    pub fn is_extra(&self) -> bool {
        self.data().extra
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data().missing
    }

    /// Whether this node is a syntax error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.data().symbol == ERROR_SYMBOL
    }

    /// Whether this node is or contains a syntax error.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }

    /// Whether an edit touched this node since the parse.
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.data().has_changes
    }

    #[inline]
    pub fn start_byte(&self) -> TextPos {
        self.data().range.pos
    }

    #[inline]
    pub fn end_byte(&self) -> TextPos {
        self.data().range.end
    }

    #[inline]
    pub fn byte_range(&self) -> TextRange {
        self.data().range
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.data().start_point
    }

    #[inline]
    pub fn end_point(&self) -> Point {
        self.data().end_point
    }

    pub fn parent(&self) -> Option<Node<'tree>> {
        self.data().parent.map(|parent| self.at(parent))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'tree>> {
        self.data()
            .children
            .get(index)
            .map(|&child| self.at(child))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&child| Node::new(tree, child))
    }

    pub fn named_child_count(&self) -> usize {
        self.children().filter(Node::is_named).count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'tree>> {
        self.children().filter(Node::is_named).nth(index)
    }

    /// The siblings of this node, itself included, and its place among them.
    fn siblings(&self) -> Option<(&'tree [NodeIndex], usize)> {
        let parent = self.tree.data(self.data().parent?);
        let position = parent
            .children
            .iter()
            .position(|&child| child == self.index)?;
        Some((&parent.children, position))
    }

    pub fn next_sibling(&self) -> Option<Node<'tree>> {
        let (siblings, position) = self.siblings()?;
        siblings.get(position + 1).map(|&index| self.at(index))
    }

    pub fn prev_sibling(&self) -> Option<Node<'tree>> {
        let (siblings, position) = self.siblings()?;
        let previous = position.checked_sub(1)?;
        Some(self.at(siblings[previous]))
    }

    pub fn next_named_sibling(&self) -> Option<Node<'tree>> {
        let (siblings, position) = self.siblings()?;
        siblings[position + 1..]
            .iter()
            .map(|&index| self.at(index))
            .find(Node::is_named)
    }

    pub fn prev_named_sibling(&self) -> Option<Node<'tree>> {
        let (siblings, position) = self.siblings()?;
        siblings[..position]
            .iter()
            .rev()
            .map(|&index| self.at(index))
            .find(Node::is_named)
    }

    /// Number of siblings before this node.
    pub fn index(&self) -> usize {
        self.siblings().map_or(0, |(_, position)| position)
    }

    /// Number of named siblings before this node.
    pub fn named_index(&self) -> usize {
        self.siblings().map_or(0, |(siblings, position)| {
            siblings[..position]
                .iter()
                .filter(|&&index| self.tree.data(index).named)
                .count()
        })
    }

    /// [`named_index`](Self::named_index) capped at 2, for callers that only
    /// tell apart "first", "second" and "later".
    pub fn bounded_named_index(&self) -> usize {
        let mut count = 0;
        let mut previous = self.prev_named_sibling();
        while let Some(node) = previous {
            if count >= 2 {
                break;
            }
            count += 1;
            previous = node.prev_named_sibling();
        }
        count
    }

    /// The smallest node within this one that spans `start..end`.
    pub fn descendant_for_point_range(&self, start: Point, end: Point) -> Option<Node<'tree>> {
        let mut node = *self;
        'descend: loop {
            for child in node.children() {
                let child_end = child.end_point();
                // The child must reach the end of the range and pass its start.
                if child_end < end || child_end <= start {
                    continue;
                }
                if start < child.start_point() {
                    break;
                }
                node = child;
                continue 'descend;
            }
            return Some(node);
        }
    }

    /// Render the named nodes under this one as an S-expression.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        if self.is_missing() {
            out.push_str("MISSING ");
        }
        out.push_str(self.kind());
        for child in self.children().filter(Node::is_named) {
            out.push(' ');
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Node {:?} {}..{} {:?} - {:?}}}",
            self.kind(),
            self.start_byte(),
            self.end_byte(),
            self.start_point(),
            self.end_point()
        )
    }
}
