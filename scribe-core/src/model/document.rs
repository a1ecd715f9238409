use serde::{Deserialize, Serialize};

use super::path::{self, Path};
use super::{Block, BlockType, Leaf, Node, Point, Range};
use crate::error::{FormatError, FormatResult};

/// An ordered sequence of top-level blocks.
///
/// Serializes as a bare JSON array, the same shape the browser editor uses
/// for its value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self::new(blocks.into_iter().map(Node::Block).collect())
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for &ix in rest {
            node = node.children().get(ix)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for &ix in rest {
            node = match node {
                Node::Block(block) => block.children.get_mut(ix)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    pub fn leaf(&self, path: &[usize]) -> Option<&Leaf> {
        self.node(path).and_then(Node::as_leaf)
    }

    pub fn block(&self, path: &[usize]) -> Option<&Block> {
        self.node(path).and_then(Node::as_block)
    }

    /// Children of the node at `parent`; the empty path is the root
    pub fn children_of(&self, parent: &[usize]) -> Option<&Vec<Node>> {
        if parent.is_empty() {
            return Some(&self.children);
        }
        match self.node(parent)? {
            Node::Block(block) => Some(&block.children),
            Node::Leaf(_) => None,
        }
    }

    pub fn children_of_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        if parent.is_empty() {
            return Some(&mut self.children);
        }
        match self.node_mut(parent)? {
            Node::Block(block) => Some(&mut block.children),
            Node::Leaf(_) => None,
        }
    }

    /// Paths of every leaf in document order
    pub fn leaf_paths(&self) -> Vec<Path> {
        fn walk(nodes: &[Node], prefix: &mut Path, out: &mut Vec<Path>) {
            for (ix, node) in nodes.iter().enumerate() {
                prefix.push(ix);
                match node {
                    Node::Leaf(_) => out.push(prefix.clone()),
                    Node::Block(block) => walk(&block.children, prefix, out),
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.children, &mut Vec::new(), &mut out);
        out
    }

    /// First position inside the node at `path`
    pub fn start(&self, path: &[usize]) -> Option<Point> {
        let mut path = path.to_vec();
        let mut node = self.node(&path)?;
        while let Node::Block(block) = node {
            node = block.children.first()?;
            path.push(0);
        }
        Some(Point::new(path, 0))
    }

    /// Last position inside the node at `path`
    pub fn end(&self, path: &[usize]) -> Option<Point> {
        let mut path = path.to_vec();
        let mut node = self.node(&path)?;
        loop {
            match node {
                Node::Block(block) => {
                    let last = block.children.len().checked_sub(1)?;
                    node = &block.children[last];
                    path.push(last);
                }
                Node::Leaf(leaf) => return Some(Point::new(path, leaf.len())),
            }
        }
    }

    /// A point is live when it names a leaf and sits on a char boundary
    pub fn validate_point(&self, point: &Point) -> FormatResult<()> {
        match self.leaf(&point.path) {
            Some(leaf) if leaf.text.is_char_boundary(point.offset) => Ok(()),
            _ => Err(FormatError::StaleRange {
                point: point.clone(),
            }),
        }
    }

    pub fn validate_range(&self, range: &Range) -> FormatResult<()> {
        self.validate_point(&range.anchor)?;
        self.validate_point(&range.focus)
    }

    /// Structural invariants every completed command must leave intact
    pub fn check_invariants(&self) -> FormatResult<()> {
        fn check_block(block: &Block, path: &[usize]) -> FormatResult<()> {
            if block.children.is_empty() {
                return Err(FormatError::InvariantViolation(format!(
                    "{} at {path:?} has no children",
                    block.block_type
                )));
            }
            let leaves = block.children.iter().filter(|n| n.is_leaf()).count();
            if leaves != 0 && leaves != block.children.len() {
                return Err(FormatError::InvariantViolation(format!(
                    "{} at {path:?} mixes leaves and blocks",
                    block.block_type
                )));
            }
            if leaves != 0 && block.block_type.is_list() {
                return Err(FormatError::InvariantViolation(format!(
                    "{} at {path:?} holds text directly",
                    block.block_type
                )));
            }
            for (ix, node) in block.children.iter().enumerate() {
                let child_path = path::child(path, ix);
                if let Node::Block(child) = node {
                    if block.block_type.is_list() && child.block_type != BlockType::ListItem {
                        return Err(FormatError::InvariantViolation(format!(
                            "{} at {path:?} contains a {} child",
                            block.block_type, child.block_type
                        )));
                    }
                    check_block(child, &child_path)?;
                }
            }
            Ok(())
        }

        for (ix, node) in self.children.iter().enumerate() {
            match node {
                Node::Block(block) => check_block(block, &[ix])?,
                Node::Leaf(_) => {
                    return Err(FormatError::InvariantViolation(format!(
                        "top-level node {ix} is a leaf"
                    )))
                }
            }
        }
        Ok(())
    }

    /// Plain text of every block, one line per text block
    pub fn plain_text(&self) -> String {
        fn walk(nodes: &[Node], lines: &mut Vec<String>) {
            for node in nodes {
                if let Node::Block(block) = node {
                    if block.is_text_block() {
                        lines.push(node.text());
                    } else {
                        walk(&block.children, lines);
                    }
                }
            }
        }

        let mut lines = Vec::new();
        walk(&self.children, &mut lines);
        lines.join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}
