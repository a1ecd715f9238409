//! Predicate search over the document tree, constrained to a range

use std::cmp::Ordering;

use crate::model::path::{self, Path};
use crate::model::{Document, Leaf, Node, Point, Range};

/// Which of several nested matches to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every matching node, ancestors before descendants
    #[default]
    All,
    /// Matches with no matching descendant
    Lowest,
}

/// Lazy pre-order walk yielding `(node, path)` pairs.
///
/// Built by [`nodes`]; see there for the traversal rules.
pub struct Nodes<'a, P> {
    stack: Vec<(&'a Node, Path)>,
    span: Option<(Path, Path)>,
    predicate: P,
    mode: Mode,
    pending: Option<(&'a Node, Path)>,
}

impl<'a, P> Nodes<'a, P>
where
    P: FnMut(&Node) -> bool,
{
    fn walk_next(&mut self) -> Option<(&'a Node, Path)> {
        while let Some((node, path)) = self.stack.pop() {
            if let Some((from, to)) = &self.span {
                if path::compare(&path, to) == Ordering::Greater {
                    // Everything still queued comes later in document order
                    self.stack.clear();
                    return None;
                }
                if path::compare(&path, from) == Ordering::Less {
                    continue;
                }
            }
            for (ix, child) in node.children().iter().enumerate().rev() {
                self.stack.push((child, path::child(&path, ix)));
            }
            return Some((node, path));
        }
        None
    }
}

impl<'a, P> Iterator for Nodes<'a, P>
where
    P: FnMut(&Node) -> bool,
{
    type Item = (&'a Node, Path);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((node, path)) = self.walk_next() else {
                return self.pending.take();
            };
            if !(self.predicate)(node) {
                continue;
            }

            match self.mode {
                Mode::All => return Some((node, path)),
                Mode::Lowest => match self.pending.take() {
                    Some((prev, prev_path)) if !path::is_ancestor(&prev_path, &path) => {
                        self.pending = Some((node, path));
                        return Some((prev, prev_path));
                    }
                    // A matching descendant replaces its ancestor
                    _ => self.pending = Some((node, path)),
                },
            }
        }
    }
}

/// Nodes intersecting `at` (the whole document when `None`) that satisfy
/// `predicate`, in document order with ancestors reported before their
/// descendants.
///
/// A node intersects the range when its path lies between the start and end
/// leaf paths, ancestors of either included.
pub fn nodes<'a, P>(
    document: &'a Document,
    at: Option<&Range>,
    mode: Mode,
    predicate: P,
) -> Nodes<'a, P>
where
    P: FnMut(&Node) -> bool,
{
    let stack = document
        .children
        .iter()
        .enumerate()
        .rev()
        .map(|(ix, node)| (node, vec![ix]))
        .collect();
    let span = at.map(|range| {
        let (start, end) = range.edges();
        (start.path.clone(), end.path.clone())
    });

    Nodes {
        stack,
        span,
        predicate,
        mode,
        pending: None,
    }
}

/// First match in document order, i.e. the outermost one
pub fn first_match<'a, P>(
    document: &'a Document,
    at: Option<&Range>,
    predicate: P,
) -> Option<(&'a Node, Path)>
where
    P: FnMut(&Node) -> bool,
{
    nodes(document, at, Mode::All, predicate).next()
}

/// Leaves intersecting `at`, paired with their paths
pub fn leaf_entries<'a>(
    document: &'a Document,
    at: Option<&Range>,
) -> impl Iterator<Item = (&'a Leaf, Path)> + 'a {
    nodes(document, at, Mode::All, Node::is_leaf)
        .filter_map(|(node, path)| node.as_leaf().map(|leaf| (leaf, path)))
}

/// Nearest strict ancestor of `path` satisfying `predicate`
pub fn above<'a, P>(
    document: &'a Document,
    at: &[usize],
    mut predicate: P,
) -> Option<(&'a Node, Path)>
where
    P: FnMut(&Node) -> bool,
{
    (1..at.len()).rev().find_map(|depth| {
        let ancestor = &at[..depth];
        let node = document.node(ancestor)?;
        predicate(node).then(|| (node, ancestor.to_vec()))
    })
}

/// Trim a range whose end hangs at the very start of a following block.
///
/// Selecting to the end of a paragraph with a mouse or shift+down leaves the
/// focus at offset 0 of the next block. Without this the next block would
/// count as selected for activity queries and block transforms.
pub fn unhang(document: &Document, range: &Range) -> Range {
    if range.is_collapsed() {
        return range.clone();
    }
    let (start, end) = range.edges();
    if end.offset != 0 {
        return range.clone();
    }

    let block_path = path::parent(&end.path);
    if block_path.is_empty() || block_path == path::parent(&start.path) {
        return range.clone();
    }
    if document.start(block_path).as_ref() != Some(end) {
        return range.clone();
    }

    let leaves = document.leaf_paths();
    let Some(end_ix) = leaves.iter().position(|p| *p == end.path) else {
        return range.clone();
    };
    let previous = end_ix
        .checked_sub(1)
        .map(|ix| &leaves[ix])
        .filter(|p| path::compare(p, &start.path) != Ordering::Less);

    match previous.and_then(|p| document.leaf(p).map(|leaf| (p, leaf))) {
        Some((prev_path, leaf)) => {
            Range::new(start.clone(), Point::new(prev_path.clone(), leaf.len()))
        }
        None => range.clone(),
    }
}
