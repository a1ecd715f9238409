//! Tree transform primitives: unwrap, set, wrap.
//!
//! Each primitive validates its operative range, mutates the editor's
//! document in place, remaps the editor's selection so it keeps pointing at
//! the same text, and returns the operative range remapped the same way so
//! callers can chain primitives.
//!
//! Block-level transforms never split or merge leaves, so positions are
//! tracked by leaf ordinal (index in document order) plus offset and turned
//! back into paths afterwards. Leaf-level edits (`set_nodes` with `split`)
//! move positions explicitly as leaves are split and merged.

use std::collections::BTreeMap;

use tracing::trace;

use crate::editor::Editor;
use crate::error::{FormatError, FormatResult};
use crate::matcher::{nodes, Mode};
use crate::model::path::{self, Path};
use crate::model::{Alignment, Block, BlockType, Leaf, MarkType, Node, Point, Range};

/// Partial property set merged into matched nodes.
///
/// Block fields use `None` for "leave alone"; the `Option` fields use
/// `Some(None)` to remove the property. `marks` maps a mark to whether it is
/// added (`true`) or removed (`false`) on matched leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub block_type: Option<BlockType>,
    pub align: Option<Option<Alignment>>,
    pub checked: Option<Option<bool>>,
    pub marks: BTreeMap<MarkType, bool>,
}

impl Patch {
    pub fn block_type(block_type: BlockType) -> Self {
        Self {
            block_type: Some(block_type),
            ..Self::default()
        }
    }

    pub fn align(align: Option<Alignment>) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }

    pub fn checked(checked: Option<bool>) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn add_mark(mark: MarkType) -> Self {
        Self {
            marks: BTreeMap::from([(mark, true)]),
            ..Self::default()
        }
    }

    pub fn remove_mark(mark: MarkType) -> Self {
        Self {
            marks: BTreeMap::from([(mark, false)]),
            ..Self::default()
        }
    }

    fn apply_block(&self, block: &mut Block) {
        if let Some(block_type) = self.block_type {
            block.block_type = block_type;
        }
        if let Some(align) = self.align {
            block.align = align;
        }
        if let Some(checked) = self.checked {
            block.checked = checked;
        }
    }

    fn apply_leaf(&self, leaf: &mut Leaf) {
        for (&mark, &on) in &self.marks {
            if on {
                leaf.marks.insert(mark);
            } else {
                leaf.marks.remove(&mark);
            }
        }
    }
}

/// Matching behaviour shared by the primitives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub mode: Mode,
    /// Split partially covered nodes at the range edges first
    pub split: bool,
}

impl TransformOptions {
    pub fn mode(mode: Mode) -> Self {
        Self { mode, split: false }
    }

    pub fn split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }
}

/// Remove every matched block, promoting its children into its place.
///
/// With `split`, only the children intersecting `at` are promoted; leading
/// and trailing children stay behind in copies of the removed block.
pub fn unwrap_nodes<P>(
    editor: &mut Editor,
    at: &Range,
    options: TransformOptions,
    mut predicate: P,
) -> FormatResult<Range>
where
    P: FnMut(&Node) -> bool,
{
    editor.document.validate_range(at)?;
    let at = at.forward();
    let tracked = Tracked::capture(editor, &at)?;

    let targets: Vec<Path> = nodes(&editor.document, Some(&at), options.mode, |n| {
        n.is_block() && predicate(n)
    })
    .map(|(_, p)| p)
    .collect();

    // Last first: earlier targets and ancestors keep their paths
    for target in targets.iter().rev() {
        let leaves = editor.document.leaf_paths();
        let block = editor
            .document
            .block(target)
            .cloned()
            .ok_or_else(|| invalid_path(target))?;

        let (first, last) = if options.split {
            match covered_children(&leaves, target, tracked.at) {
                Some(span) => span,
                None => continue,
            }
        } else {
            (0, block.children.len().saturating_sub(1))
        };

        let shell = block.with_children(Vec::new());
        let mut children = block.children;
        let after = children.split_off((last + 1).min(children.len()));
        let covered = children.split_off(first.min(children.len()));
        let before = children;

        let mut replacement = Vec::with_capacity(covered.len() + 2);
        if !before.is_empty() {
            replacement.push(Node::Block(shell.with_children(before)));
        }
        replacement.extend(covered);
        if !after.is_empty() {
            replacement.push(Node::Block(shell.with_children(after)));
        }

        trace!(path = ?target, block_type = %shell.block_type, first, last, "unwrap");
        let (parent, index) = split_path(target)?;
        let siblings = editor
            .document
            .children_of_mut(parent)
            .ok_or_else(|| invalid_path(parent))?;
        siblings.splice(index..=index, replacement);
    }

    tracked.restore(editor)
}

/// Merge `patch` into every matched node.
///
/// Block fields apply to matched blocks and mark edits to matched leaves.
/// With `split`, leaves partially covered by `at` are split at its edges
/// first, and for an expanded range leaves the range only touches at an
/// edge are left alone. Adjacent leaves that end up with identical marks are
/// merged back together afterwards.
pub fn set_nodes<P>(
    editor: &mut Editor,
    at: &Range,
    patch: &Patch,
    options: TransformOptions,
    mut predicate: P,
) -> FormatResult<Range>
where
    P: FnMut(&Node) -> bool,
{
    editor.document.validate_range(at)?;
    let mut at = at.forward();
    if options.split && !at.is_collapsed() {
        at = split_leaves_at_edges(editor, &at)?;
    }

    let expanded = !at.is_collapsed();
    let targets: Vec<Path> = nodes(&editor.document, Some(&at), options.mode, &mut predicate)
        .filter(|(node, path)| match node {
            Node::Leaf(leaf) => !expanded || covers_leaf(&at, path, leaf),
            Node::Block(_) => true,
        })
        .map(|(_, p)| p)
        .collect();

    let mut touched_blocks: Vec<Path> = Vec::new();
    for target in &targets {
        match editor.document.node_mut(target) {
            Some(Node::Block(block)) => patch.apply_block(block),
            Some(Node::Leaf(leaf)) => {
                patch.apply_leaf(leaf);
                let parent = path::parent(target).to_vec();
                if !touched_blocks.contains(&parent) {
                    touched_blocks.push(parent);
                }
            }
            None => return Err(invalid_path(target)),
        }
    }
    trace!(matched = targets.len(), ?patch, "set");

    if touched_blocks.is_empty() {
        return Ok(at);
    }
    merge_leaves(editor, &at, &touched_blocks)
}

/// Move each maximal run of adjacent matched siblings into its own copy of
/// `container`, which takes the run's place.
///
/// Matches under different parents are never wrapped together, so a range
/// reaching into a nested container wraps the nested matches inside it.
pub fn wrap_nodes<P>(
    editor: &mut Editor,
    at: &Range,
    container: Block,
    options: TransformOptions,
    mut predicate: P,
) -> FormatResult<Range>
where
    P: FnMut(&Node) -> bool,
{
    editor.document.validate_range(at)?;
    let at = at.forward();
    let tracked = Tracked::capture(editor, &at)?;

    let matches: Vec<Path> = nodes(&editor.document, Some(&at), options.mode, |n| {
        n.is_block() && predicate(n)
    })
    .map(|(_, p)| p)
    .collect();
    if matches.is_empty() {
        return Ok(at);
    }

    // Last first: earlier runs keep their paths
    for run in sibling_runs(&matches)?.iter().rev() {
        trace!(
            parent = ?run.parent,
            from = run.from,
            to = run.to,
            block_type = %container.block_type,
            "wrap"
        );
        let siblings = editor
            .document
            .children_of_mut(&run.parent)
            .ok_or_else(|| invalid_path(&run.parent))?;
        if run.to >= siblings.len() {
            return Err(invalid_path(&path::child(&run.parent, run.to)));
        }
        let wrapped: Vec<Node> = siblings.drain(run.from..=run.to).collect();
        siblings.insert(run.from, Node::Block(container.with_children(wrapped)));
    }

    tracked.restore(editor)
}

/// Children `from..=to` of `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
struct SiblingRun {
    parent: Path,
    from: usize,
    to: usize,
}

/// Group paths in document order into runs of adjacent siblings
fn sibling_runs(paths: &[Path]) -> FormatResult<Vec<SiblingRun>> {
    let mut runs: Vec<SiblingRun> = Vec::new();
    for target in paths {
        let (parent, index) = split_path(target)?;
        match runs.last_mut() {
            Some(run) if run.parent == parent && run.to + 1 == index => run.to = index,
            _ => runs.push(SiblingRun {
                parent: parent.to_vec(),
                from: index,
                to: index,
            }),
        }
    }
    Ok(runs)
}

fn invalid_path(path: &[usize]) -> FormatError {
    FormatError::InvalidPath {
        path: path.to_vec(),
    }
}

fn split_path(path: &[usize]) -> FormatResult<(&[usize], usize)> {
    match path.split_last() {
        Some((index, parent)) => Ok((parent, *index)),
        None => Err(invalid_path(path)),
    }
}

/// Expanded ranges only touch a leaf when they cover part of its text
fn covers_leaf(at: &Range, leaf_path: &[usize], leaf: &Leaf) -> bool {
    let (start, end) = at.edges();
    let from = if start.path == leaf_path { start.offset } else { 0 };
    let to = if end.path == leaf_path { end.offset } else { leaf.len() };
    from < to
}

/// A position that survives structural edits which keep leaves intact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LeafRef {
    ordinal: usize,
    offset: usize,
}

fn leaf_ref(leaves: &[Path], point: &Point) -> FormatResult<LeafRef> {
    leaves
        .iter()
        .position(|p| *p == point.path)
        .map(|ordinal| LeafRef {
            ordinal,
            offset: point.offset,
        })
        .ok_or_else(|| FormatError::StaleRange {
            point: point.clone(),
        })
}

fn resolve(leaves: &[Path], leaf_ref: LeafRef) -> FormatResult<Point> {
    leaves
        .get(leaf_ref.ordinal)
        .map(|p| Point::new(p.clone(), leaf_ref.offset))
        .ok_or_else(|| {
            FormatError::InvariantViolation(format!("leaf #{} disappeared", leaf_ref.ordinal))
        })
}

/// Operative range and selection captured before a block-level edit
struct Tracked {
    at: (LeafRef, LeafRef),
    selection: Option<(LeafRef, LeafRef)>,
}

impl Tracked {
    fn capture(editor: &Editor, at: &Range) -> FormatResult<Self> {
        let leaves = editor.document.leaf_paths();
        let selection = match &editor.selection {
            Some(sel) => Some((leaf_ref(&leaves, &sel.anchor)?, leaf_ref(&leaves, &sel.focus)?)),
            None => None,
        };
        Ok(Self {
            at: (leaf_ref(&leaves, at.start())?, leaf_ref(&leaves, at.end())?),
            selection,
        })
    }

    fn restore(self, editor: &mut Editor) -> FormatResult<Range> {
        let leaves = editor.document.leaf_paths();
        if let Some((anchor, focus)) = self.selection {
            editor.selection = Some(Range::new(
                resolve(&leaves, anchor)?,
                resolve(&leaves, focus)?,
            ));
        }
        Ok(Range::new(
            resolve(&leaves, self.at.0)?,
            resolve(&leaves, self.at.1)?,
        ))
    }
}

/// Child index span of `parent` holding leaves inside the tracked range
fn covered_children(
    leaves: &[Path],
    parent: &[usize],
    (start, end): (LeafRef, LeafRef),
) -> Option<(usize, usize)> {
    let depth = parent.len();
    let mut span: Option<(usize, usize)> = None;
    for (ordinal, leaf_path) in leaves.iter().enumerate() {
        if ordinal < start.ordinal || ordinal > end.ordinal {
            continue;
        }
        if !path::is_ancestor(parent, leaf_path) {
            continue;
        }
        let child = leaf_path[depth];
        span = Some(match span {
            Some((lo, hi)) => (lo.min(child), hi.max(child)),
            None => (child, child),
        });
    }
    span
}

/// Which way a position moves when its leaf is split exactly under it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affinity {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
struct Marker {
    point: Point,
    affinity: Affinity,
}

impl Marker {
    fn new(point: Point, affinity: Affinity) -> Self {
        Self { point, affinity }
    }
}

/// Markers for the operative range (inward-facing) and the selection
fn markers_for(editor: &Editor, at: &Range) -> Vec<Marker> {
    let mut markers = vec![
        Marker::new(at.start().clone(), Affinity::Forward),
        Marker::new(at.end().clone(), Affinity::Backward),
    ];
    if let Some(sel) = &editor.selection {
        let (anchor, focus) = if sel.is_backward() {
            (Affinity::Backward, Affinity::Forward)
        } else {
            (Affinity::Forward, Affinity::Backward)
        };
        markers.push(Marker::new(sel.anchor.clone(), anchor));
        markers.push(Marker::new(sel.focus.clone(), focus));
    }
    markers
}

fn apply_markers(editor: &mut Editor, mut markers: Vec<Marker>) -> Range {
    if markers.len() == 4 {
        let focus = markers.remove(3).point;
        let anchor = markers.remove(2).point;
        editor.selection = Some(Range::new(anchor, focus));
    }
    let end = markers.remove(1).point;
    let start = markers.remove(0).point;
    Range::new(start, end)
}

fn split_leaves_at_edges(editor: &mut Editor, at: &Range) -> FormatResult<Range> {
    let mut markers = markers_for(editor, at);
    // End first: splitting there never moves the start
    let end = markers[1].point.clone();
    split_leaf(editor, &end, &mut markers)?;
    let start = markers[0].point.clone();
    split_leaf(editor, &start, &mut markers)?;
    Ok(apply_markers(editor, markers))
}

fn split_leaf(editor: &mut Editor, at: &Point, markers: &mut [Marker]) -> FormatResult<()> {
    let (parent, index) = split_path(&at.path)?;
    let siblings = editor
        .document
        .children_of_mut(parent)
        .ok_or_else(|| invalid_path(parent))?;
    let Some(Node::Leaf(leaf)) = siblings.get_mut(index) else {
        return Err(FormatError::StaleRange { point: at.clone() });
    };
    if at.offset == 0 || at.offset >= leaf.len() {
        return Ok(());
    }

    let right = Leaf {
        text: leaf.text.split_off(at.offset),
        marks: leaf.marks.clone(),
    };
    siblings.insert(index + 1, Node::Leaf(right));

    for marker in markers.iter_mut() {
        let point = &mut marker.point;
        if point.path == at.path {
            let moves = point.offset > at.offset
                || (point.offset == at.offset && marker.affinity == Affinity::Forward);
            if moves {
                point.path = path::child(parent, index + 1);
                point.offset -= at.offset;
            }
        } else if path::parent(&point.path) == parent {
            if let Some(last) = point.path.last_mut() {
                if *last > index {
                    *last += 1;
                }
            }
        }
    }
    Ok(())
}

/// Normalize the given text blocks: drop empty leaves that have a sibling
/// and join neighbours carrying the same marks.
fn merge_leaves(editor: &mut Editor, at: &Range, blocks: &[Path]) -> FormatResult<Range> {
    let mut markers = markers_for(editor, at);

    for block_path in blocks {
        let children = editor
            .document
            .children_of_mut(block_path)
            .ok_or_else(|| invalid_path(block_path))?;

        let mut ix = 1;
        while ix < children.len() {
            let (Node::Leaf(left), Node::Leaf(right)) = (&children[ix - 1], &children[ix]) else {
                ix += 1;
                continue;
            };
            let left_len = left.len();

            if left.marks == right.marks || right.is_empty() {
                let removed = children.remove(ix);
                if let (Node::Leaf(left), Node::Leaf(right)) = (&mut children[ix - 1], removed) {
                    left.text.push_str(&right.text);
                }
                remap_removed(&mut markers, block_path, ix, Some((ix - 1, left_len)));
            } else if left.is_empty() {
                children.remove(ix - 1);
                remap_removed(&mut markers, block_path, ix - 1, None);
            } else {
                ix += 1;
            }
        }
    }

    Ok(apply_markers(editor, markers))
}

/// Fix up markers after child `removed` of `block_path` went away.
///
/// Markers inside the removed leaf land at `into` (index, offset shift) when
/// its text was folded into a neighbour, or at the start of whatever now
/// occupies its slot otherwise.
fn remap_removed(
    markers: &mut [Marker],
    block_path: &[usize],
    removed: usize,
    into: Option<(usize, usize)>,
) {
    for marker in markers.iter_mut() {
        let point = &mut marker.point;
        if path::parent(&point.path) != block_path {
            continue;
        }
        let Some(last) = point.path.last_mut() else {
            continue;
        };
        if *last > removed {
            *last -= 1;
        } else if *last == removed {
            match into {
                Some((index, shift)) => {
                    *last = index;
                    point.offset += shift;
                }
                None => point.offset = 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn p(text: &str) -> Block {
        Block::text(BlockType::Paragraph, text)
    }

    fn item(text: &str) -> Node {
        Block::text(BlockType::ListItem, text).into()
    }

    fn list_doc() -> Document {
        Document::from_blocks([
            p("intro"),
            Block::new(
                BlockType::BulletedList,
                vec![item("a"), item("b"), item("c"), item("d")],
            )
            .with_align(Alignment::Right),
            p("outro"),
        ])
    }

    fn is_list(node: &Node) -> bool {
        node.block_type().is_some_and(|t| t.is_list())
    }

    fn types(doc: &Document) -> Vec<BlockType> {
        doc.children.iter().filter_map(Node::block_type).collect()
    }

    #[test]
    fn test_unwrap_with_split_keeps_unselected_items_in_copies() {
        let range = Range::new(Point::new(vec![1, 1, 0], 0), Point::new(vec![1, 2, 0], 1));
        let mut editor = Editor::new(list_doc()).with_selection(range.clone());

        let options = TransformOptions::mode(Mode::All).split(true);
        let at = unwrap_nodes(&mut editor, &range, options, is_list).unwrap();

        let doc = &editor.document;
        assert_eq!(
            types(doc),
            vec![
                BlockType::Paragraph,
                BlockType::BulletedList,
                BlockType::ListItem,
                BlockType::ListItem,
                BlockType::BulletedList,
                BlockType::Paragraph,
            ]
        );
        assert_eq!(doc.node(&[1]).unwrap().text(), "a");
        assert_eq!(doc.node(&[4]).unwrap().text(), "d");
        // copies keep the container's properties
        assert_eq!(doc.block(&[4]).unwrap().align, Some(Alignment::Right));

        let expected = Range::new(Point::new(vec![2, 0], 0), Point::new(vec![3, 0], 1));
        assert_eq!(at, expected);
        assert_eq!(editor.selection, Some(expected));
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn test_unwrap_without_split_promotes_every_child() {
        let range = Range::collapsed(Point::new(vec![1, 0, 0], 0));
        let mut editor = Editor::new(list_doc());

        unwrap_nodes(&mut editor, &range, TransformOptions::mode(Mode::All), is_list).unwrap();

        assert_eq!(editor.document.children.len(), 6);
        assert!(editor.document.children[1..5]
            .iter()
            .all(|n| n.block_type() == Some(BlockType::ListItem)));
    }

    #[test]
    fn test_set_nodes_preserves_unpatched_properties_and_removes_explicit_none() {
        let doc = Document::from_blocks([p("one").with_align(Alignment::Center)]);
        let range = Range::collapsed(Point::new(vec![0, 0], 1));
        let mut editor = Editor::new(doc);

        set_nodes(
            &mut editor,
            &range,
            &Patch::block_type(BlockType::HeadingTwo),
            TransformOptions::mode(Mode::Lowest),
            Node::is_block,
        )
        .unwrap();
        let block = editor.document.block(&[0]).unwrap();
        assert_eq!(block.block_type, BlockType::HeadingTwo);
        assert_eq!(block.align, Some(Alignment::Center));

        set_nodes(
            &mut editor,
            &range,
            &Patch::align(None),
            TransformOptions::mode(Mode::Lowest),
            Node::is_block,
        )
        .unwrap();
        let block = editor.document.block(&[0]).unwrap();
        assert_eq!(block.align, None);
        assert_eq!(block.block_type, BlockType::HeadingTwo);
    }

    #[test]
    fn test_set_marks_splits_at_range_edges() {
        let doc = Document::from_blocks([p("hello")]);
        let range = Range::new(Point::new(vec![0, 0], 1), Point::new(vec![0, 0], 4));
        let mut editor = Editor::new(doc).with_selection(range.clone());

        let at = set_nodes(
            &mut editor,
            &range,
            &Patch::add_mark(MarkType::Bold),
            TransformOptions::mode(Mode::All).split(true),
            Node::is_leaf,
        )
        .unwrap();

        let leaves: Vec<&Leaf> = editor.document.children[0]
            .children()
            .iter()
            .filter_map(Node::as_leaf)
            .collect();
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[0], &Leaf::new("h"));
        assert_eq!(leaves[1], &Leaf::marked("ell", [MarkType::Bold]));
        assert_eq!(leaves[2], &Leaf::new("o"));

        let expected = Range::new(Point::new(vec![0, 1], 0), Point::new(vec![0, 1], 3));
        assert_eq!(at, expected);
        assert_eq!(editor.selection, Some(expected));
    }

    #[test]
    fn test_removing_marks_merges_leaves_and_remaps_selection() {
        let doc = Document::from_blocks([Block::new(
            BlockType::Paragraph,
            vec![
                Leaf::new("h").into(),
                Leaf::marked("ell", [MarkType::Bold]).into(),
                Leaf::new("o").into(),
            ],
        )]);
        let range = Range::new(Point::new(vec![0, 1], 3), Point::new(vec![0, 1], 0));
        let mut editor = Editor::new(doc).with_selection(range.clone());

        set_nodes(
            &mut editor,
            &range,
            &Patch::remove_mark(MarkType::Bold),
            TransformOptions::mode(Mode::All).split(true),
            Node::is_leaf,
        )
        .unwrap();

        assert_eq!(
            editor.document.children[0].children(),
            &[Node::Leaf(Leaf::new("hello"))]
        );
        // backward selection stays backward over the same letters
        assert_eq!(
            editor.selection,
            Some(Range::new(Point::new(vec![0, 0], 4), Point::new(vec![0, 0], 1)))
        );
    }

    #[test]
    fn test_edge_only_leaves_are_not_marked() {
        let doc = Document::from_blocks([Block::new(
            BlockType::Paragraph,
            vec![Leaf::new("ab").into(), Leaf::marked("cd", [MarkType::Code]).into()],
        )]);
        // starts at the very end of "ab"
        let range = Range::new(Point::new(vec![0, 0], 2), Point::new(vec![0, 1], 2));
        let mut editor = Editor::new(doc);

        set_nodes(
            &mut editor,
            &range,
            &Patch::add_mark(MarkType::Italic),
            TransformOptions::mode(Mode::All).split(true),
            Node::is_leaf,
        )
        .unwrap();

        let children = editor.document.children[0].children();
        assert_eq!(children[0], Node::Leaf(Leaf::new("ab")));
        assert_eq!(
            children[1],
            Node::Leaf(Leaf::marked("cd", [MarkType::Code, MarkType::Italic]))
        );
    }

    #[test]
    fn test_wrap_nodes_wraps_contiguous_run() {
        let doc = Document::from_blocks([p("zero"), p("one"), p("two"), p("three")]);
        let range = Range::new(Point::new(vec![1, 0], 0), Point::new(vec![2, 0], 3));
        let mut editor = Editor::new(doc).with_selection(range.clone());

        let at = wrap_nodes(
            &mut editor,
            &range,
            Block::container(BlockType::BlockQuote),
            TransformOptions::mode(Mode::Lowest),
            |_| true,
        )
        .unwrap();

        let doc = &editor.document;
        assert_eq!(doc.children.len(), 3);
        let quote = doc.block(&[1]).unwrap();
        assert_eq!(quote.block_type, BlockType::BlockQuote);
        assert_eq!(quote.children.len(), 2);
        assert_eq!(doc.node(&[2]).unwrap().text(), "three");
        assert_eq!(
            at,
            Range::new(Point::new(vec![1, 0, 0], 0), Point::new(vec![1, 1, 0], 3))
        );
        assert_eq!(editor.selection, Some(at));
    }

    #[test]
    fn test_wrap_nodes_never_wraps_across_parents() {
        let doc = Document::from_blocks([
            p("a"),
            Block::new(BlockType::BlockQuote, vec![p("b").into(), p("c").into()]),
        ]);
        let range = Range::new(Point::new(vec![0, 0], 0), Point::new(vec![1, 0, 0], 1));
        let mut editor = Editor::new(doc).with_selection(range.clone());

        let at = wrap_nodes(
            &mut editor,
            &range,
            Block::container(BlockType::BulletedList),
            TransformOptions::mode(Mode::Lowest),
            Node::is_block,
        )
        .unwrap();

        let doc = &editor.document;
        assert_eq!(types(doc), vec![BlockType::BulletedList, BlockType::BlockQuote]);
        assert_eq!(doc.block(&[0]).unwrap().children.len(), 1);
        assert_eq!(doc.node(&[0, 0]).unwrap().text(), "a");

        let quote = doc.block(&[1]).unwrap();
        assert_eq!(quote.children.len(), 2);
        assert_eq!(quote.children[0].block_type(), Some(BlockType::BulletedList));
        assert_eq!(doc.node(&[1, 0, 0]).unwrap().text(), "b");
        assert_eq!(doc.node(&[1, 1]).unwrap().text(), "c");

        let expected = Range::new(Point::new(vec![0, 0, 0], 0), Point::new(vec![1, 0, 0, 0], 1));
        assert_eq!(at, expected);
        assert_eq!(editor.selection, Some(expected));
    }

    #[test]
    fn test_sibling_runs_split_on_gaps_and_parents() {
        let runs = sibling_runs(&[vec![0], vec![1], vec![1, 0], vec![1, 1], vec![3]]).unwrap();
        let spans: Vec<(Path, usize, usize)> = runs
            .into_iter()
            .map(|run| (run.parent, run.from, run.to))
            .collect();
        assert_eq!(spans, vec![(vec![], 0, 1), (vec![1], 0, 1), (vec![], 3, 3)]);
    }

    #[test]
    fn test_stale_range_is_rejected_without_mutation() {
        let mut editor = Editor::new(list_doc());
        let before = editor.clone();
        let stale = Range::collapsed(Point::new(vec![9, 0], 0));

        let err = wrap_nodes(
            &mut editor,
            &stale,
            Block::container(BlockType::NumberedList),
            TransformOptions::default(),
            |_| true,
        )
        .unwrap_err();

        assert!(matches!(err, FormatError::StaleRange { .. }));
        assert_eq!(editor, before);
    }
}
