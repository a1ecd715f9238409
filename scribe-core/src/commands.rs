//! Formatting commands behind the toolbar buttons and hotkeys.
//!
//! Commands are functions of `(&Editor, format)`: they work on a copy of the
//! editor and hand it back only when every step succeeded and the document
//! invariants still hold.

use tracing::debug;

use crate::editor::Editor;
use crate::error::{FormatError, FormatResult};
use crate::format::BlockFormat;
use crate::matcher::{first_match, leaf_entries, nodes, unhang, Mode};
use crate::model::{Block, BlockType, MarkSet, MarkType, Node, Range};
use crate::transforms::{self, Patch, TransformOptions};

fn live_selection(editor: &Editor) -> FormatResult<&Range> {
    let selection = editor.selection.as_ref().ok_or(FormatError::NoSelection)?;
    editor.document.validate_range(selection)?;
    Ok(selection)
}

fn is_list_container(node: &Node) -> bool {
    node.block_type().is_some_and(|t| t.is_list())
}

/// Whether any block in the (unhung) selection carries `format`
pub fn is_block_active(editor: &Editor, format: BlockFormat) -> bool {
    let Ok(selection) = live_selection(editor) else {
        return false;
    };
    let at = unhang(&editor.document, selection);
    first_match(&editor.document, Some(&at), |node| format.matches(node)).is_some()
}

/// Toggle a block type or alignment over the selected blocks
pub fn toggle_block(editor: &Editor, format: BlockFormat) -> FormatResult<Editor> {
    let selection = live_selection(editor)?;
    let is_active = is_block_active(editor, format);

    let mut next = editor.clone();
    let mut at = unhang(&next.document, selection);

    if !format.is_alignment() {
        at = transforms::unwrap_nodes(
            &mut next,
            &at,
            TransformOptions::mode(Mode::All).split(true),
            is_list_container,
        )?;
    }

    let patch = match format {
        BlockFormat::Align(align) => Patch::align(if is_active { None } else { Some(align) }),
        BlockFormat::Type(block_type) => Patch::block_type(if is_active {
            BlockType::Paragraph
        } else if block_type.is_list() {
            BlockType::ListItem
        } else {
            block_type
        }),
    };
    at = transforms::set_nodes(
        &mut next,
        &at,
        &patch,
        TransformOptions::mode(Mode::Lowest),
        Node::is_block,
    )?;

    if let BlockFormat::Type(list) = format {
        if !is_active && list.is_list() {
            transforms::wrap_nodes(
                &mut next,
                &at,
                Block::container(list),
                TransformOptions::mode(Mode::Lowest),
                Node::is_block,
            )?;
        }
    }

    next.document.check_invariants()?;
    debug!(%format, was_active = is_active, "toggle_block");
    Ok(next)
}

/// Marks in effect at the selection.
///
/// For a collapsed selection these are the pending cursor marks, or else the
/// marks of the leaf under the caret (the previous leaf of the same block
/// when the caret sits at offset 0). For an expanded selection it is the
/// intersection over every leaf the selection covers.
pub fn active_marks(editor: &Editor) -> Option<MarkSet> {
    let selection = live_selection(editor).ok()?;
    let document = &editor.document;

    if selection.is_collapsed() {
        if let Some(marks) = &editor.marks {
            return Some(marks.clone());
        }
        let anchor = &selection.anchor;
        let mut leaf = document.leaf(&anchor.path)?;
        if anchor.offset == 0 {
            if let Some((last, parent)) = anchor.path.split_last() {
                if let Some(ix) = last.checked_sub(1) {
                    let mut prev_path = parent.to_vec();
                    prev_path.push(ix);
                    if let Some(prev) = document.leaf(&prev_path) {
                        leaf = prev;
                    }
                }
            }
        }
        return Some(leaf.marks.clone());
    }

    let (start, end) = selection.edges();
    let mut covered = leaf_entries(document, Some(selection)).filter_map(|(leaf, path)| {
        let from = if path == start.path { start.offset } else { 0 };
        let to = if path == end.path { end.offset } else { leaf.len() };
        (from < to).then_some(&leaf.marks)
    });

    match covered.next() {
        Some(first) => Some(covered.fold(first.clone(), |acc, marks| {
            acc.intersection(marks).copied().collect()
        })),
        None => document.leaf(&selection.anchor.path).map(|l| l.marks.clone()),
    }
}

pub fn is_mark_active(editor: &Editor, mark: MarkType) -> bool {
    active_marks(editor).is_some_and(|marks| marks.contains(&mark))
}

/// Toggle an inline mark over the selection.
///
/// A collapsed selection only changes the pending cursor marks; the
/// document is left as it is.
pub fn toggle_mark(editor: &Editor, mark: MarkType) -> FormatResult<Editor> {
    let selection = live_selection(editor)?.clone();
    let is_active = is_mark_active(editor, mark);
    let mut next = editor.clone();

    if selection.is_collapsed() {
        let mut marks = active_marks(editor).unwrap_or_default();
        if is_active {
            marks.remove(&mark);
        } else {
            marks.insert(mark);
        }
        next.marks = Some(marks);
    } else {
        let patch = if is_active {
            Patch::remove_mark(mark)
        } else {
            Patch::add_mark(mark)
        };
        transforms::set_nodes(
            &mut next,
            &selection,
            &patch,
            TransformOptions::mode(Mode::All).split(true),
            Node::is_leaf,
        )?;
        next.document.check_invariants()?;
    }

    debug!(%mark, was_active = is_active, collapsed = selection.is_collapsed(), "toggle_mark");
    Ok(next)
}

/// Check every selected check-list item, or uncheck them all when they
/// already are.
pub fn toggle_checked(editor: &Editor) -> FormatResult<Editor> {
    let selection = live_selection(editor)?;
    let at = unhang(&editor.document, selection);

    let is_check_item = |node: &Node| node.block_type() == Some(BlockType::CheckListItem);
    let items: Vec<bool> = nodes(&editor.document, Some(&at), Mode::All, is_check_item)
        .filter_map(|(node, _)| node.as_block().map(|b| b.checked.unwrap_or(false)))
        .collect();
    if items.is_empty() {
        return Ok(editor.clone());
    }
    let all_checked = items.iter().all(|checked| *checked);

    let mut next = editor.clone();
    transforms::set_nodes(
        &mut next,
        &at,
        &Patch::checked(Some(!all_checked)),
        TransformOptions::mode(Mode::All),
        is_check_item,
    )?;
    next.document.check_invariants()?;

    debug!(items = items.len(), checked = !all_checked, "toggle_checked");
    Ok(next)
}
