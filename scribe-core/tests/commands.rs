use scribe_core::{
    is_block_active, is_mark_active, seed_document, toggle_block, toggle_mark, Alignment, Block,
    BlockFormat, BlockType, Document, Editor, Leaf, MarkType, Node, Point, Range,
};

fn paragraph(text: &str) -> Block {
    Block::text(BlockType::Paragraph, text)
}

fn select(document: Document, anchor: Point, focus: Point) -> Editor {
    Editor::new(document).with_selection(Range::new(anchor, focus))
}

fn leaves(editor: &Editor, block: &[usize]) -> Vec<Leaf> {
    editor
        .document
        .node(block)
        .map(|n| n.children().iter().filter_map(Node::as_leaf).cloned().collect())
        .unwrap_or_default()
}

#[test]
fn test_heading_toggles_on_and_off() {
    let start = select(
        Document::from_blocks([paragraph("hello")]),
        Point::new(vec![0, 0], 0),
        Point::new(vec![0, 0], 5),
    );
    let heading: BlockFormat = BlockType::HeadingOne.into();

    let on = toggle_block(&start, heading).unwrap();
    assert_eq!(on.document.block(&[0]).unwrap().block_type, BlockType::HeadingOne);
    assert!(is_block_active(&on, heading));

    let off = toggle_block(&on, heading).unwrap();
    assert_eq!(off.document.block(&[0]).unwrap().block_type, BlockType::Paragraph);
    assert_eq!(off.document, start.document);
}

#[test]
fn test_list_wraps_exactly_the_selected_paragraphs() {
    let start = select(
        Document::from_blocks([paragraph("one"), paragraph("two"), paragraph("three")]),
        Point::new(vec![0, 0], 1),
        Point::new(vec![1, 0], 2),
    );
    let list: BlockFormat = BlockType::BulletedList.into();

    let on = toggle_block(&start, list).unwrap();
    assert_eq!(on.document.children.len(), 2);
    let container = on.document.block(&[0]).unwrap();
    assert_eq!(container.block_type, BlockType::BulletedList);
    assert_eq!(container.children.len(), 2);
    assert!(container
        .children
        .iter()
        .all(|c| c.block_type() == Some(BlockType::ListItem)));
    assert_eq!(on.document.block(&[1]).unwrap().block_type, BlockType::Paragraph);
    assert!(on.document.check_invariants().is_ok());
    assert_eq!(
        on.selection,
        Some(Range::new(Point::new(vec![0, 0, 0], 1), Point::new(vec![0, 1, 0], 2)))
    );

    // toggling off removes the container and keeps every child
    let off = toggle_block(&on, list).unwrap();
    assert_eq!(off.document, start.document);
    assert_eq!(off.selection, start.selection);
}

#[test]
fn test_backward_selection_behaves_like_forward() {
    let doc = Document::from_blocks([paragraph("one"), paragraph("two")]);
    let forward = select(doc.clone(), Point::new(vec![0, 0], 0), Point::new(vec![1, 0], 3));
    let backward = select(doc, Point::new(vec![1, 0], 3), Point::new(vec![0, 0], 0));
    let list: BlockFormat = BlockType::NumberedList.into();

    let a = toggle_block(&forward, list).unwrap();
    let b = toggle_block(&backward, list).unwrap();
    assert_eq!(a.document, b.document);
    assert!(b.selection.as_ref().is_some_and(Range::is_backward));
}

#[test]
fn test_alignment_never_changes_type() {
    let seed = seed_document();
    let end = seed.end(&[5]).unwrap();
    let start = select(seed, Point::new(vec![1, 0], 3), end);

    for align in [Alignment::Left, Alignment::Right, Alignment::Justify, Alignment::Center] {
        let next = toggle_block(&start, align.into()).unwrap();
        for (before, after) in start.document.children.iter().zip(&next.document.children) {
            assert_eq!(before.block_type(), after.block_type());
        }
        // block 3 starts out centered, so center toggles off
        let expect_active = align != Alignment::Center;
        assert_eq!(is_block_active(&next, align.into()), expect_active);
    }
}

#[test]
fn test_bold_over_part_of_a_word() {
    let start = select(
        Document::from_blocks([paragraph("hello")]),
        Point::new(vec![0, 0], 1),
        Point::new(vec![0, 0], 4),
    );

    let bold = toggle_mark(&start, MarkType::Bold).unwrap();
    assert_eq!(
        leaves(&bold, &[0]),
        vec![
            Leaf::new("h"),
            Leaf::marked("ell", [MarkType::Bold]),
            Leaf::new("o"),
        ]
    );
    assert!(is_mark_active(&bold, MarkType::Bold));

    let plain = toggle_mark(&bold, MarkType::Bold).unwrap();
    assert_eq!(plain.document, start.document);
    assert!(!is_mark_active(&plain, MarkType::Bold));
}

#[test]
fn test_mark_toggle_twice_restores_marks() {
    // "rich" is already bold in the welcome text
    let start = select(seed_document(), Point::new(vec![0, 1], 0), Point::new(vec![0, 1], 4));

    let italic = toggle_mark(&start, MarkType::Italic).unwrap();
    let rich = italic.document.leaf(&[0, 1]).unwrap();
    assert!(rich.has_mark(MarkType::Bold) && rich.has_mark(MarkType::Italic));

    let back = toggle_mark(&italic, MarkType::Italic).unwrap();
    assert_eq!(back.document, start.document);
}

#[test]
fn test_mark_changes_stay_inside_the_selection() {
    // "ble rich te" out of "This is editable rich text, "
    let start = select(seed_document(), Point::new(vec![0, 0], 13), Point::new(vec![0, 2], 3));

    let next = toggle_mark(&start, MarkType::Underline).unwrap();
    let underlined: String = leaves(&next, &[0])
        .iter()
        .filter(|l| l.has_mark(MarkType::Underline))
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(underlined, "ble rich te");
    assert_eq!(next.document.node(&[0]).unwrap().text(), start.document.node(&[0]).unwrap().text());
    assert_eq!(next.document.children[1..], start.document.children[1..]);
}

#[test]
fn test_queries_do_not_mutate() {
    let start = select(seed_document(), Point::new(vec![0, 0], 0), Point::new(vec![3, 0], 4));
    let snapshot = start.clone();

    for format in BlockFormat::toolbar() {
        is_block_active(&start, *format);
    }
    for mark in MarkType::all() {
        is_mark_active(&start, *mark);
    }
    assert_eq!(start, snapshot);
}

#[test]
fn test_every_toolbar_toggle_keeps_lists_well_formed() {
    let seed = seed_document();
    let end = seed.end(&[6]).unwrap();
    let mut editor = select(seed, Point::new(vec![2, 0], 2), end);

    for format in BlockFormat::toolbar() {
        editor = toggle_block(&editor, *format).unwrap();
        assert!(editor.document.check_invariants().is_ok(), "after {format}");
        let selection = editor.selection.clone().unwrap();
        assert!(editor.document.validate_range(&selection).is_ok(), "after {format}");
    }
}

#[test]
fn test_numbered_list_item_switches_to_heading() {
    let doc = Document::from_blocks([Block::new(
        BlockType::NumberedList,
        vec![
            Block::text(BlockType::ListItem, "first").into(),
            Block::text(BlockType::ListItem, "second").into(),
        ],
    )]);
    let start = select(doc, Point::new(vec![0, 1, 0], 0), Point::new(vec![0, 1, 0], 6));

    let next = toggle_block(&start, BlockType::HeadingTwo.into()).unwrap();
    let list = next.document.block(&[0]).unwrap();
    assert_eq!(list.block_type, BlockType::NumberedList);
    assert_eq!(list.children.len(), 1);
    assert_eq!(next.document.block(&[1]).unwrap().block_type, BlockType::HeadingTwo);
    assert_eq!(next.document.node(&[1]).unwrap().text(), "second");
}
