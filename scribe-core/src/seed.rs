//! The welcome document a new session starts from

use crate::model::{Alignment, Block, BlockType, Document, Leaf, MarkType, Node};

const CHECK_LIST: [&str; 8] = [
    "Host it - DONE!",
    "Convert some files to Typescript - DONE!",
    "More UX for accounts and saving",
    "Add Github login",
    "Workout how to store rich test",
    "Commit to Github",
    "Get autosave working",
    "Export to other file types",
];

fn plain(text: &str) -> Node {
    Leaf::new(text).into()
}

fn marked(text: &str, mark: MarkType) -> Node {
    Leaf::marked(text, [mark]).into()
}

pub fn seed_document() -> Document {
    let mut blocks = vec![
        Block::new(
            BlockType::Paragraph,
            vec![
                plain("This is editable "),
                marked("rich", MarkType::Bold),
                plain(" text, "),
                marked("much", MarkType::Italic),
                plain(" better than a "),
                marked("<textarea>", MarkType::Code),
                plain("!"),
            ],
        ),
        Block::new(
            BlockType::Paragraph,
            vec![
                plain("Since it's rich text, you can do things like turn a selection of text "),
                marked("bold", MarkType::Bold),
                plain(", or add a semantically rendered block quote in the middle of the page, like this:"),
            ],
        ),
        Block::text(BlockType::BlockQuote, "A wise quote."),
        Block::text(BlockType::Paragraph, "Try it out for yourself!").with_align(Alignment::Center),
    ];
    blocks.extend(
        CHECK_LIST
            .iter()
            .map(|text| Block::text(BlockType::CheckListItem, *text).with_checked(false)),
    );
    Document::from_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let doc = seed_document();
        assert!(doc.check_invariants().is_ok());
        assert_eq!(doc.children.len(), 12);
        assert_eq!(doc.block(&[2]).unwrap().block_type, BlockType::BlockQuote);
        assert_eq!(doc.block(&[3]).unwrap().align, Some(Alignment::Center));

        let items: Vec<&Block> = doc.children[4..].iter().filter_map(Node::as_block).collect();
        assert_eq!(items.len(), 8);
        assert!(items
            .iter()
            .all(|b| b.block_type == BlockType::CheckListItem && b.checked == Some(false)));
    }

    #[test]
    fn test_seed_marks() {
        let doc = seed_document();
        assert!(doc.leaf(&[0, 1]).unwrap().has_mark(MarkType::Bold));
        assert!(doc.leaf(&[0, 3]).unwrap().has_mark(MarkType::Italic));
        assert_eq!(doc.leaf(&[0, 5]).unwrap().text, "<textarea>");
        assert!(doc.leaf(&[1, 1]).unwrap().has_mark(MarkType::Bold));
    }
}
