use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Inline marks carried by a leaf
pub type MarkSet = BTreeSet<MarkType>;

/// Structural type of a block node
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    NumberedList,
    BulletedList,
    ListItem,
    CheckListItem,
}

impl BlockType {
    pub fn all() -> &'static [BlockType] {
        &[
            BlockType::Paragraph,
            BlockType::HeadingOne,
            BlockType::HeadingTwo,
            BlockType::BlockQuote,
            BlockType::NumberedList,
            BlockType::BulletedList,
            BlockType::ListItem,
            BlockType::CheckListItem,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::HeadingOne => "heading-one",
            BlockType::HeadingTwo => "heading-two",
            BlockType::BlockQuote => "block-quote",
            BlockType::NumberedList => "numbered-list",
            BlockType::BulletedList => "bulleted-list",
            BlockType::ListItem => "list-item",
            BlockType::CheckListItem => "check-list-item",
        }
    }

    /// List containers may only hold `list-item` children
    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::NumberedList | BlockType::BulletedList)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnknownFormat(s.to_string()))
    }
}

/// Text alignment of a block, independent of its type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn all() -> &'static [Alignment] {
        &[
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justify,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alignment::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseError::UnknownFormat(s.to_string()))
    }
}

/// Boolean inline style flag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    Code,
}

impl MarkType {
    pub fn all() -> &'static [MarkType] {
        &[
            MarkType::Bold,
            MarkType::Italic,
            MarkType::Underline,
            MarkType::Code,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkType::Bold => "bold",
            MarkType::Italic => "italic",
            MarkType::Underline => "underline",
            MarkType::Code => "code",
        }
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkType::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseError::UnknownFormat(s.to_string()))
    }
}

/// A document tree node: either a structural block or a text leaf
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Node {
    Block(Block),
    Leaf(Leaf),
}

impl Node {
    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Block(_) => None,
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.as_block().map(|b| b.block_type)
    }

    /// Child nodes; leaves have none
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block(block) => &block.children,
            Node::Leaf(_) => &[],
        }
    }

    /// Concatenated text of every leaf under this node
    pub fn text(&self) -> String {
        match self {
            Node::Leaf(leaf) => leaf.text.clone(),
            Node::Block(block) => block.children.iter().map(Node::text).collect(),
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

/// Structural node holding other nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Block {
    pub fn new(block_type: BlockType, children: Vec<Node>) -> Self {
        Self {
            block_type,
            align: None,
            checked: None,
            children,
        }
    }

    /// Block of a single unmarked leaf
    pub fn text(block_type: BlockType, text: impl Into<String>) -> Self {
        Self::new(block_type, vec![Leaf::new(text).into()])
    }

    /// Empty container, used as the template for `wrap_nodes`
    pub fn container(block_type: BlockType) -> Self {
        Self::new(block_type, Vec::new())
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// A text block holds leaves; a container holds blocks
    pub fn is_text_block(&self) -> bool {
        self.children.iter().all(Node::is_leaf)
    }

    /// Same properties, different children
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            block_type: self.block_type,
            align: self.align,
            checked: self.checked,
            children,
        }
    }
}

/// Terminal node holding text and inline marks.
///
/// Serialized the way the browser editor stores text nodes: marks are
/// flattened into boolean fields next to `text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "LeafRepr", into = "LeafRepr")]
pub struct Leaf {
    pub text: String,
    pub marks: MarkSet,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = MarkType>) -> Self {
        Self {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    pub fn has_mark(&self, mark: MarkType) -> bool {
        self.marks.contains(&mark)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Serialize, Deserialize)]
struct LeafRepr {
    text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    code: bool,
}

impl From<LeafRepr> for Leaf {
    fn from(repr: LeafRepr) -> Self {
        let flags = [
            (repr.bold, MarkType::Bold),
            (repr.italic, MarkType::Italic),
            (repr.underline, MarkType::Underline),
            (repr.code, MarkType::Code),
        ];
        Leaf {
            text: repr.text,
            marks: flags
                .into_iter()
                .filter_map(|(on, mark)| on.then_some(mark))
                .collect(),
        }
    }
}

impl From<Leaf> for LeafRepr {
    fn from(leaf: Leaf) -> Self {
        LeafRepr {
            bold: leaf.has_mark(MarkType::Bold),
            italic: leaf.has_mark(MarkType::Italic),
            underline: leaf.has_mark(MarkType::Underline),
            code: leaf.has_mark(MarkType::Code),
            text: leaf.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip_through_from_str() {
        for t in BlockType::all() {
            assert_eq!(t.as_str().parse::<BlockType>().unwrap(), *t);
        }
        assert_eq!("center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("code".parse::<MarkType>().unwrap(), MarkType::Code);
        assert!("heading-three".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_leaf_marks_serialize_as_flags() {
        let leaf = Leaf::marked("rich", [MarkType::Bold]);
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "rich", "bold": true }));

        let back: Leaf = serde_json::from_value(json).unwrap();
        assert_eq!(back, leaf);
    }

    #[test]
    fn test_untagged_node_distinguishes_blocks_from_leaves() {
        let node: Node = serde_json::from_str(
            r#"{
                "type": "paragraph",
                "align": "center",
                "children": [{ "text": "hi", "italic": true }]
            }"#,
        )
        .unwrap();

        let block = node.as_block().unwrap();
        assert_eq!(block.block_type, BlockType::Paragraph);
        assert_eq!(block.align, Some(Alignment::Center));
        assert!(block.is_text_block());
        assert!(block.children[0].as_leaf().unwrap().has_mark(MarkType::Italic));
    }

    #[test]
    fn test_list_types() {
        assert!(BlockType::NumberedList.is_list());
        assert!(BlockType::BulletedList.is_list());
        assert!(!BlockType::ListItem.is_list());
        assert!(!BlockType::CheckListItem.is_list());
    }
}
