use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::model::{Alignment, BlockType, MarkType, Node};

/// Target of a block toolbar button: a block type or an alignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum BlockFormat {
    Type(BlockType),
    Align(Alignment),
}

impl BlockFormat {
    /// The block buttons of the formatting toolbar, in display order
    pub fn toolbar() -> &'static [BlockFormat] {
        &[
            BlockFormat::Type(BlockType::HeadingOne),
            BlockFormat::Type(BlockType::HeadingTwo),
            BlockFormat::Type(BlockType::BlockQuote),
            BlockFormat::Type(BlockType::NumberedList),
            BlockFormat::Type(BlockType::BulletedList),
            BlockFormat::Align(Alignment::Left),
            BlockFormat::Align(Alignment::Center),
            BlockFormat::Align(Alignment::Right),
            BlockFormat::Align(Alignment::Justify),
        ]
    }

    pub fn is_alignment(&self) -> bool {
        matches!(self, BlockFormat::Align(_))
    }

    /// Whether `node` already carries this format
    pub fn matches(&self, node: &Node) -> bool {
        let Some(block) = node.as_block() else {
            return false;
        };
        match self {
            BlockFormat::Type(t) => block.block_type == *t,
            BlockFormat::Align(a) => block.align == Some(*a),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockFormat::Type(t) => t.as_str(),
            BlockFormat::Align(a) => a.as_str(),
        }
    }
}

impl From<BlockType> for BlockFormat {
    fn from(t: BlockType) -> Self {
        BlockFormat::Type(t)
    }
}

impl From<Alignment> for BlockFormat {
    fn from(a: Alignment) -> Self {
        BlockFormat::Align(a)
    }
}

impl fmt::Display for BlockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Alignment>()
            .map(BlockFormat::Align)
            .or_else(|_| s.parse::<BlockType>().map(BlockFormat::Type))
    }
}

/// Any toolbar format, block or inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Block(BlockFormat),
    Mark(MarkType),
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Block(b) => b.fmt(f),
            Format::Mark(m) => m.fmt(f),
        }
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<MarkType>()
            .map(Format::Mark)
            .or_else(|_| s.parse::<BlockFormat>().map(Format::Block))
    }
}
