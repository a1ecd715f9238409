mod document;
mod node;
pub mod path;
mod range;

pub use document::Document;
pub use node::{Alignment, Block, BlockType, Leaf, MarkSet, MarkType, Node};
pub use path::Path;
pub use range::{Point, Range, Selection};
