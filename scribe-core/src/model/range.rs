use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::path::{self, Path};
use crate::error::ParseError;

/// A position inside a leaf: its path plus a byte offset into its text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Document order; offsets break ties within the same leaf
    pub fn compare(&self, other: &Point) -> Ordering {
        match path::compare(&self.path, &other.path) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            other => other,
        }
    }

    pub fn is_before(&self, other: &Point) -> bool {
        self.compare(other) == Ordering::Less
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.path.iter().map(|ix| ix.to_string()).collect();
        write!(f, "{}:{}", path.join("."), self.offset)
    }
}

/// Parses the `0.1:4` form used on the command line
impl FromStr for Point {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPoint(s.to_string());
        let (path, offset) = s.trim().split_once(':').ok_or_else(invalid)?;
        let path = path
            .split('.')
            .map(|ix| ix.parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Path, _>>()?;
        let offset = offset.parse::<usize>().map_err(|_| invalid())?;
        Ok(Point::new(path, offset))
    }
}

/// A pair of points delimiting a span; `anchor` may come after `focus`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

/// The editing surface's current selection
pub type Selection = Range;

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus.is_before(&self.anchor)
    }

    /// `(start, end)` in document order
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }

    pub fn start(&self) -> &Point {
        self.edges().0
    }

    pub fn end(&self) -> &Point {
        self.edges().1
    }

    /// Same span with anchor first
    pub fn forward(&self) -> Range {
        let (start, end) = self.edges();
        Range::new(start.clone(), end.clone())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.anchor, self.focus)
    }
}
