//! Command-line arguments

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};

use scribe_core::{Format, ParseError, Point, Range};

/// Scribe - rich-text formatting playground
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Config file (default: ~/.scribe/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the welcome document as JSON
    Seed {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Toggle formats over a selection, in order
    Apply {
        /// Document JSON file
        file: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Formats to toggle: block types, alignments, marks, or `checked`
        #[arg(required = true)]
        actions: Vec<Action>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report which formats are active over a selection
    Query {
        /// Document JSON file
        file: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print a JSON object instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive editor
    Edit {
        /// Document JSON file (default: the welcome document)
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Selection anchor, e.g. 0.1:4 (child indices, then byte offset)
    #[arg(long)]
    pub anchor: Point,

    /// Selection focus (default: same as anchor)
    #[arg(long)]
    pub focus: Option<Point>,
}

impl SelectionArgs {
    pub fn range(&self) -> Range {
        let focus = self.focus.clone().unwrap_or_else(|| self.anchor.clone());
        Range::new(self.anchor.clone(), focus)
    }
}

/// One toggle requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle(Format),
    Checked,
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "checked" {
            return Ok(Action::Checked);
        }
        s.parse().map(Action::Toggle)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Toggle(format) => format.fmt(f),
            Action::Checked => f.write_str("checked"),
        }
    }
}
