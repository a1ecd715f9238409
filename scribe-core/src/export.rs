use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Document, Selection};
use crate::session::Session;

/// Session snapshot written next to a document
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSession {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub document: Document,
}

impl From<&Session> for ExportSession {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.to_string(),
            title: session.title.clone(),
            filepath: session.filepath.clone(),
            filename: session.filename.clone(),
            word_count: session.word_count(),
            selection: session.selection().cloned(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            document: session.document().clone(),
        }
    }
}

/// Serialize a document to its JSON array form
pub fn to_json(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize document")
}

/// Parse a document, rejecting trees that break the model's invariants
pub fn from_json(json: &str) -> Result<Document> {
    let document: Document = serde_json::from_str(json).context("Failed to parse document JSON")?;
    ensure!(!document.children.is_empty(), "Document has no blocks");
    document
        .check_invariants()
        .context("Document is not well-formed")?;
    Ok(document)
}

pub fn session_to_json(session: &Session) -> Result<String> {
    serde_json::to_string_pretty(&ExportSession::from(session))
        .context("Failed to serialize session")
}
