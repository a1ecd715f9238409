//! File I/O for the CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use scribe_core::{Document, Session};

/// Read and validate a document JSON file
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    scribe_core::from_json(&content).with_context(|| format!("Failed to load {}", path.display()))
}

/// Open a document file as a session carrying its name and location
pub fn load_session(path: &Path) -> Result<Session> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    let document = load_document(&canonical)?;

    let filepath = canonical.to_string_lossy().to_string();
    let filename = canonical
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = canonical
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    Ok(Session::with_file_info(title, document, filepath, filename))
}

pub fn save_document(path: &Path, document: &Document) -> Result<()> {
    let json = scribe_core::to_json(document)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write to `output`, or to stdout when no file is given
pub fn write_output(output: Option<&Path>, document: &Document) -> Result<()> {
    match output {
        Some(path) => save_document(path, document),
        None => {
            println!("{}", scribe_core::to_json(document)?);
            Ok(())
        }
    }
}

/// Get the ~/.scribe directory path, creating it if needed
pub fn scribe_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let scribe_dir = home.join(".scribe");

    if !scribe_dir.exists() {
        fs::create_dir_all(&scribe_dir)
            .with_context(|| format!("Failed to create {}", scribe_dir.display()))?;
    }

    Ok(scribe_dir)
}

/// Save the session's document where it came from, or under
/// ~/.scribe/document.json for an unsaved one
pub fn save_session(session: &Session) -> Result<PathBuf> {
    let path = match &session.filepath {
        Some(path) => PathBuf::from(path),
        None => scribe_dir()?.join("document.json"),
    };
    save_document(&path, session.document())?;
    Ok(path)
}

/// Export session metadata and document to ~/.scribe/session.json
pub fn export_session(session: &Session) -> Result<PathBuf> {
    let export_path = scribe_dir()?.join("session.json");
    let json = scribe_core::session_to_json(session)?;

    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    Ok(export_path)
}
