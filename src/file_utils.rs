use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// @module: Download directory utilities

// @pattern: Names produced by `document_file_name`
static DOCUMENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^translation_[A-Za-z0-9]{1,32}\.docx$").expect("document name pattern is valid")
});

/// Extension of generated documents
pub const DOCUMENT_EXTENSION: &str = "docx";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Short document identifier (8 hex chars)
    pub fn short_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    // @generates: File name for a rendered document
    pub fn document_file_name(id: &str) -> String {
        format!("translation_{}.{}", id, DOCUMENT_EXTENSION)
    }

    // @checks: Name was produced by `document_file_name` (no separators, no traversal)
    pub fn is_document_name(name: &str) -> bool {
        DOCUMENT_NAME.is_match(name)
    }

    // @resolves: Download name inside the download directory, if acceptable and present
    pub fn resolve_download<P: AsRef<Path>>(dir: P, name: &str) -> Option<PathBuf> {
        if !Self::is_document_name(name) {
            return None;
        }
        let path = dir.as_ref().join(name);
        Self::file_exists(&path).then_some(path)
    }

    /// Public URL path of a stored document
    pub fn download_url(file_name: &str) -> String {
        format!("/downloads/{}", file_name)
    }
}
