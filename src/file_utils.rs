use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::localization::LocalizedEntity;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @reads: Whole file as UTF-8
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @writes: Content via a temp file in the same directory, then renames it into place
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(dir)?;

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(path)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }

    // @reads: Localized entity JSON payload
    pub fn load_entity<P: AsRef<Path>>(path: P) -> Result<LocalizedEntity> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid localized entity in {}", path.display()))
    }

    // @writes: Localized entity JSON payload, pretty-printed
    pub fn save_entity<P: AsRef<Path>>(path: P, entity: &LocalizedEntity) -> Result<()> {
        let content = serde_json::to_string_pretty(entity)?;
        Self::write_atomic(path, &content)
    }
}
