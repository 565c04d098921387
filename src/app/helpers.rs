use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::FileEntry;

pub(crate) fn log_path() -> Result<PathBuf> {
    if let Some(mut dir) = dirs::state_dir().or_else(dirs::data_local_dir) {
        dir.push("sftp-up");
        dir.push("status.log");
        return Ok(dir);
    }
    let mut fallback = std::env::current_dir().context("current dir")?;
    fallback.push("sftp-up.log");
    Ok(fallback)
}

pub(crate) fn resolve_picker_start() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    std::env::current_dir().context("current dir")
}

pub(crate) fn read_dir_entries(dir: &Path, show_hidden: bool) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).context("read dir")? {
        let entry = entry.context("read dir entry")?;
        let file_type = entry.file_type().context("read file type")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        entries.push(FileEntry {
            name,
            path: entry.path(),
            is_dir: file_type.is_dir(),
        });
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir_with(names: &[&str]) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("sftp-up-helpers-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn read_dir_entries_skips_hidden_by_default() {
        let dir = temp_dir_with(&["b.txt", ".hidden", "a.txt"]);
        let entries = read_dir_entries(&dir, false).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        let entries = read_dir_entries(&dir, true).unwrap();
        assert_eq!(entries.len(), 3);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn resolve_picker_start_returns_a_directory() {
        let start = resolve_picker_start().unwrap();
        assert!(start.is_dir());
    }
}
