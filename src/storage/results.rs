//! Append-only results store.
//!
//! The results CSV is never rewritten: batches are appended and the header
//! is written only when the file is first created. A row's presence is what
//! marks its firm as done.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{IdColumn, SercResult};
use crate::utils::fs::{ensure_parent_dir, is_non_empty_file};

/// Identifiers already present in the results file.
#[derive(Debug, Clone, Default)]
pub struct SeenIds {
    /// Identifier column of the existing file, if any
    pub id_column: Option<IdColumn>,
    pub ids: HashSet<String>,
}

/// Results CSV on the local filesystem.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has been created. An empty file counts as absent.
    pub fn exists(&self) -> bool {
        is_non_empty_file(&self.path)
    }

    /// Collect identifiers from the `nif` (preferred) or `nif_anon` column.
    pub fn load_seen(&self) -> Result<SeenIds> {
        if !self.exists() {
            return Ok(SeenIds::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let (id_column, id_idx) = IdColumn::detect(headers.iter())
            .ok_or_else(|| AppError::missing_column(&self.path, "nif or nif_anon"))?;

        let mut ids = HashSet::new();
        for row in reader.records() {
            let row = row?;
            if let Some(id) = row.get(id_idx).map(str::trim).filter(|id| !id.is_empty()) {
                ids.insert(id.to_string());
            }
        }

        Ok(SeenIds {
            id_column: Some(id_column),
            ids,
        })
    }

    /// Append a batch, writing the header first if the file is new.
    pub fn append(&self, id_column: IdColumn, results: &[SercResult]) -> Result<()> {
        if results.is_empty() {
            return Ok(());
        }

        let write_header = !self.exists();
        ensure_parent_dir(&self.path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(SercResult::headers(id_column))?;
        }
        for result in results {
            writer.write_record(result.to_record())?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn result(id: &str, count: u64) -> SercResult {
        SercResult {
            identifier: id.to_string(),
            domain: format!("{id}.com").to_lowercase(),
            serc_count: count,
        }
    }

    #[test]
    fn test_load_seen_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path().join("out.csv"));

        let seen = store.load_seen().unwrap();
        assert!(seen.ids.is_empty());
        assert!(seen.id_column.is_none());
    }

    #[test]
    fn test_append_writes_header_once() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path().join("out.csv"));

        store.append(IdColumn::Nif, &[result("A", 1)]).unwrap();
        store.append(IdColumn::Nif, &[result("B", 0), result("C", 42)]).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "nif,domain,serc_count\nA,a.com,1\nB,b.com,0\nC,c.com,42\n"
        );
    }

    #[test]
    fn test_append_empty_batch_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path().join("out.csv"));

        store.append(IdColumn::Nif, &[]).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_into_empty_file_writes_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "").unwrap();
        let store = ResultStore::new(&path);

        store.append(IdColumn::NifAnon, &[result("FIRM_0001", 3)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("nif_anon,domain,serc_count\n"));
    }

    #[test]
    fn test_load_seen_reads_anon_column() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path().join("out.csv"));
        store
            .append(IdColumn::NifAnon, &[result("FIRM_0000", 1), result("FIRM_0001", 2)])
            .unwrap();

        let seen = store.load_seen().unwrap();
        assert_eq!(seen.id_column, Some(IdColumn::NifAnon));
        assert!(seen.ids.contains("FIRM_0000"));
        assert!(seen.ids.contains("FIRM_0001"));
    }

    #[test]
    fn test_load_seen_without_id_column_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "domain,serc_count\na.com,1\n").unwrap();

        assert!(ResultStore::new(&path).load_seen().is_err());
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path().join("runs/2024/out.csv"));

        store.append(IdColumn::Nif, &[result("A", 1)]).unwrap();
        assert!(store.exists());
    }
}
