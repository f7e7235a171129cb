//! Input mapping loader.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{FirmRecord, IdColumn};

/// Column holding the archived page URL.
pub const ARCHIVE_URL_COLUMN: &str = "archive_url";

/// Firms to harvest, in input order.
#[derive(Debug, Clone)]
pub struct FirmMapping {
    /// Identifier column found in the input header
    pub id_column: IdColumn,
    pub records: Vec<FirmRecord>,
}

impl FirmMapping {
    /// Load the mapping CSV.
    ///
    /// Fails when neither `nif` nor `nif_anon` is present, or when
    /// `archive_url` is missing. Rows with a blank identifier are dropped.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();

        let (id_column, id_idx) = IdColumn::detect(headers.iter())
            .ok_or_else(|| AppError::missing_column(path, "nif or nif_anon"))?;
        let url_idx = headers
            .iter()
            .position(|h| h.trim() == ARCHIVE_URL_COLUMN)
            .ok_or_else(|| AppError::missing_column(path, ARCHIVE_URL_COLUMN))?;

        let mut records = Vec::new();
        let mut blank_ids = 0usize;
        for row in reader.records() {
            let row = row?;
            let identifier = row.get(id_idx).unwrap_or("").trim();
            if identifier.is_empty() {
                blank_ids += 1;
                continue;
            }
            records.push(FirmRecord {
                identifier: identifier.to_string(),
                archive_url: row.get(url_idx).unwrap_or("").trim().to_string(),
            });
        }

        if blank_ids > 0 {
            log::warn!(
                "Dropped {} row(s) with a blank {} in {}",
                blank_ids,
                id_column,
                path.display()
            );
        }

        Ok(Self { id_column, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose identifier is not in `seen`.
    pub fn remaining(&self, seen: &HashSet<String>) -> usize {
        self.records
            .iter()
            .filter(|r| !seen.contains(&r.identifier))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_real_id_column() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "nif,archive_url,sector\nB123,https://web.archive.org/web/2017/http://a.com,retail\n",
        );

        let mapping = FirmMapping::load(&path).unwrap();
        assert_eq!(mapping.id_column, IdColumn::Nif);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.records[0].identifier, "B123");
    }

    #[test]
    fn test_load_anon_id_column() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "nif_anon,archive_url\nFIRM_0000,x\nFIRM_0001,y\n");

        let mapping = FirmMapping::load(&path).unwrap();
        assert_eq!(mapping.id_column, IdColumn::NifAnon);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_load_missing_id_column_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "cif,archive_url\nA1,x\n");

        let err = FirmMapping::load(&path).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_missing_url_column_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "nif,url\nA1,x\n");

        let err = FirmMapping::load(&path).unwrap_err();
        assert!(err.to_string().contains(ARCHIVE_URL_COLUMN));
    }

    #[test]
    fn test_load_drops_blank_identifiers() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "nif,archive_url\n,x\nB1,y\n");

        let mapping = FirmMapping::load(&path).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_remaining_excludes_seen() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "nif,archive_url\nA,x\nB,y\nC,z\n");
        let mapping = FirmMapping::load(&path).unwrap();

        let seen: HashSet<String> = ["B".to_string(), "Z".to_string()].into();
        assert_eq!(mapping.remaining(&seen), 2);
    }
}
