// src/pipeline/pseudonymize.rs

//! One-shot pseudonymization of the private firm table.
//!
//! Produces a public sample keyed by surrogate IDs and a private key that
//! maps each real `nif` to its surrogate. Every run rebuilds the mapping
//! from scratch.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{IdColumn, PseudonymizeConfig};
use crate::storage::ARCHIVE_URL_COLUMN;
use crate::utils::fs::ensure_parent_dir;

/// Injective mapping from real IDs to sequential surrogate IDs.
#[derive(Debug, Clone)]
pub struct SurrogateMap {
    prefix: String,
    by_nif: HashMap<String, usize>,
    entries: Vec<(String, String)>,
}

impl SurrogateMap {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            by_nif: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Surrogate for `nif`, allocating the next one on first sight.
    pub fn assign(&mut self, nif: &str) -> &str {
        let idx = match self.by_nif.get(nif) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                let surrogate = format!("{}_{:04}", self.prefix, idx);
                self.entries.push((nif.to_string(), surrogate));
                self.by_nif.insert(nif.to_string(), idx);
                idx
            }
        };
        &self.entries[idx].1
    }

    pub fn get(&self, nif: &str) -> Option<&str> {
        self.by_nif
            .get(nif)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(nif, nif_anon)` pairs in allocation order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Row of the public sample.
#[derive(Debug, Serialize)]
struct PublicRow<'a> {
    nif_anon: &'a str,
    archive_url: &'a str,
}

/// Row of the private key.
#[derive(Debug, Serialize)]
struct KeyRow<'a> {
    nif: &'a str,
    nif_anon: &'a str,
}

/// What a pseudonymization run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudonymizeSummary {
    pub input_rows: usize,
    pub distinct_firms: usize,
    pub sample_rows: usize,
}

/// Build the surrogate mapping, then write the public sample and private key.
pub fn run_pseudonymize(config: &PseudonymizeConfig) -> Result<PseudonymizeSummary> {
    for output in [&config.public_output, &config.private_key_output] {
        if output == &config.private_input {
            return Err(AppError::config(format!(
                "refusing to overwrite the private input {}",
                config.private_input.display()
            )));
        }
    }

    let rows = load_private_rows(&config.private_input)?;
    log::info!(
        "Loaded {} rows from {}",
        rows.len(),
        config.private_input.display()
    );

    let mut map = SurrogateMap::new(&config.id_prefix);
    for (nif, _) in &rows {
        map.assign(nif);
    }

    ensure_parent_dir(&config.public_output)?;
    let mut public = csv::Writer::from_path(&config.public_output)?;
    let mut sample_rows = 0;
    for (nif, archive_url) in rows.iter().take(config.sample_size) {
        let nif_anon = map
            .get(nif)
            .ok_or_else(|| AppError::validation(format!("no surrogate for row {nif}")))?;
        public.serialize(PublicRow {
            nif_anon,
            archive_url,
        })?;
        sample_rows += 1;
    }
    public.flush()?;
    log::info!(
        "Public sample created in {} ({} rows)",
        config.public_output.display(),
        sample_rows
    );

    ensure_parent_dir(&config.private_key_output)?;
    let mut key = csv::Writer::from_path(&config.private_key_output)?;
    for (nif, nif_anon) in map.entries() {
        key.serialize(KeyRow { nif, nif_anon })?;
    }
    key.flush()?;
    log::info!(
        "Private key written to {} ({} firms)",
        config.private_key_output.display(),
        map.len()
    );

    Ok(PseudonymizeSummary {
        input_rows: rows.len(),
        distinct_firms: map.len(),
        sample_rows,
    })
}

/// Read `(nif, archive_url)` pairs; both columns are required.
fn load_private_rows(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| AppError::missing_column(path, name))
    };
    let nif_idx = position(IdColumn::Nif.as_str())?;
    let url_idx = position(ARCHIVE_URL_COLUMN)?;

    let mut rows = Vec::new();
    let mut blank = 0usize;
    for record in reader.records() {
        let record = record?;
        let nif = record.get(nif_idx).unwrap_or("").trim();
        if nif.is_empty() {
            blank += 1;
            continue;
        }
        let archive_url = record.get(url_idx).unwrap_or("").trim();
        rows.push((nif.to_string(), archive_url.to_string()));
    }

    if blank > 0 {
        log::warn!("Dropped {} row(s) with a blank nif", blank);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_assign_is_sequential_and_stable() {
        let mut map = SurrogateMap::new("FIRM");
        assert_eq!(map.assign("B111"), "FIRM_0000");
        assert_eq!(map.assign("A222"), "FIRM_0001");
        assert_eq!(map.assign("B111"), "FIRM_0000");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("A222"), Some("FIRM_0001"));
        assert_eq!(map.get("C333"), None);
    }

    fn config(dir: &TempDir, sample_size: usize) -> PseudonymizeConfig {
        PseudonymizeConfig {
            private_input: dir.path().join("private/nif_url_map.csv"),
            private_key_output: dir.path().join("private/private_key.csv"),
            public_output: dir.path().join("data/sample_data.csv"),
            sample_size,
            id_prefix: "FIRM".to_string(),
        }
    }

    fn write_private(config: &PseudonymizeConfig, content: &str) {
        fs::create_dir_all(config.private_input.parent().unwrap()).unwrap();
        fs::write(&config.private_input, content).unwrap();
    }

    #[test]
    fn test_run_writes_public_sample_and_key() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, 50);
        write_private(
            &config,
            "nif,archive_url,employees\n\
             B111,https://web.archive.org/web/2016/http://a.es,10\n\
             A222,https://web.archive.org/web/2016/http://b.es,3\n\
             B111,https://web.archive.org/web/2017/http://a.es/x,10\n",
        );

        let summary = run_pseudonymize(&config).unwrap();
        assert_eq!(
            summary,
            PseudonymizeSummary {
                input_rows: 3,
                distinct_firms: 2,
                sample_rows: 3,
            }
        );

        let public = fs::read_to_string(&config.public_output).unwrap();
        assert_eq!(
            public,
            "nif_anon,archive_url\n\
             FIRM_0000,https://web.archive.org/web/2016/http://a.es\n\
             FIRM_0001,https://web.archive.org/web/2016/http://b.es\n\
             FIRM_0000,https://web.archive.org/web/2017/http://a.es/x\n"
        );
        assert!(!public.contains("B111"));

        let key = fs::read_to_string(&config.private_key_output).unwrap();
        assert_eq!(key, "nif,nif_anon\nB111,FIRM_0000\nA222,FIRM_0001\n");
    }

    #[test]
    fn test_mapping_is_bijective() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, 5);
        let mut content = String::from("nif,archive_url\n");
        for i in 0..30 {
            content.push_str(&format!("N{},u{}\n", i % 12, i));
        }
        write_private(&config, &content);

        let summary = run_pseudonymize(&config).unwrap();
        assert_eq!(summary.distinct_firms, 12);
        assert_eq!(summary.sample_rows, 5);

        let key = fs::read_to_string(&config.private_key_output).unwrap();
        let pairs: Vec<(String, String)> = key
            .lines()
            .skip(1)
            .map(|line| {
                let (nif, anon) = line.split_once(',').unwrap();
                (nif.to_string(), anon.to_string())
            })
            .collect();
        let nifs: HashSet<_> = pairs.iter().map(|(n, _)| n.clone()).collect();
        let anons: HashSet<_> = pairs.iter().map(|(_, a)| a.clone()).collect();
        assert_eq!(pairs.len(), 12);
        assert_eq!(nifs.len(), 12);
        assert_eq!(anons.len(), 12);

        let public = fs::read_to_string(&config.public_output).unwrap();
        assert!(public.starts_with("nif_anon,archive_url\n"));
        assert!(!public.lines().next().unwrap().split(',').any(|h| h == "nif"));
    }

    #[test]
    fn test_missing_nif_column_fails() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, 50);
        write_private(&config, "cif,archive_url\nA,x\n");

        let err = run_pseudonymize(&config).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn { .. }));
        assert!(!config.public_output.exists());
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(&tmp, 50);
        write_private(&config, "nif,archive_url\nA,x\n");
        config.public_output = config.private_input.clone();

        assert!(run_pseudonymize(&config).is_err());
        let input = fs::read_to_string(&config.private_input).unwrap();
        assert_eq!(input, "nif,archive_url\nA,x\n");
    }
}
