//! Firm and result records.

use std::fmt;

use serde::Serialize;

/// Name of the column that identifies a firm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdColumn {
    /// Real tax identifier
    #[serde(rename = "nif")]
    Nif,
    /// Pseudonymous surrogate identifier
    #[serde(rename = "nif_anon")]
    NifAnon,
}

impl IdColumn {
    /// Column header as written in CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdColumn::Nif => "nif",
            IdColumn::NifAnon => "nif_anon",
        }
    }

    /// Pick the identifier column from a header row, preferring `nif`.
    ///
    /// Returns the column kind and its position.
    pub fn detect<'a, I>(headers: I) -> Option<(Self, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut anon = None;
        for (idx, header) in headers.into_iter().enumerate() {
            match header.trim() {
                "nif" => return Some((IdColumn::Nif, idx)),
                "nif_anon" if anon.is_none() => anon = Some((IdColumn::NifAnon, idx)),
                _ => {}
            }
        }
        anon
    }
}

impl fmt::Display for IdColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the input mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmRecord {
    /// `nif` or `nif_anon` value
    pub identifier: String,
    /// Web-archive URL embedding the firm's original page
    pub archive_url: String,
}

/// One harvested result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SercResult {
    pub identifier: String,
    pub domain: String,
    pub serc_count: u64,
}

impl SercResult {
    /// Header row of the results file for the given identifier column.
    pub fn headers(id_column: IdColumn) -> [&'static str; 3] {
        [id_column.as_str(), "domain", "serc_count"]
    }

    /// Fields in header order.
    pub fn to_record(&self) -> [String; 3] {
        [
            self.identifier.clone(),
            self.domain.clone(),
            self.serc_count.to_string(),
        ]
    }
}
