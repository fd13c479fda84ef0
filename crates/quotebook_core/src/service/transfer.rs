//! JSON import/export of quote collections.
//!
//! # Responsibility
//! - Render the full collection as pretty-printed JSON.
//! - Parse user-supplied JSON files into quotes for appending.
//!
//! # Invariants
//! - Export ignores the active category filter.
//! - Import checks shape only (array of `{text, category}` strings); content
//!   is neither validated nor deduplicated.
//! - A failed import never yields a partial collection.

use crate::model::quote::{Quote, QuoteCollection};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug)]
pub enum TransferError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Parse(err) => write!(f, "import file is not a JSON quote array: {err}"),
            Self::Encode(err) => write!(f, "failed to encode quotes: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) | Self::Encode(err) => Some(err),
        }
    }
}

/// Pretty-prints the full collection.
pub fn export_json(quotes: &[Quote]) -> TransferResult<String> {
    serde_json::to_string_pretty(quotes).map_err(TransferError::Encode)
}

/// Writes the export document to `path`, replacing any existing file.
pub fn write_export(path: &Path, quotes: &[Quote]) -> TransferResult<()> {
    let document = export_json(quotes)?;
    fs::write(path, document).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an import document.
pub fn parse_import(text: &str) -> TransferResult<QuoteCollection> {
    serde_json::from_str(text).map_err(TransferError::Parse)
}

/// Reads `path` as UTF-8 and parses it as an import document.
pub fn read_import(path: &Path) -> TransferResult<QuoteCollection> {
    let text = fs::read_to_string(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&text)
}

#[cfg(test)]
mod tests {
    use super::{export_json, parse_import, read_import, write_export, TransferError};
    use crate::model::quote::{seed_quotes, Quote};

    #[test]
    fn export_is_pretty_printed_with_wire_fields() {
        let document = export_json(&[Quote::new("Hello", "Test")]).unwrap();
        assert_eq!(
            document,
            "[\n  {\n    \"text\": \"Hello\",\n    \"category\": \"Test\"\n  }\n]"
        );
    }

    #[test]
    fn parse_import_accepts_unvalidated_content() {
        let quotes = parse_import(r#"[{"text":"","category":"Empty"}]"#).unwrap();
        assert_eq!(quotes, vec![Quote::new("", "Empty")]);
    }

    #[test]
    fn parse_import_rejects_wrong_shape() {
        for bad in ["not json", r#"{"text":"a","category":"b"}"#, r#"[{"text":1}]"#] {
            let err = parse_import(bad).unwrap_err();
            assert!(matches!(err, TransferError::Parse(_)), "input: {bad}");
        }
    }

    #[test]
    fn file_round_trip_preserves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");

        write_export(&path, &seed_quotes()).unwrap();
        assert_eq!(read_import(&path).unwrap(), seed_quotes());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = read_import(&path).unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
