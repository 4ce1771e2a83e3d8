//! Delimited text import using the csv crate
//!
//! The first record is the header row. Ragged records are accepted and
//! padded; column types are inferred per column.

use super::table::TableContent;
use std::io::Cursor;
use std::path::Path;

/// Error type for delimited text import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub message: String,
    pub line: Option<usize>,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "import error at line {}: {}", line, self.message),
            None => write!(f, "import error: {}", self.message),
        }
    }
}

impl std::error::Error for ImportError {}

/// Field separators understood by the importer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Semicolon => b';',
        }
    }

    /// Delimiter implied by a file extension, if any.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" | "tab" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }

    /// Guess the delimiter by counting candidates in the first lines.
    pub fn detect(content: &str) -> Self {
        let head: String = content.lines().take(5).collect::<Vec<_>>().join("\n");
        let counts = [
            (Delimiter::Tab, head.matches('\t').count()),
            (Delimiter::Pipe, head.matches('|').count()),
            (Delimiter::Semicolon, head.matches(';').count()),
            (Delimiter::Comma, head.matches(',').count()),
        ];
        let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
        if max == 0 {
            return Delimiter::Comma;
        }
        counts
            .iter()
            .find(|(_, n)| *n == max)
            .map(|(d, _)| *d)
            .unwrap_or_default()
    }
}

/// Parse delimited text with a header row.
pub fn parse_delimited(content: &str, delimiter: Delimiter) -> Result<TableContent, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let mut records = reader.records().enumerate();
    let header: Vec<String> = match records.next() {
        Some((_, Ok(record))) => record.iter().map(str::to_string).collect(),
        Some((_, Err(e))) => {
            return Err(ImportError {
                message: e.to_string(),
                line: Some(1),
            })
        }
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for (line_num, result) in records {
        let record = result.map_err(|e| ImportError {
            message: e.to_string(),
            line: Some(line_num + 1),
        })?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    tracing::debug!(
        "parsed {} columns x {} rows ({:?})",
        header.len(),
        rows.len(),
        delimiter
    );
    Ok(TableContent::from_text_rows(&header, &rows))
}

/// Parse tab-separated text, as pasted from another spreadsheet.
pub fn parse_tsv(content: &str) -> Result<TableContent, ImportError> {
    parse_delimited(content, Delimiter::Tab)
}

/// Read a delimited file, choosing the delimiter from the extension or,
/// failing that, from its contents.
pub fn read_file(path: &Path) -> Result<TableContent, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ImportError {
        message: format!("{}: {}", path.display(), e),
        line: None,
    })?;
    let delimiter = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Delimiter::from_extension)
        .unwrap_or_else(|| Delimiter::detect(&content));
    parse_delimited(&content, delimiter)
}
