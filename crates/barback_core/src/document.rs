use std::sync::Arc;

use barback_logging::barback_debug;
use thiserror::Error;

use crate::delimiter::{detect_delimiter, sniff_sample, Delimiter};
use crate::headers::HeaderMap;
use crate::recipe::row_name;

#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("malformed CSV document: {0}")]
    Csv(#[source] Arc<csv::Error>),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Csv(Arc::new(err))
    }
}

/// One data row keyed by the remapped headers, in column order.
///
/// Lookups return the first cell stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A delimited document split into its header and the rows worth keeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub delimiter: Delimiter,
    /// Header cells exactly as they appear in the document, with their row keys.
    pub header_map: HeaderMap,
    /// Rows with a non-blank name, in document order.
    pub rows: Vec<RawRow>,
    /// Data rows dropped because their name was blank.
    pub skipped_rows: usize,
}

/// Splits raw document text into header and rows.
///
/// Strips a leading byte-order mark, sniffs the delimiter, remaps every
/// row's keys through the [`HeaderMap`] and drops rows without a name.
/// Short rows are padded with empty cells; cells beyond the header are ignored.
pub fn parse_document(text: &str) -> Result<ParsedDocument, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(sniff_sample(text));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header_map = match records.next() {
        Some(header) => HeaderMap::build(header?.iter()),
        None => HeaderMap::default(),
    };

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for record in records {
        let record = record?;
        let row: RawRow = header_map
            .keys()
            .enumerate()
            .map(|(index, key)| (key, record.get(index).unwrap_or_default()))
            .collect();
        if row_name(&row).is_some() {
            rows.push(row);
        } else {
            skipped_rows += 1;
        }
    }

    barback_debug!(
        "Parsed document: delimiter={} columns={} rows={} skipped={}",
        delimiter,
        header_map.len(),
        rows.len(),
        skipped_rows
    );

    Ok(ParsedDocument {
        delimiter,
        header_map,
        rows,
        skipped_rows,
    })
}
