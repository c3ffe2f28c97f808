use std::fmt;

use barback_logging::barback_debug;
use serde::Serialize;

/// Bytes of the document inspected when sniffing the delimiter.
pub const SNIFF_SAMPLE_LEN: usize = 2048;

/// Share of records that must agree on a delimiter count.
const MIN_CONSISTENCY_PERCENT: usize = 90;

/// Field separators a source document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delimiter {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = "\t")]
    Tab,
}

impl Delimiter {
    pub const CANDIDATES: [Delimiter; 3] =
        [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Tab];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Semicolon => write!(f, "semicolon"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}

/// Returns the leading slice of `text` used for sniffing, cut on a char boundary.
pub fn sniff_sample(text: &str) -> &str {
    if text.len() <= SNIFF_SAMPLE_LEN {
        return text;
    }
    let mut end = SNIFF_SAMPLE_LEN;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Picks the delimiter of a document from a sample of its leading text.
///
/// Never fails: when sniffing is inconclusive the first line decides
/// between semicolon and comma, and comma is the final default.
pub fn detect_delimiter(sample: &str) -> Delimiter {
    if let Some(delimiter) = sniff(sample) {
        return delimiter;
    }
    let fallback = first_line_fallback(sample);
    barback_debug!("Delimiter sniffing inconclusive, falling back to {}", fallback);
    fallback
}

/// Statistical sniffing: the winning candidate appears the same non-zero
/// number of times (outside quotes) in nearly every record, and strictly
/// more consistently than any other candidate.
fn sniff(sample: &str) -> Option<Delimiter> {
    let mut scored: Vec<(Delimiter, usize)> = Delimiter::CANDIDATES
        .iter()
        .filter_map(|&delimiter| {
            let counts = record_counts(sample, delimiter.as_char());
            consistency(&counts).map(|agreeing| (delimiter, agreeing))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    match scored.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        [(best, best_score), (_, runner_up), ..] if best_score > runner_up => Some(*best),
        _ => None,
    }
}

/// Number of unquoted `delimiter` occurrences per non-blank record.
///
/// A trailing partial record is dropped when the sample was cut mid-line,
/// unless it is the only record.
fn record_counts(sample: &str, delimiter: char) -> Vec<usize> {
    let mut counts = Vec::new();
    let mut current = 0;
    let mut line_len = 0;
    let mut in_quotes = false;

    for c in sample.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                line_len += 1;
            }
            '\n' if !in_quotes => {
                if line_len > 0 {
                    counts.push(current);
                }
                current = 0;
                line_len = 0;
            }
            '\r' if !in_quotes => {}
            c => {
                if c == delimiter && !in_quotes {
                    current += 1;
                }
                line_len += 1;
            }
        }
    }
    if line_len > 0 && counts.is_empty() {
        counts.push(current);
    }
    counts
}

/// How many records agree on the modal count, or `None` if the mode is
/// zero or too few records agree.
fn consistency(counts: &[usize]) -> Option<usize> {
    if counts.is_empty() {
        return None;
    }
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &count in counts {
        match tally.iter_mut().find(|(value, _)| *value == count) {
            Some((_, seen)) => *seen += 1,
            None => tally.push((count, 1)),
        }
    }
    // Most frequent count; the larger count wins a frequency tie.
    let (mode, agreeing) = tally
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))?;

    if mode == 0 || agreeing * 100 < counts.len() * MIN_CONSISTENCY_PERCENT {
        return None;
    }
    Some(agreeing)
}

fn first_line_fallback(sample: &str) -> Delimiter {
    let first_line = sample.lines().next().unwrap_or_default();
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}
