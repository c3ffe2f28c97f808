use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercases `input`, strips diacritics and joins the remaining ASCII
/// alphanumeric runs with `separator`.
///
/// Leading and trailing separators never appear in the output.
pub(crate) fn fold_to_ascii(input: &str, separator: char) -> String {
    let mut folded = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !folded.is_empty() {
                folded.push(separator);
            }
            pending_separator = false;
            folded.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    folded
}

/// Parses a decimal that may use a comma as its decimal mark (`12,5`).
///
/// Returns `None` for empty, non-numeric or non-finite input.
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::{fold_to_ascii, parse_decimal};

    #[test]
    fn fold_drops_accents_and_collapses_runs() {
        assert_eq!(fold_to_ascii("  Piña Colada!! ", '-'), "pina-colada");
        assert_eq!(fold_to_ascii("Dernière mise à jour", '_'), "derniere_mise_a_jour");
        assert_eq!(fold_to_ascii("--", '-'), "");
    }

    #[test]
    fn decimal_accepts_comma_mark() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal(" 40 "), Some(40.0));
        assert_eq!(parse_decimal("1,000.5"), None);
        assert_eq!(parse_decimal("strong"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
