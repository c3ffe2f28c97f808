use crate::text::fold_to_ascii;

/// The recognised recipe columns, in display order.
pub const CANONICAL_FIELDS: &[&str] = &[
    "name",
    "slug",
    "glass",
    "method",
    "ice",
    "garnish",
    "ingredients",
    "spec_ml",
    "spec_oz",
    "history",
    "tags",
    "abv_est",
    "notes",
    "source",
    "last_update",
    "image_url",
];

/// Normalised spellings that should be read as a canonical field.
///
/// Keys are already in normalised form. No key may be a canonical name.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("specml", "spec_ml"),
    ("specoz", "spec_oz"),
    ("lastupdate", "last_update"),
    ("image", "image_url"),
    ("photo", "image_url"),
    ("nom", "name"),
    ("verre", "glass"),
    ("methode", "method"),
    ("glace", "ice"),
    ("garniture", "garnish"),
    ("historique", "history"),
    ("histoire", "history"),
    ("abv", "abv_est"),
    ("degre", "abv_est"),
    ("remarques", "notes"),
    ("derniere_mise_a_jour", "last_update"),
];

/// Returns true if `name` is one of [`CANONICAL_FIELDS`].
pub fn is_canonical_field(name: &str) -> bool {
    CANONICAL_FIELDS.contains(&name)
}

/// Normalises one column header: trimmed, lowercased, accents stripped,
/// punctuation runs collapsed to `_`, then passed through the alias table.
///
/// `"Spec (ml)"` and `"spec-ml"` both become `"spec_ml"`.
pub fn normalize_header(header: &str) -> String {
    let folded = fold_to_ascii(header, '_');
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(folded)
}

/// Column-ordered rename map from the document's headers to row keys.
///
/// A header whose normalised form is a canonical field gets that name,
/// unless an earlier column already claimed it. Every other header keeps
/// its literal spelling so unrecognised columns stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderMap {
    columns: Vec<HeaderColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderColumn {
    original: String,
    key: String,
}

impl HeaderMap {
    pub fn build<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut claimed: Vec<String> = Vec::new();
        let columns = headers
            .into_iter()
            .map(|header| {
                let original = header.as_ref().to_string();
                let normalized = normalize_header(&original);
                let key = if is_canonical_field(&normalized) && !claimed.contains(&normalized) {
                    claimed.push(normalized.clone());
                    normalized
                } else {
                    original.clone()
                };
                HeaderColumn { original, key }
            })
            .collect();

        Self { columns }
    }

    /// Row key for the column at `index`.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|column| column.key.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.key.as_str())
    }

    /// Header cells exactly as they appear in the document.
    pub fn originals(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.original.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
