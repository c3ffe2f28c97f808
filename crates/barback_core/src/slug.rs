use crate::text::fold_to_ascii;

/// Derives a URL-safe identifier from a display name.
///
/// The result is lowercase ASCII alphanumerics joined by single hyphens,
/// with accents stripped (`"Piña Colada"` becomes `"pina-colada"`).
/// Distinct names may produce the same slug; callers get no disambiguation.
pub fn slugify(name: &str) -> String {
    fold_to_ascii(name, '-')
}
