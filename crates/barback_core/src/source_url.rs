use url::Url;

const SHEETS_HOST: &str = "docs.google.com";

/// Trailing path segments of spreadsheet links that render HTML rather than CSV.
const HTML_VIEWS: &[&str] = &["pubhtml", "edit", "view", "htmlview"];

/// Rewrites a spreadsheet "publish to the web" or share link into its
/// direct CSV export form, keeping the sheet `gid` (default `0`).
///
/// Anything else, including unparseable input, is returned unchanged.
pub fn resolve_source_url(configured: &str) -> String {
    rewrite_sheet_link(configured).unwrap_or_else(|| configured.to_string())
}

fn rewrite_sheet_link(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if url.host_str()? != SHEETS_HOST || is_csv_export(&url) {
        return None;
    }
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let gid = sheet_gid(&url);

    match segments.as_slice() {
        ["spreadsheets", "d", "e", document_id, ..] => Some(format!(
            "https://{SHEETS_HOST}/spreadsheets/d/e/{document_id}/pub?gid={gid}&single=true&output=csv"
        )),
        ["spreadsheets", "d", document_id, view, ..] if HTML_VIEWS.contains(view) => Some(format!(
            "https://{SHEETS_HOST}/spreadsheets/d/{document_id}/export?format=csv&gid={gid}"
        )),
        _ => None,
    }
}

fn is_csv_export(url: &Url) -> bool {
    url.query_pairs()
        .any(|(key, value)| (key == "output" || key == "format") && value == "csv")
}

/// Sheet id from `?gid=` or from a `#gid=` fragment; `0` when absent or not numeric.
fn sheet_gid(url: &Url) -> String {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.into_owned());
    let from_fragment = || {
        url.fragment()?
            .split('&')
            .find_map(|part| part.strip_prefix("gid="))
            .map(str::to_string)
    };

    from_query
        .or_else(from_fragment)
        .filter(|gid| !gid.is_empty() && gid.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_else(|| "0".to_string())
}
