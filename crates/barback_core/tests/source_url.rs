use barback_core::resolve_source_url;

#[test]
fn published_share_link_becomes_csv_export() {
    assert_eq!(
        resolve_source_url(
            "https://docs.google.com/spreadsheets/d/e/2PACX-abc123/pubhtml?gid=42&single=true"
        ),
        "https://docs.google.com/spreadsheets/d/e/2PACX-abc123/pub?gid=42&single=true&output=csv"
    );
}

#[test]
fn missing_gid_defaults_to_zero() {
    assert_eq!(
        resolve_source_url("https://docs.google.com/spreadsheets/d/e/2PACX-abc123/pubhtml"),
        "https://docs.google.com/spreadsheets/d/e/2PACX-abc123/pub?gid=0&single=true&output=csv"
    );
}

#[test]
fn old_pubhtml_and_edit_links_use_export_endpoint() {
    assert_eq!(
        resolve_source_url("https://docs.google.com/spreadsheets/d/1AbCdEf/pubhtml"),
        "https://docs.google.com/spreadsheets/d/1AbCdEf/export?format=csv&gid=0"
    );
    assert_eq!(
        resolve_source_url("https://docs.google.com/spreadsheets/d/1AbCdEf/edit#gid=77"),
        "https://docs.google.com/spreadsheets/d/1AbCdEf/export?format=csv&gid=77"
    );
}

#[test]
fn csv_links_and_other_hosts_are_unchanged() {
    let already_csv =
        "https://docs.google.com/spreadsheets/d/e/2PACX-abc123/pub?gid=3&single=true&output=csv";
    assert_eq!(resolve_source_url(already_csv), already_csv);

    let export = "https://docs.google.com/spreadsheets/d/1AbCdEf/export?format=csv&gid=5";
    assert_eq!(resolve_source_url(export), export);

    let elsewhere = "https://example.com/recipes.csv";
    assert_eq!(resolve_source_url(elsewhere), elsewhere);
}

#[test]
fn malformed_urls_pass_through() {
    assert_eq!(resolve_source_url("not a url"), "not a url");
    assert_eq!(resolve_source_url("https://"), "https://");
}
