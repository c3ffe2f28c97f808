use barback_core::{detect_delimiter, Delimiter};

#[test]
fn semicolon_document_is_detected() {
    assert_eq!(
        detect_delimiter("name;glass\nOld Fashioned;Rocks\n"),
        Delimiter::Semicolon
    );
}

#[test]
fn comma_document_is_detected() {
    let sample = "name,glass,tags\nDaiquiri,Coupe,\"sour, classic\"\nNegroni,Rocks,bitter\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Comma);
}

#[test]
fn tab_document_is_detected() {
    let sample = "name\tglass\tice\nMojito\tHighball\tCrushed\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Tab);
}

#[test]
fn decimal_commas_do_not_fool_the_sniffer() {
    let sample = "name;abv_est;glass\nNegroni;24,5;Rocks\nMartini;30;Coupe\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Semicolon);
}

#[test]
fn ambiguous_sample_falls_back_to_first_line_counts() {
    // Both candidates are equally consistent; the first line decides.
    assert_eq!(detect_delimiter("a;b;c,d\n1;2;3,4\n"), Delimiter::Semicolon);
    assert_eq!(detect_delimiter("a;b,c\n1;2,3\n"), Delimiter::Comma);
}

#[test]
fn unusable_sample_defaults_to_comma() {
    assert_eq!(detect_delimiter(""), Delimiter::Comma);
    assert_eq!(detect_delimiter("name\nMojito\n"), Delimiter::Comma);
}
