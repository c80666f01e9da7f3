use reptools_core::{
    parse_source, AuthorParseError, HeaderField, Rep, RepErrorKind, RepStatus, RepType,
};

const FULL_HEADER: &str = "REP: 105
Title: Coordinate Frames for Mobile Platforms
Version: $Revision$
Last-Modified: $Date$
Author: Wim Meeussen <wim@example.org>, Jane van Doe <Jane@Example.org>
Discussions-To: ros-users@code.ros.org
Status: Active
Type: Informational
Content-Type: text/x-rst
Created: 27-Oct-2010
Post-History: 27-Oct-2010

Abstract
========

This body is not parsed.
";

fn header(rep: &str, kind: &str, status: &str, author: &str) -> String {
    format!(
        "REP: {rep}\nTitle: Test proposal\nAuthor: {author}\nStatus: {status}\nType: {kind}\nCreated: 01-Jan-2020\n\nBody\n"
    )
}

#[test]
fn parses_full_header() {
    let rep = Rep::parse("rep-0105.txt", FULL_HEADER).unwrap();

    assert_eq!(rep.number, 105);
    assert_eq!(rep.title, "Coordinate Frames for Mobile Platforms");
    assert_eq!(rep.kind, RepType::Informational);
    assert_eq!(rep.status, RepStatus::Active);
    assert_eq!(rep.source_id, "rep-0105.txt");
    assert_eq!(rep.authors.len(), 2);
    assert_eq!(rep.authors[1].last, "van Doe");
    assert_eq!(rep.authors[1].email, "jane@example.org");
    assert_eq!(rep.headers.created, "27-Oct-2010");
    assert_eq!(rep.headers.get(HeaderField::ContentType), Some("text/x-rst"));
    assert_eq!(rep.headers.replaces, None);

    assert_eq!(rep.type_abbr(), 'I');
    assert_eq!(rep.status_abbr(), ' ');
    assert_eq!(rep.author_abbr(), "Meeussen, van Doe");
    assert!(rep.validate().is_ok());
}

#[test]
fn abbreviations_follow_type_and_status() {
    let rep = Rep::parse(
        "rep-0003.txt",
        &header("3", "Standards Track", "Rejected", "Aahz"),
    )
    .unwrap();
    assert_eq!(rep.type_abbr(), 'S');
    assert_eq!(rep.status_abbr(), 'R');
    assert_eq!(rep.author_abbr(), "Aahz");
}

#[test]
fn active_standards_track_is_invalid() {
    let err = Rep::parse("rep-0004.txt", &header("4", "Standards Track", "Active", "Aahz"))
        .unwrap_err();
    assert_eq!(err.number, Some(4));
    assert!(matches!(
        err.kind,
        RepErrorKind::InvalidField {
            field: HeaderField::Status,
            ..
        }
    ));
    assert!(err.to_string().starts_with("REP 4: "));
}

#[test]
fn non_integer_number_has_no_known_number() {
    let err = Rep::parse("rep-00x1.txt", &header("x1", "Process", "Draft", "Aahz")).unwrap_err();
    assert_eq!(err.number, None);
    assert_eq!(err.kind, RepErrorKind::NumberParse("x1".to_string()));
    assert!(err.to_string().starts_with("(rep-00x1.txt): "));
}

#[test]
fn unknown_type_and_status_are_invalid_fields() {
    let err = Rep::parse("a", &header("5", "Standards", "Draft", "Aahz")).unwrap_err();
    assert_eq!(
        err.kind,
        RepErrorKind::InvalidField {
            field: HeaderField::Type,
            value: "Standards".to_string(),
            reason: "is not a valid Type value",
        }
    );

    let err = Rep::parse("a", &header("5", "Process", "Incomplete", "Aahz")).unwrap_err();
    assert!(matches!(
        err.kind,
        RepErrorKind::InvalidField {
            field: HeaderField::Status,
            ..
        }
    ));
}

#[test]
fn missing_required_header_is_reported() {
    let text = header("6", "Process", "Draft", "Aahz").replace("Created: 01-Jan-2020\n", "");
    let err = Rep::parse("rep-0006.txt", &text).unwrap_err();
    assert_eq!(err.kind, RepErrorKind::MissingHeader(HeaderField::Created));
    assert_eq!(err.number, None);
}

#[test]
fn out_of_order_and_duplicate_headers_are_rejected() {
    let swapped = header("7", "Process", "Draft", "Aahz").replace(
        "Title: Test proposal\nAuthor: Aahz\n",
        "Author: Aahz\nTitle: Test proposal\n",
    );
    let err = Rep::parse("rep-0007.txt", &swapped).unwrap_err();
    assert_eq!(
        err.kind,
        RepErrorKind::HeaderOrder {
            found: HeaderField::Title,
            after: HeaderField::Author,
        }
    );

    let doubled = header("7", "Process", "Draft", "Aahz")
        .replace("Title: Test proposal\n", "Title: Test proposal\nTitle: Again\n");
    let err = Rep::parse("rep-0007.txt", &doubled).unwrap_err();
    assert_eq!(err.kind, RepErrorKind::DuplicateHeader(HeaderField::Title));
}

#[test]
fn empty_author_header_is_missing_author() {
    let err = Rep::parse("rep-0008.txt", &header("8", "Process", "Draft", "")).unwrap_err();
    assert_eq!(err.kind, RepErrorKind::MissingAuthor);
    assert_eq!(err.number, Some(8));
}

#[test]
fn uncapitalized_author_is_author_parse_error() {
    let err =
        Rep::parse("rep-0009.txt", &header("9", "Process", "Draft", "jane doe")).unwrap_err();
    assert_eq!(
        err.kind,
        RepErrorKind::AuthorParse(AuthorParseError::NoCapitalizedSurname(
            "jane doe".to_string()
        ))
    );
}

#[test]
fn suffix_after_comma_joins_previous_author() {
    let rep = Rep::parse(
        "rep-0010.txt",
        &header("10", "Process", "Draft", "John Smith, Jr., Jane Doe"),
    )
    .unwrap();
    let names: Vec<&str> = rep.authors.iter().map(|a| a.full_name.as_str()).collect();
    assert_eq!(names, vec!["John Smith, Jr.", "Jane Doe"]);
    assert_eq!(rep.authors[0].last_first, "Smith, John, Jr.");
}

#[test]
fn folded_author_header_is_unfolded() {
    let text = header("11", "Process", "Draft", "Jane Doe <jd@example.org>,\n    John Roe <jr@example.org>");
    let rep = Rep::parse("rep-0011.txt", &text).unwrap();
    assert_eq!(rep.authors.len(), 2);
    assert_eq!(rep.authors[1].email, "jr@example.org");
}

#[test]
fn title_abbreviation_wraps_on_words() {
    let text = header("12", "Process", "Draft", "Aahz").replace(
        "Title: Test proposal",
        "Title: Standardized coordinate frame conventions for mobile platforms and their sensors",
    );
    let rep = Rep::parse("rep-0012.txt", &text).unwrap();
    assert_eq!(
        rep.title_abbr(55),
        "Standardized coordinate frame conventions for ..."
    );
    assert_eq!(rep.title_abbr(200), rep.title);
}

#[test]
fn title_abbreviation_breaks_after_hyphens_and_keeps_spacing() {
    let titled = |title: &str| {
        let text = header("13", "Process", "Draft", "Aahz")
            .replace("Title: Test proposal", &format!("Title: {title}"));
        Rep::parse("rep-0013.txt", &text).unwrap()
    };

    let rep = titled(
        "Thread-safe message passing with zero-copy intra-process-communication support",
    );
    assert_eq!(
        rep.title_abbr(55),
        "Thread-safe message passing with zero-copy intra- ..."
    );

    let rep = titled("A  double  spaced title that goes on and on and on and on and on forever");
    assert_eq!(
        rep.title_abbr(55),
        "A  double  spaced title that goes on and on and on ..."
    );
}

#[test]
fn parse_source_checks_file_number() {
    let err = parse_source("rep-0013.txt", &header("14", "Process", "Draft", "Aahz")).unwrap_err();
    assert_eq!(
        err.kind,
        RepErrorKind::NumberMismatch { source_number: 13 }
    );
    assert!(parse_source("rep-0014.txt", &header("14", "Process", "Draft", "Aahz")).is_ok());
}

#[test]
fn serialized_record_uses_header_vocabulary() {
    let rep = Rep::parse("rep-0105.txt", FULL_HEADER).unwrap();
    let json = serde_json::to_value(&rep).unwrap();
    assert_eq!(json["number"], 105);
    assert_eq!(json["type"], "Informational");
    assert_eq!(json["status"], "Active");
    assert_eq!(json["authors"][0]["last_first"], "Meeussen, Wim");
    assert_eq!(json["headers"]["created"], "27-Oct-2010");

    let standards = Rep::parse(
        "rep-0003.txt",
        &header("3", "Standards Track", "Final", "Aahz"),
    )
    .unwrap();
    assert_eq!(
        serde_json::to_value(&standards).unwrap()["type"],
        "Standards Track"
    );
}
