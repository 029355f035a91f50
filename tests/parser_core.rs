#![allow(missing_docs)]

use bytes::Bytes;
use formdrop::{parse, parse_with_report, FieldValue, MultipartParser, ParseError, SkipReason};

fn text_part(boundary: &str, name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
    .into_bytes()
}

fn file_part(boundary: &str, name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: audio/mpeg\r\n\r\n"
    )
    .into_bytes();
    out.extend_from_slice(content);
    out.extend_from_slice(b"\r\n");
    out
}

fn closing(boundary: &str) -> Vec<u8> {
    format!("--{boundary}--\r\n").into_bytes()
}

#[test]
fn parses_text_and_binary_file_fields() {
    let content: &[u8] = b"\x00\xff\r\n\r\nID3\r\x0a\n\r--\x7f";
    let mut body = text_part("BOUND", "a", "hello");
    body.extend(file_part("BOUND", "file", "x.mp3", content));
    body.extend(closing("BOUND"));

    let fields = parse(&body, "BOUND").expect("body should parse");

    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get("a"), Some(&FieldValue::text("hello")));
    assert_eq!(
        fields.get("file"),
        Some(&FieldValue::file("x.mp3", Bytes::copy_from_slice(content)))
    );
}

#[test]
fn literal_scenario_yields_single_file() {
    let mut body = Vec::new();
    body.extend_from_slice(
        b"--XYZ123\r\nContent-Disposition: form-data; name=\"file\"; filename=\"song.mp3\"\r\n\r\n",
    );
    body.extend_from_slice(&[0x49, 0x44, 0x33, 0x03]);
    body.extend_from_slice(b"\r\n--XYZ123--");

    let fields = parse(&body, "XYZ123").expect("body should parse");

    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields.get("file"),
        Some(&FieldValue::file(
            "song.mp3",
            Bytes::from_static(&[0x49, 0x44, 0x33, 0x03])
        ))
    );
}

#[test]
fn skips_part_without_header_separator() {
    let mut body = b"--B\r\nContent-Disposition: form-data; name=\"a\"\r\nno blank line\r\n".to_vec();
    body.extend(text_part("B", "b", "ok"));
    body.extend(closing("B"));

    let report = parse_with_report(&body, "B").expect("malformed parts must not abort");

    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.fields.get("b"), Some(&FieldValue::text("ok")));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(report.skipped[0].reason, SkipReason::MissingHeaderSeparator);
}

#[test]
fn later_part_with_same_name_wins() {
    let mut body = text_part("B", "c", "1");
    body.extend(text_part("B", "c", "2"));
    body.extend(closing("B"));

    let fields = parse(&body, "B").expect("body should parse");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields.get("c"), Some(&FieldValue::text("2")));
}

#[test]
fn boundary_text_inside_file_content_is_preserved() {
    let content: &[u8] = b"abc--XYZ123def\r\n--XYZ123x\r\n--XYZ123 tail\r\n\r\nend";
    let mut body = file_part("XYZ123", "file", "a.bin", content);
    body.extend(text_part("XYZ123", "after", "still here"));
    body.extend(closing("XYZ123"));

    let fields = parse(&body, "XYZ123").expect("body should parse");

    assert_eq!(
        fields.get("file").and_then(FieldValue::as_file),
        Some(("a.bin", &Bytes::copy_from_slice(content)))
    );
    assert_eq!(fields.get("after"), Some(&FieldValue::text("still here")));
}

#[test]
fn only_first_blank_line_separates_headers() {
    let mut body = file_part("B", "file", "a.bin", b"head\r\n\r\nmore\r\n\r\n");
    body.extend(closing("B"));

    let fields = parse(&body, "B").expect("body should parse");
    assert_eq!(
        fields.get("file").and_then(FieldValue::as_file).map(|(_, bytes)| &bytes[..]),
        Some(&b"head\r\n\r\nmore\r\n\r\n"[..])
    );
}

#[test]
fn preamble_and_epilogue_only_yield_empty_result() {
    let body = b"this is a preamble\r\n--B--\r\nand an epilogue";
    let fields = parse(body, "B").expect("empty forms are valid");
    assert!(fields.is_empty());
}

#[test]
fn parts_without_name_yield_empty_result() {
    let body = concat!(
        "--B\r\n",
        "Content-Disposition: form-data\r\n",
        "\r\n",
        "orphan\r\n",
        "--B\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "no disposition\r\n",
        "--B--\r\n"
    );

    let report = parse_with_report(body.as_bytes(), "B").expect("body should parse");
    assert!(report.fields.is_empty());
    let reasons: Vec<_> = report.skipped.iter().map(|skip| skip.reason).collect();
    assert_eq!(
        reasons,
        vec![SkipReason::MissingName, SkipReason::MissingContentDisposition]
    );
}

#[test]
fn discards_preamble_and_epilogue_content() {
    let mut body = b"ignored\r\n".to_vec();
    body.extend(text_part("B", "a", "1"));
    body.extend(closing("B"));
    body.extend(text_part("B", "late", "epilogue part"));

    let fields = parse(&body, "B").expect("body should parse");
    assert_eq!(fields.len(), 1);
    assert!(fields.contains_key("a"));
}

#[test]
fn unterminated_final_segment_is_discarded() {
    let mut body = text_part("B", "a", "kept");
    body.extend_from_slice(b"--B\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\ncut off");

    let report = parse_with_report(&body, "B").expect("body should parse");
    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.fields.get("a"), Some(&FieldValue::text("kept")));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].reason, SkipReason::Unterminated);
}

#[test]
fn unframed_close_delimiter_reports_dropped_part() {
    let body = b"--B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhello--B--";

    let report = parse_with_report(body, "B").expect("body should parse");
    assert!(report.fields.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(report.skipped[0].reason, SkipReason::Unterminated);
}

#[test]
fn closed_body_reports_no_dropped_tail() {
    let mut body = text_part("B", "a", "1");
    body.extend(closing("B"));
    body.extend_from_slice(b"epilogue bytes");

    let report = parse_with_report(&body, "B").expect("body should parse");
    assert!(report.skipped.is_empty());
}

#[test]
fn boundary_with_pattern_characters_matches_literally() {
    let boundary = "a.b*c+(d)?[e]";
    let mut body = text_part(boundary, "f", "v");
    body.extend(closing(boundary));
    let decoy = b"--aXb*c+(d)?[e]\r\n";

    let fields = parse(&body, boundary).expect("body should parse");
    assert_eq!(fields.get("f"), Some(&FieldValue::text("v")));
    assert_eq!(parse(decoy, boundary), Err(ParseError::BoundaryNotFound));
}

#[test]
fn other_part_headers_are_ignored() {
    let body = concat!(
        "--B\r\n",
        "content-type: text/plain; charset=utf-8\r\n",
        "X-Custom: whatever: with colons\r\n",
        "not a header line\r\n",
        "content-disposition: form-data; name=\"note\"\r\n",
        "\r\n",
        "hi\r\n",
        "--B--\r\n"
    );

    let fields = parse(body.as_bytes(), "B").expect("body should parse");
    assert_eq!(fields.get("note"), Some(&FieldValue::text("hi")));
}

#[test]
fn quoted_value_with_embedded_quote_skips_part() {
    let mut body =
        b"--B\r\nContent-Disposition: form-data; name=\"we\"ird\"\r\n\r\nx\r\n".to_vec();
    body.extend(text_part("B", "ok", "yes"));
    body.extend(closing("B"));

    let report = parse_with_report(&body, "B").expect("body should parse");
    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::MalformedDisposition);
}

#[test]
fn empty_filename_is_treated_as_text() {
    let body = concat!(
        "--B\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"\"\r\n",
        "\r\n",
        "\r\n",
        "--B--\r\n"
    );

    let fields = parse(body.as_bytes(), "B").expect("body should parse");
    assert_eq!(fields.get("file"), Some(&FieldValue::text("")));
}

#[test]
fn file_with_empty_content_is_accepted() {
    let mut body = file_part("B", "file", "empty.mp3", b"");
    body.extend(closing("B"));

    let fields = parse(&body, "B").expect("body should parse");
    assert_eq!(
        fields.get("file"),
        Some(&FieldValue::file("empty.mp3", Bytes::new()))
    );
}

#[test]
fn non_utf8_text_value_is_skipped() {
    let mut body = b"--B\r\nContent-Disposition: form-data; name=\"t\"\r\n\r\n\xff\xfe\r\n".to_vec();
    body.extend(closing("B"));

    let report = parse_with_report(&body, "B").expect("body should parse");
    assert!(report.fields.is_empty());
    assert_eq!(report.skipped[0].reason, SkipReason::TextNotUtf8);
}

#[test]
fn non_form_data_disposition_is_skipped() {
    let mut body =
        b"--B\r\nContent-Disposition: attachment; name=\"a\"\r\n\r\nx\r\n".to_vec();
    body.extend(closing("B"));

    let report = parse_with_report(&body, "B").expect("body should parse");
    assert_eq!(report.skipped[0].reason, SkipReason::NotFormData);
}

#[test]
fn body_without_boundary_is_fatal() {
    let err = parse(b"just some bytes", "B").expect_err("must fail");
    assert_eq!(err, ParseError::BoundaryNotFound);
}

#[test]
fn rejects_unusable_boundaries() {
    assert!(matches!(
        MultipartParser::new(""),
        Err(ParseError::InvalidBoundary { .. })
    ));
    assert!(matches!(
        MultipartParser::new("a\r\n\r\nb"),
        Err(ParseError::InvalidBoundary { .. })
    ));
}

#[test]
fn parser_is_reusable_across_bodies() {
    let parser = MultipartParser::new("B").expect("boundary is valid");

    let mut first = text_part("B", "n", "1");
    first.extend(closing("B"));
    let mut second = text_part("B", "n", "2");
    second.extend(closing("B"));

    assert_eq!(
        parser.parse(&first).expect("first body").get("n"),
        Some(&FieldValue::text("1"))
    );
    assert_eq!(
        parser.parse(&second).expect("second body").get("n"),
        Some(&FieldValue::text("2"))
    );
}
