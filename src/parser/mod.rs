//! Buffered `multipart/form-data` parser.
//!
//! The body is split on framed `--boundary` delimiters, the preamble and the
//! closing segment are dropped, and every remaining segment is classified on
//! its own. A malformed segment is skipped and reported; it never fails the
//! whole parse.

use bytes::Bytes;

use crate::{
    error::{ParseError, SkipReason},
    field::{FieldValue, ParseResult},
};

/// Boundary extraction helpers.
pub mod boundary;
/// Part header tokenizer.
pub mod headers;

pub use boundary::extract_multipart_boundary;
pub use headers::{
    parse_content_disposition, parse_header_block, parse_part_headers, ContentDisposition,
    PartHeaders,
};

const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";
const CRLF: &[u8] = b"\r\n";

/// Parses a fully buffered multipart body into named fields.
pub fn parse(body: &[u8], boundary: &str) -> Result<ParseResult, ParseError> {
    MultipartParser::new(boundary)?.parse(body)
}

/// Parses a fully buffered multipart body and reports skipped segments.
pub fn parse_with_report(body: &[u8], boundary: &str) -> Result<ParseReport, ParseError> {
    MultipartParser::new(boundary)?.parse_with_report(body)
}

/// Parser bound to one boundary token.
#[derive(Debug, Clone)]
pub struct MultipartParser {
    delimiter: Vec<u8>,
}

impl MultipartParser {
    /// Creates a parser for `boundary`, as extracted from the `Content-Type`.
    pub fn new(boundary: impl AsRef<[u8]>) -> Result<Self, ParseError> {
        let boundary = boundary.as_ref();
        boundary::validate_boundary(boundary)?;

        let mut delimiter = Vec::with_capacity(boundary.len() + 2);
        delimiter.extend_from_slice(b"--");
        delimiter.extend_from_slice(boundary);
        Ok(Self { delimiter })
    }

    /// Parses `body`, keeping the last value for repeated field names.
    pub fn parse(&self, body: &[u8]) -> Result<ParseResult, ParseError> {
        self.parse_with_report(body).map(|report| report.fields)
    }

    /// Parses `body` and returns the fields together with every skipped segment.
    pub fn parse_with_report(&self, body: &[u8]) -> Result<ParseReport, ParseError> {
        let (segments, closed) = self.split_framed(body)?;
        let mut report = ParseReport::default();

        // The first segment is the preamble, the last one is the closing
        // marker plus epilogue (or an unterminated tail).
        let parts = &segments[1..segments.len() - 1];
        for (index, segment) in parts.iter().enumerate() {
            match parse_segment(segment) {
                SegmentOutcome::Field { name, value } => {
                    report.fields.insert(name, value);
                }
                SegmentOutcome::Skipped(reason) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        segment = index,
                        reason = reason.as_str(),
                        "parser: skipping malformed multipart segment"
                    );
                    report.skipped.push(SkippedSegment { index, reason });
                }
            }
        }

        let tail = segments[segments.len() - 1];
        if !closed && !tail.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                segment = parts.len(),
                bytes = tail.len(),
                "parser: dropping part without closing delimiter"
            );
            report.skipped.push(SkippedSegment {
                index: parts.len(),
                reason: SkipReason::Unterminated,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            fields = report.fields.len(),
            skipped = report.skipped.len(),
            "parser: multipart body parsed"
        );

        Ok(report)
    }

    /// Splits `body` on framed delimiters, preamble and tail included.
    ///
    /// Always yields at least two segments on success.
    pub fn split<'a>(&self, body: &'a [u8]) -> Result<Vec<&'a [u8]>, ParseError> {
        self.split_framed(body).map(|(segments, _)| segments)
    }

    /// Like [`Self::split`], also reporting whether a close delimiter was seen.
    fn split_framed<'a>(&self, body: &'a [u8]) -> Result<(Vec<&'a [u8]>, bool), ParseError> {
        let delimiter_len = self.delimiter.len();
        let mut segments = Vec::new();
        let mut segment_start = 0;
        let mut search = 0;
        let mut closed = false;

        while let Some(found) = find_subslice(&body[search..], &self.delimiter) {
            let at = search + found;
            let after = at + delimiter_len;

            let framed = at == 0 || body[..at].ends_with(CRLF);
            match framed.then(|| classify_suffix(&body[after..])).flatten() {
                Some(Delimiter::Close) => {
                    segments.push(&body[segment_start..at]);
                    segment_start = at;
                    closed = true;
                    break;
                }
                Some(Delimiter::Open) => {
                    segments.push(&body[segment_start..at]);
                    segment_start = after;
                    search = after;
                }
                None => search = at + 1,
            }
        }

        if segments.is_empty() {
            return Err(ParseError::BoundaryNotFound);
        }

        segments.push(&body[segment_start..]);
        Ok((segments, closed))
    }
}

/// Result of parsing a multipart body, including recoverable failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Parsed fields.
    pub fields: ParseResult,
    /// Segments that were skipped, in body order.
    pub skipped: Vec<SkippedSegment>,
}

/// A segment dropped during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSegment {
    /// Zero-based index among the body's parts (preamble excluded).
    pub index: usize,
    /// Why the segment was skipped.
    pub reason: SkipReason,
}

/// Outcome of parsing one boundary-delimited segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The segment produced a named field.
    Field {
        /// Form field name.
        name: String,
        /// Decoded value.
        value: FieldValue,
    },
    /// The segment was malformed and skipped.
    Skipped(SkipReason),
}

/// Parses a single part segment (the bytes between two delimiters).
pub fn parse_segment(segment: &[u8]) -> SegmentOutcome {
    let Some(split) = find_subslice(segment, HEADER_SEPARATOR) else {
        return SegmentOutcome::Skipped(SkipReason::MissingHeaderSeparator);
    };

    let headers = match parse_part_headers(&segment[..split]) {
        Ok(headers) => headers,
        Err(reason) => return SegmentOutcome::Skipped(reason),
    };

    let raw_body = &segment[split + HEADER_SEPARATOR.len()..];
    let body = raw_body.strip_suffix(CRLF).unwrap_or(raw_body);

    let value = match headers.file_name {
        Some(filename) => FieldValue::File {
            filename,
            content: Bytes::copy_from_slice(body),
        },
        None => match std::str::from_utf8(body) {
            Ok(text) => FieldValue::text(text),
            Err(_) => return SegmentOutcome::Skipped(SkipReason::TextNotUtf8),
        },
    };

    SegmentOutcome::Field {
        name: headers.field_name,
        value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Open,
    Close,
}

// What follows `--boundary` decides whether it is a real delimiter line.
fn classify_suffix(rest: &[u8]) -> Option<Delimiter> {
    if rest.starts_with(b"--") {
        return Some(Delimiter::Close);
    }

    let padding = rest
        .iter()
        .take_while(|byte| matches!(byte, b' ' | b'\t'))
        .count();
    let rest = &rest[padding..];
    if rest.is_empty() || rest.starts_with(CRLF) {
        Some(Delimiter::Open)
    } else {
        None
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack.windows(needle.len()).position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_preamble_and_tail() {
        let parser = MultipartParser::new("B").expect("boundary is valid");
        let segments = parser
            .split(b"pre\r\n--B\r\npart\r\n--B--\r\nepilogue")
            .expect("split should succeed");

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], b"pre\r\n");
        assert_eq!(segments[1], b"\r\npart\r\n");
        assert_eq!(segments[2], b"--B--\r\nepilogue");
    }

    #[test]
    fn split_ignores_unframed_occurrences() {
        let parser = MultipartParser::new("B").expect("boundary is valid");
        let segments = parser
            .split(b"--B\r\nx--B\r\ny\r\n--Bz\r\n--B--")
            .expect("split should succeed");

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], b"\r\nx--B\r\ny\r\n--Bz\r\n");
    }

    #[test]
    fn split_accepts_transport_padding() {
        let parser = MultipartParser::new("B").expect("boundary is valid");
        let segments = parser
            .split(b"--B \t\r\na\r\n--B--")
            .expect("split should succeed");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], b" \t\r\na\r\n");
    }

    #[test]
    fn split_without_delimiter_is_fatal() {
        let parser = MultipartParser::new("B").expect("boundary is valid");
        assert_eq!(parser.split(b"no parts here"), Err(ParseError::BoundaryNotFound));
    }

    #[test]
    fn segment_without_headers_is_skipped() {
        assert_eq!(
            parse_segment(b"\r\n\r\nbody\r\n"),
            SegmentOutcome::Skipped(SkipReason::MissingContentDisposition)
        );
    }

    #[test]
    fn segment_strips_only_one_trailing_crlf() {
        let outcome = parse_segment(
            b"\r\nContent-Disposition: form-data; name=\"t\"\r\n\r\nline\r\n\r\n",
        );
        assert_eq!(
            outcome,
            SegmentOutcome::Field {
                name: "t".to_owned(),
                value: FieldValue::text("line\r\n"),
            }
        );
    }
}
