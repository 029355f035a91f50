use http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::error::SkipReason;

const FORM_DATA: &str = "form-data";

/// Parsed `Content-Disposition` metadata for a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Disposition type, lowercased (normally `form-data`).
    pub disposition: String,
    /// Raw `name` parameter.
    pub name: Option<String>,
    /// Raw `filename` parameter.
    pub filename: Option<String>,
}

/// Header model for a multipart part.
#[derive(Debug, Clone)]
pub struct PartHeaders {
    /// Logical field name for this part.
    pub field_name: String,
    /// File name, when the part is a file upload.
    pub file_name: Option<String>,
    /// Every header line of the part, including ones the parser ignores.
    pub headers: HeaderMap,
}

/// Tokenizes a part header block and extracts its form-data identity.
pub fn parse_part_headers(raw: &[u8]) -> Result<PartHeaders, SkipReason> {
    let headers = parse_header_block(raw)?;

    let disposition_raw = headers
        .get(header::CONTENT_DISPOSITION)
        .ok_or(SkipReason::MissingContentDisposition)?;
    let disposition_raw = std::str::from_utf8(disposition_raw.as_bytes())
        .map_err(|_| SkipReason::HeadersNotUtf8)?;
    let disposition = parse_content_disposition(disposition_raw)?;

    if disposition.disposition != FORM_DATA {
        return Err(SkipReason::NotFormData);
    }

    let field_name = disposition
        .name
        .filter(|name| !name.is_empty())
        .ok_or(SkipReason::MissingName)?;

    Ok(PartHeaders {
        field_name,
        file_name: disposition.filename.filter(|name| !name.is_empty()),
        headers,
    })
}

/// Splits a raw header block into a case-insensitive header map.
///
/// Lines without a `:` or with an unusable header name are ignored; only the
/// block as a whole must be UTF-8.
pub fn parse_header_block(raw: &[u8]) -> Result<HeaderMap, SkipReason> {
    let text = std::str::from_utf8(raw).map_err(|_| SkipReason::HeadersNotUtf8)?;
    let mut headers = HeaderMap::new();

    for line in text.split("\r\n") {
        let Some((raw_name, raw_value)) = line.split_once(':') else {
            continue;
        };

        let Ok(name) = raw_name.trim().parse::<HeaderName>() else {
            continue;
        };
        let Ok(value) = HeaderValue::from_bytes(raw_value.trim().as_bytes()) else {
            continue;
        };
        headers.append(name, value);
    }

    Ok(headers)
}

/// Parses a `Content-Disposition` value into its type and `name`/`filename`.
///
/// Quoted values are taken verbatim up to the closing quote; there is no
/// escape syntax, so a value containing `"` is rejected.
pub fn parse_content_disposition(value: &str) -> Result<ContentDisposition, SkipReason> {
    let mut segments = split_unquoted_semicolons(value).into_iter();
    let disposition = segments
        .next()
        .map(|segment| segment.trim().to_ascii_lowercase())
        .filter(|segment| !segment.is_empty())
        .ok_or(SkipReason::MalformedDisposition)?;

    let mut name = None;
    let mut filename = None;

    for segment in segments {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = trimmed
            .split_once('=')
            .ok_or(SkipReason::MalformedDisposition)?;
        let parsed = parse_parameter_value(raw_value.trim())?;

        match raw_key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(parsed),
            "filename" => filename = Some(parsed),
            _ => {}
        }
    }

    Ok(ContentDisposition {
        disposition,
        name,
        filename,
    })
}

fn parse_parameter_value(raw: &str) -> Result<String, SkipReason> {
    if let Some(inner) = raw.strip_prefix('"') {
        let inner = inner
            .strip_suffix('"')
            .ok_or(SkipReason::MalformedDisposition)?;
        if inner.contains('"') {
            return Err(SkipReason::MalformedDisposition);
        }
        return Ok(inner.to_owned());
    }

    if raw.contains('"') {
        return Err(SkipReason::MalformedDisposition);
    }

    Ok(raw.to_owned())
}

fn split_unquoted_semicolons(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (index, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }

    segments.push(&value[start..]);
    segments
}
