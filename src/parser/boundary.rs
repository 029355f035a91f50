use crate::error::ParseError;

const BOUNDARY_PARAM: &str = "boundary=";

/// Extracts the `boundary` parameter from a `Content-Type` value.
///
/// The token runs to the next `;` or the end of the value. One pair of
/// surrounding double quotes is removed. The media type itself is not checked.
pub fn extract_multipart_boundary(content_type: &str) -> Result<String, ParseError> {
    let start = find_param(content_type).ok_or(ParseError::MissingBoundary)?;
    let rest = &content_type[start + BOUNDARY_PARAM.len()..];
    let raw = rest.split(';').next().unwrap_or_default().trim();

    let boundary = raw
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(raw);

    if boundary.is_empty() || boundary.contains(['\r', '\n']) {
        return Err(ParseError::MissingBoundary);
    }

    Ok(boundary.to_owned())
}

/// Validates a boundary before it is used to split a body.
pub(crate) fn validate_boundary(boundary: &[u8]) -> Result<(), ParseError> {
    if boundary.is_empty() {
        return Err(ParseError::InvalidBoundary {
            reason: "boundary cannot be empty",
        });
    }

    if boundary.iter().any(|byte| matches!(byte, b'\r' | b'\n')) {
        return Err(ParseError::InvalidBoundary {
            reason: "boundary cannot contain CR or LF",
        });
    }

    Ok(())
}

// Parameter names are case-insensitive, and `boundary=` must start a parameter,
// not sit inside another one (e.g. `xboundary=`).
fn find_param(content_type: &str) -> Option<usize> {
    let lower = content_type.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(found) = lower[offset..].find(BOUNDARY_PARAM) {
        let index = offset + found;
        let preceded_ok = lower[..index]
            .chars()
            .next_back()
            .map_or(true, |ch| ch == ';' || ch.is_ascii_whitespace());
        if preceded_ok {
            return Some(index);
        }
        offset = index + BOUNDARY_PARAM.len();
    }

    None
}
