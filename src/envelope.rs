//! JSON request/response envelope exchanged with the HTTP front door.

use std::collections::BTreeMap;

use base64::Engine as _;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::UploadError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Incoming HTTP-shaped request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Whether `body` is base64-encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Request headers as sent; lookups ignore case.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Raw or base64-encoded body.
    #[serde(default)]
    pub body: String,
}

impl UploadRequest {
    /// Creates a plain-text request with a single `Content-Type` header.
    pub fn new(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), content_type.into());
        Self {
            is_base64_encoded: false,
            headers,
            body: body.into(),
        }
    }

    /// Creates a request carrying arbitrary bytes as base64.
    pub fn from_bytes(content_type: impl Into<String>, body: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(body);
        let mut request = Self::new(content_type, encoded);
        request.is_base64_encoded = true;
        request
    }

    /// Looks up a header value case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the decoded body bytes.
    pub fn body_bytes(&self) -> Result<Bytes, UploadError> {
        if !self.is_base64_encoded {
            return Ok(Bytes::copy_from_slice(self.body.as_bytes()));
        }

        base64::engine::general_purpose::STANDARD
            .decode(self.body.trim())
            .map(Bytes::from)
            .map_err(|err| UploadError::InvalidBody {
                reason: err.to_string(),
            })
    }
}

/// Outgoing HTTP-shaped response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers, CORS included.
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded response body.
    pub body: String,
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    message: &'a str,
    file_key: &'a str,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    error: String,
    code: &'a str,
}

impl UploadResponse {
    /// Builds the 200 response for a stored file.
    pub fn success(file_key: &str, allow_origin: &str) -> Self {
        let body = SuccessBody {
            message: "File uploaded successfully.",
            file_key,
        };
        Self::json(200, &body, allow_origin)
    }

    /// Builds the 500 response for any failure.
    pub fn failure(error: &UploadError, allow_origin: &str) -> Self {
        let body = FailureBody {
            error: format!("Error: {error}"),
            code: error.code(),
        };
        Self::json(500, &body, allow_origin)
    }

    /// Returns a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parses the JSON body.
    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }

    fn json<T: Serialize>(status_code: u16, body: &T, allow_origin: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned());
        headers.insert(
            "Access-Control-Allow-Origin".to_owned(),
            allow_origin.to_owned(),
        );

        // Serializing these plain structs cannot fail.
        let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_owned());

        Self {
            status_code,
            headers,
            body,
        }
    }
}
