use std::collections::HashMap;

use bytes::Bytes;

/// Parsed fields keyed by form field name.
pub type ParseResult = HashMap<String, FieldValue>;

/// Decoded value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain text field (no `filename` in the disposition).
    Text {
        /// UTF-8 field content.
        content: String,
    },
    /// File upload field.
    File {
        /// Client-supplied file name.
        filename: String,
        /// Raw file bytes, exactly as sent.
        content: Bytes,
    },
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates a file value.
    pub fn file(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self::File {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Returns the field kind.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text { .. } => FieldKind::Text,
            Self::File { .. } => FieldKind::File,
        }
    }

    /// Returns the text content for text fields.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content.as_str()),
            Self::File { .. } => None,
        }
    }

    /// Returns the file name and bytes for file fields.
    pub fn as_file(&self) -> Option<(&str, &Bytes)> {
        match self {
            Self::File { filename, content } => Some((filename.as_str(), content)),
            Self::Text { .. } => None,
        }
    }
}

/// Discriminates between file and text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Binary file payload.
    File,
    /// Plain text payload.
    Text,
}
