//! `data:` URL decoding (RFC 2397).

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use bytes::Bytes;
use mime::Mime;
use percent_encoding::percent_decode_str;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";
const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

/// Data URL decoding errors.
#[derive(Debug, Error)]
pub enum DataUrlError {
    /// Input does not start with `data:`.
    #[error("missing 'data:' scheme")]
    MissingScheme,

    /// No `,` separating the header from the payload.
    #[error("missing ',' before payload")]
    MissingComma,

    /// Media type could not be parsed.
    #[error("invalid media type '{media_type}': {source}")]
    InvalidMediaType {
        /// The media type as written.
        media_type: String,
        /// Parse failure.
        source: mime::FromStrError,
    },

    /// Base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded data URL.
#[derive(Debug, Clone)]
pub struct DataUrl {
    media_type: Mime,
    data: Bytes,
}

impl DataUrl {
    /// Parse and decode a data URL.
    ///
    /// A missing media type defaults to `text/plain;charset=US-ASCII`.
    /// Base64 payloads accept the standard and URL-safe alphabets and ignore
    /// embedded whitespace; other payloads are percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns a [`DataUrlError`] describing the first malformed part.
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let input = input.trim();
        let rest = input
            .get(..SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
            .map(|_| &input[SCHEME.len()..])
            .ok_or(DataUrlError::MissingScheme)?;

        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

        let (header, is_base64) = match header.len().checked_sub(BASE64_MARKER.len()) {
            Some(split) if header.is_char_boundary(split)
                && header[split..].eq_ignore_ascii_case(BASE64_MARKER) =>
            {
                (&header[..split], true)
            }
            _ => (header, false),
        };

        let media_type = parse_media_type(header)?;
        let data = if is_base64 {
            decode_base64(payload)?
        } else {
            percent_decode_str(payload).collect::<Vec<u8>>()
        };

        Ok(Self {
            media_type,
            data: Bytes::from(data),
        })
    }

    /// Declared media type.
    #[must_use]
    pub fn media_type(&self) -> &Mime {
        &self.media_type
    }

    /// Media type without parameters, e.g. `image/jpeg`.
    #[must_use]
    pub fn content_type(&self) -> String {
        self.media_type.essence_str().to_ascii_lowercase()
    }

    /// Media subtype including any structured suffix, e.g. `jpeg` or `svg+xml`.
    #[must_use]
    pub fn subtype(&self) -> String {
        let subtype = match self.media_type.suffix() {
            Some(suffix) => format!("{}+{}", self.media_type.subtype(), suffix),
            None => self.media_type.subtype().to_string(),
        };
        subtype.to_ascii_lowercase()
    }

    /// Decoded payload.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consume into the decoded payload.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

fn parse_media_type(header: &str) -> Result<Mime, DataUrlError> {
    let media_type = if header.is_empty() {
        DEFAULT_MEDIA_TYPE.to_string()
    } else if header.starts_with(';') {
        // Parameters without a type, e.g. `data:;charset=utf-8,...`.
        format!("text/plain{header}")
    } else {
        header.to_string()
    };

    media_type
        .parse::<Mime>()
        .map_err(|source| DataUrlError::InvalidMediaType { media_type, source })
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, DataUrlError> {
    let cleaned: String = percent_decode_str(payload)
        .decode_utf8_lossy()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    match STANDARD.decode(&cleaned) {
        Ok(data) => Ok(data),
        Err(err) => URL_SAFE.decode(&cleaned).map_err(|_| err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_base64_jpeg() {
        let url = DataUrl::parse("data:image/jpeg;base64,/9j/4AAQ").expect("valid data URL");

        assert_eq!(url.content_type(), "image/jpeg");
        assert_eq!(url.subtype(), "jpeg");
        assert_eq!(url.data().as_ref(), b"\xff\xd8\xff\xe0\x00\x10");
    }

    #[test]
    fn test_parse_suffix_subtype() {
        let url = DataUrl::parse("data:image/svg+xml;base64,PHN2Zy8+").expect("valid data URL");

        assert_eq!(url.content_type(), "image/svg+xml");
        assert_eq!(url.subtype(), "svg+xml");
        assert_eq!(url.into_data().as_ref(), b"<svg/>");
    }

    #[test]
    fn test_parse_case_insensitive_markers() {
        let url = DataUrl::parse("DATA:Image/PNG;BASE64,aGk=").expect("valid data URL");

        assert_eq!(url.subtype(), "png");
        assert_eq!(url.data().as_ref(), b"hi");
    }

    #[test]
    fn test_parse_with_parameters() {
        let url = DataUrl::parse("data:image/png;name=a.png;base64,aGk=").expect("valid data URL");

        assert_eq!(url.content_type(), "image/png");
        assert_eq!(url.media_type().get_param("name").map(|v| v.as_str()), Some("a.png"));
    }

    #[test]
    fn test_parse_default_media_type() {
        let url = DataUrl::parse("data:,hello%20world").expect("valid data URL");

        assert_eq!(url.content_type(), "text/plain");
        assert_eq!(url.subtype(), "plain");
        assert_eq!(url.data().as_ref(), b"hello world");
    }

    #[test]
    fn test_parse_charset_only() {
        let url = DataUrl::parse("data:;charset=utf-8,abc").expect("valid data URL");
        assert_eq!(url.content_type(), "text/plain");
        assert_eq!(url.data().as_ref(), b"abc");
    }

    #[test]
    fn test_parse_base64_with_whitespace_and_url_safe() {
        let url = DataUrl::parse("data:image/png;base64,aG k=\n").expect("valid data URL");
        assert_eq!(url.data().as_ref(), b"hi");

        let url = DataUrl::parse("data:application/octet-stream;base64,-_8=")
            .expect("valid data URL");
        assert_eq!(url.data().as_ref(), b"\xfb\xff");
    }

    #[rstest]
    #[case::plain_text("hello")]
    #[case::http_url("http://example.com/a.png")]
    #[case::empty("")]
    fn test_missing_scheme(#[case] input: &str) {
        assert!(matches!(
            DataUrl::parse(input),
            Err(DataUrlError::MissingScheme)
        ));
    }

    #[test]
    fn test_missing_comma() {
        assert!(matches!(
            DataUrl::parse("data:image/png;base64"),
            Err(DataUrlError::MissingComma)
        ));
    }

    #[test]
    fn test_invalid_media_type() {
        assert!(matches!(
            DataUrl::parse("data:image;base64,aGk="),
            Err(DataUrlError::InvalidMediaType { .. })
        ));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,!!!not base64!!!"),
            Err(DataUrlError::InvalidBase64(_))
        ));
    }
}
