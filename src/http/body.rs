//! Request and response bodies.
//!
//! Both wrap immutable bytes. Response bodies add the detection helpers the
//! encoding resolver is built from.

use std::ops::Deref;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error_handling::BodyError;
use crate::http::encoding::{html_body_declared_encoding, read_bom};

macro_rules! body_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(Bytes);

        impl $name {
            pub fn new(bytes: impl Into<Bytes>) -> Self {
                Self(bytes.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Returns a cheap handle to the underlying bytes.
            pub fn bytes(&self) -> Bytes {
                self.0.clone()
            }
        }

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Bytes> for $name {
            fn from(bytes: Bytes) -> Self {
                Self(bytes)
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(Bytes::from(bytes))
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(Bytes::copy_from_slice(bytes))
            }
        }

        impl<const N: usize> From<&[u8; N]> for $name {
            fn from(bytes: &[u8; N]) -> Self {
                Self(Bytes::copy_from_slice(bytes))
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self(Bytes::copy_from_slice(text.as_bytes()))
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                Self(Bytes::from(text))
            }
        }
    };
}

body_type!(
    /// Raw HTTP request body.
    HttpRequestBody
);

body_type!(
    /// Raw HTTP response body.
    HttpResponseBody
);

impl HttpResponseBody {
    /// Returns the encoding announced by a byte order mark, if present.
    pub fn bom_encoding(&self) -> Option<&'static str> {
        read_bom(&self.0).map(|(encoding, _)| encoding)
    }

    /// Returns the encoding declared in `<meta>` tags or an XML prolog.
    pub fn declared_encoding(&self) -> Option<&'static str> {
        html_body_declared_encoding(&self.0)
    }

    /// Deserializes the body as a JSON document.
    ///
    /// JSON is UTF-8 by definition, so the text encoding pipeline is not
    /// involved.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        Ok(serde_json::from_slice(&self.0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_body_is_byte_slice() {
        let body = HttpRequestBody::from("a=1&b=2");
        assert_eq!(&*body, b"a=1&b=2");
        assert_eq!(body.len(), 7);
        assert!(HttpRequestBody::default().is_empty());
    }

    #[test]
    fn test_bom_encoding() {
        let body = HttpResponseBody::from(&b"\xff\xfe<\x00h\x00"[..]);
        assert_eq!(body.bom_encoding(), Some("UTF-16LE"));
        assert_eq!(HttpResponseBody::from("<html>").bom_encoding(), None);
    }

    #[test]
    fn test_declared_encoding() {
        let body = HttpResponseBody::from("<html><head><meta charset='utf-8'></head></html>");
        assert_eq!(body.declared_encoding(), Some("UTF-8"));
        assert_eq!(HttpResponseBody::default().declared_encoding(), None);
    }

    #[test]
    fn test_json() {
        let body = HttpResponseBody::from(r#"{"foo": "bar", "n": [1, 2]}"#);
        let value: Value = body.json().unwrap();
        assert_eq!(value, json!({"foo": "bar", "n": [1, 2]}));
    }

    #[test]
    fn test_json_malformed() {
        let body = HttpResponseBody::from("{not json");
        assert!(matches!(body.json::<Value>(), Err(BodyError::Json(_))));
    }
}
