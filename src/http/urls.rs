//! URL value types.
//!
//! Request and response URLs are kept as the strings they were built from.
//! Parsing happens only when an operation needs it (joining,
//! canonicalization), and failures are reported to the caller.

use std::fmt;

use crate::error_handling::UrlError;

/// Parses `input` as an absolute URL.
pub(crate) fn parse_absolute(input: &str) -> Result<url::Url, UrlError> {
    url::Url::parse(input.trim()).map_err(|source| UrlError::Parse {
        url: input.to_string(),
        source,
    })
}

/// Resolves `reference` against `base`.
///
/// Absolute references are returned as they are (after parsing), relative
/// ones are resolved with the standard URL resolution rules.
pub(crate) fn join(base: &str, reference: &str) -> Result<String, UrlError> {
    let base_url = parse_absolute(base)?;
    if base_url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase {
            url: base.to_string(),
        });
    }
    base_url
        .join(reference.trim())
        .map(String::from)
        .map_err(|source| UrlError::Parse {
            url: reference.to_string(),
            source,
        })
}

macro_rules! url_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(String);

        impl $name {
            pub fn new(url: impl Into<String>) -> Self {
                Self(url.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Resolves `reference` against this URL.
            pub fn join(&self, reference: impl AsRef<str>) -> Result<Self, UrlError> {
                join(&self.0, reference.as_ref()).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(url: &str) -> Self {
                Self(url.to_string())
            }
        }

        impl From<String> for $name {
            fn from(url: String) -> Self {
                Self(url)
            }
        }

        impl From<&String> for $name {
            fn from(url: &String) -> Self {
                Self(url.clone())
            }
        }

        impl From<url::Url> for $name {
            fn from(url: url::Url) -> Self {
                Self(url.into())
            }
        }
    };
}

url_type!(
    /// URL of a request.
    RequestUrl
);

url_type!(
    /// URL of a response, ideally the final one after redirects.
    ResponseUrl
);

impl From<ResponseUrl> for RequestUrl {
    fn from(url: ResponseUrl) -> Self {
        Self(url.0)
    }
}

impl From<&ResponseUrl> for RequestUrl {
    fn from(url: &ResponseUrl) -> Self {
        Self(url.0.clone())
    }
}

impl From<RequestUrl> for ResponseUrl {
    fn from(url: RequestUrl) -> Self {
        Self(url.0)
    }
}

impl From<&RequestUrl> for ResponseUrl {
    fn from(url: &RequestUrl) -> Self {
        Self(url.0.clone())
    }
}
