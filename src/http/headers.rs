//! HTTP header container.
//!
//! A case-insensitive, multi-valued mapping from header name to header
//! value. Entries keep their original spelling and insertion order, and
//! duplicate names are preserved rather than overwritten.

use std::collections::HashMap;
use std::fmt;

use crate::config::HEADER_CONTENT_TYPE;
use crate::http::encoding::http_content_type_encoding;

/// A single header entry in the shape used by HAR-like exports
/// (`{"name": ..., "value": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

/// Ordered, case-insensitive header multimap.
///
/// Containers are never mutated in place once handed to a request or
/// response; build a new one instead.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: Vec<(String, String)>,
}

/// Headers attached to a request.
pub type HttpRequestHeaders = HttpHeaders;
/// Headers attached to a response.
pub type HttpResponseHeaders = HttpHeaders;

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from a list of `{name, value}` records.
    pub fn from_name_value_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = NameValuePair>,
    {
        pairs
            .into_iter()
            .map(|pair| (pair.name, pair.value))
            .collect()
    }

    /// Builds a container from raw header bytes, each name mapping to one
    /// or more values.
    ///
    /// Bytes are decoded with `encoding` (any WHATWG label; unknown labels
    /// fall back to UTF-8). Invalid sequences are replaced rather than
    /// rejected.
    pub fn from_bytes_map<'a, I, V>(raw: I, encoding: &str) -> Self
    where
        I: IntoIterator<Item = (&'a [u8], V)>,
        V: IntoIterator<Item = &'a [u8]>,
    {
        let codec = encoding_rs::Encoding::for_label(encoding.as_bytes()).unwrap_or_else(|| {
            log::debug!("Unknown header encoding '{encoding}', decoding as UTF-8");
            encoding_rs::UTF_8
        });
        let decode = |bytes: &[u8]| codec.decode_without_bom_handling(bytes).0.into_owned();

        let mut headers = Self::new();
        for (name, values) in raw {
            let name = decode(name);
            for value in values {
                headers.entries.push((name.clone(), decode(value)));
            }
        }
        headers
    }

    /// Appends an entry, keeping any existing entries with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns a new container with the entry appended.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Returns the first value stored under `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value stored under `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the encoding named by the `charset` parameter of the
    /// `Content-Type` header, if it names a known encoding.
    pub fn declared_encoding(&self) -> Option<&'static str> {
        http_content_type_encoding(self.get(HEADER_CONTENT_TYPE).unwrap_or(""))
    }
}

impl fmt::Debug for HttpHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for HttpHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HttpHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for HttpHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<HashMap<K, V>> for HttpHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        fn as_pair(entry: &(String, String)) -> (&str, &str) {
            (entry.0.as_str(), entry.1.as_str())
        }
        self.entries
            .iter()
            .map(as_pair as fn(&'a (String, String)) -> (&'a str, &'a str))
    }
}
