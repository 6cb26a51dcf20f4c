//! Field results.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;

/// The result of a field computation.
///
/// A field either has its value right away or hands back a future that
/// will produce it. The asynchronous assembler resolves both the same way,
/// so a page can mix plain and asynchronous fields freely. The synchronous
/// assembler only accepts immediate values.
pub enum FieldValue<'a> {
    Immediate(Value),
    Deferred(BoxFuture<'a, anyhow::Result<Value>>),
}

impl<'a> FieldValue<'a> {
    /// Wraps a value that is already known.
    pub fn immediate(value: impl Into<Value>) -> Self {
        FieldValue::Immediate(value.into())
    }

    /// Serializes `value` into an immediate field value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON (a map
    /// with non-string keys, for instance).
    pub fn serialize<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(FieldValue::Immediate(serde_json::to_value(value)?))
    }

    /// Wraps a future that resolves to the field value.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Value>> + Send + 'a,
    {
        FieldValue::Deferred(future.boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, FieldValue::Deferred(_))
    }

    /// Resolves the value, awaiting it if it is deferred.
    pub async fn resolve(self) -> anyhow::Result<Value> {
        match self {
            FieldValue::Immediate(value) => Ok(value),
            FieldValue::Deferred(future) => future.await,
        }
    }
}

impl From<Value> for FieldValue<'_> {
    fn from(value: Value) -> Self {
        FieldValue::Immediate(value)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Immediate(value) => f.debug_tuple("Immediate").field(value).finish(),
            FieldValue::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
