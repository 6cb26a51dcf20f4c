//! Page objects.

use serde_json::Value;

use crate::error_handling::FieldError;
use crate::fields::cache::FieldCache;
use crate::fields::registry::{FieldRegistry, FieldSpec};
use crate::fields::value::FieldValue;

/// A type whose fields can be assembled into an item.
///
/// # Example
///
/// ```
/// use std::sync::LazyLock;
///
/// use page_inputs::fields::{FieldCache, FieldRegistry, FieldValue, ItemPage};
/// use page_inputs::HttpResponse;
///
/// struct ProductPage {
///     response: HttpResponse,
///     cache: FieldCache,
/// }
///
/// static FIELDS: LazyLock<FieldRegistry<ProductPage>> = LazyLock::new(|| {
///     FieldRegistry::builder()
///         .field("name", |page: &ProductPage| {
///             Ok(FieldValue::immediate(page.response.css("h1").join("")))
///         })
///         .build()
///         .expect("field names are valid")
/// });
///
/// impl ItemPage for ProductPage {
///     fn fields() -> &'static FieldRegistry<Self> {
///         &FIELDS
///     }
///
///     fn field_cache(&self) -> &FieldCache {
///         &self.cache
///     }
/// }
///
/// let page = ProductPage {
///     response: HttpResponse::new("https://example.com", "<h1>Chair</h1>"),
///     cache: FieldCache::new(),
/// };
/// assert_eq!(page.field("name").unwrap(), "Chair");
/// ```
pub trait ItemPage: Sized + Send + Sync + 'static {
    /// The fields of this page type, in registration order.
    fn fields() -> &'static FieldRegistry<Self>;

    /// The per-instance storage for cached fields.
    fn field_cache(&self) -> &FieldCache;

    /// Reads a field synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] if no field is registered under
    /// `name`, [`FieldError::DeferredInSyncContext`] if the field produces
    /// a deferred value, or the computation's own error.
    fn field(&self, name: &str) -> Result<Value, FieldError> {
        let spec = Self::fields()
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        read_field(self, spec)
    }
}

/// Reads one field synchronously, going through the cache for cached
/// fields.
pub(crate) fn read_field<P: ItemPage>(page: &P, spec: &FieldSpec<P>) -> Result<Value, FieldError> {
    if !spec.is_cached() {
        return compute_now(page, spec);
    }
    let slot = page.field_cache().slot(spec.name());
    slot.get_or_try_init(|| compute_now(page, spec))
        .cloned()
}

/// Reads one field, awaiting it if it is deferred.
pub(crate) async fn resolve_field<P: ItemPage>(
    page: &P,
    spec: &FieldSpec<P>,
) -> Result<Value, FieldError> {
    if !spec.is_cached() {
        return compute_resolved(page, spec).await;
    }
    let slot = page.field_cache().slot(spec.name());
    slot.get_or_try_init_async(compute_resolved(page, spec))
        .await
        .cloned()
}

fn compute_now<P>(page: &P, spec: &FieldSpec<P>) -> Result<Value, FieldError> {
    match spec.compute(page)? {
        FieldValue::Immediate(value) => Ok(value),
        FieldValue::Deferred(_) => Err(FieldError::DeferredInSyncContext(spec.name().to_string())),
    }
}

async fn compute_resolved<P>(page: &P, spec: &FieldSpec<P>) -> Result<Value, FieldError> {
    Ok(spec.compute(page)?.resolve().await?)
}
