//! Field registration.
//!
//! A [`FieldRegistry`] is the ordered set of fields a page type declares.
//! It is built once per type, usually into a `static`, and shared by every
//! instance of that type.

use std::fmt;
use std::sync::Arc;

use crate::error_handling::FieldError;
use crate::fields::value::FieldValue;

/// A field computation: reads a page and produces the field's value.
pub type ComputeFn<P> =
    Arc<dyn for<'a> Fn(&'a P) -> anyhow::Result<FieldValue<'a>> + Send + Sync>;

// Pins the closure signature to the higher-ranked form, so the returned
// value may borrow from the page.
fn compute_fn<P, F>(compute: F) -> ComputeFn<P>
where
    F: for<'a> Fn(&'a P) -> anyhow::Result<FieldValue<'a>> + Send + Sync + 'static,
{
    Arc::new(compute)
}

/// A registered field.
pub struct FieldSpec<P> {
    name: &'static str,
    compute: ComputeFn<P>,
    cached: bool,
}

impl<P> FieldSpec<P> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the value is computed at most once per page instance.
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Runs the computation against `page`.
    pub fn compute<'a>(&self, page: &'a P) -> anyhow::Result<FieldValue<'a>> {
        (self.compute)(page)
    }
}

impl<P> Clone for FieldSpec<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            compute: Arc::clone(&self.compute),
            cached: self.cached,
        }
    }
}

impl<P> fmt::Debug for FieldSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}

/// The ordered fields of a page type.
///
/// Order is registration order and defines the key order of assembled
/// items.
pub struct FieldRegistry<P> {
    fields: Vec<FieldSpec<P>>,
}

impl<P> FieldRegistry<P> {
    /// Starts building a registry.
    ///
    /// # Example
    ///
    /// ```
    /// use page_inputs::fields::{FieldRegistry, FieldValue};
    /// use serde_json::json;
    ///
    /// struct ProductPage {
    ///     title: String,
    /// }
    ///
    /// let registry = FieldRegistry::<ProductPage>::builder()
    ///     .field("name", |page: &ProductPage| Ok(json!(page.title).into()))
    ///     .cached_field("currency", |_: &ProductPage| Ok(FieldValue::immediate("USD")))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(registry.names(), vec!["name", "currency"]);
    /// ```
    pub fn builder() -> FieldRegistryBuilder<P> {
        FieldRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec<P>> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Field names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|spec| spec.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec<P>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<P> fmt::Debug for FieldRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// Builder for [`FieldRegistry`].
///
/// Registering a name that is already present replaces its computation
/// and caching mode but keeps its original position. This is how a page
/// type overrides a field it inherited.
pub struct FieldRegistryBuilder<P> {
    fields: Vec<FieldSpec<P>>,
    error: Option<FieldError>,
}

impl<P> Default for FieldRegistryBuilder<P> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            error: None,
        }
    }
}

impl<P> FieldRegistryBuilder<P> {
    /// Registers a field computed on every access.
    pub fn field<F>(self, name: &'static str, compute: F) -> Self
    where
        F: for<'a> Fn(&'a P) -> anyhow::Result<FieldValue<'a>> + Send + Sync + 'static,
    {
        self.register(name, compute_fn(compute), false)
    }

    /// Registers a field computed at most once per page instance.
    pub fn cached_field<F>(self, name: &'static str, compute: F) -> Self
    where
        F: for<'a> Fn(&'a P) -> anyhow::Result<FieldValue<'a>> + Send + Sync + 'static,
    {
        self.register(name, compute_fn(compute), true)
    }

    /// Copies every field of `parent` into this registry.
    ///
    /// `project` maps this page type to the embedded parent page the
    /// inherited computations read from. Inherited fields keep the parent's
    /// order and caching mode. Fields registered afterwards with the same
    /// name override them in place.
    pub fn inherit<Q>(mut self, parent: &FieldRegistry<Q>, project: fn(&P) -> &Q) -> Self
    where
        P: 'static,
        Q: 'static,
    {
        for spec in parent.iter() {
            let parent_compute = Arc::clone(&spec.compute);
            let compute = compute_fn(move |page: &P| parent_compute(project(page)));
            self = self.register(spec.name, compute, spec.cached);
        }
        self
    }

    /// Finishes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidName`] for the first field registered
    /// under a name that is not an identifier.
    pub fn build(self) -> Result<FieldRegistry<P>, FieldError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        log::debug!(
            "Built field registry for {} with {} fields",
            std::any::type_name::<P>(),
            self.fields.len()
        );
        Ok(FieldRegistry {
            fields: self.fields,
        })
    }

    fn register(mut self, name: &'static str, compute: ComputeFn<P>, cached: bool) -> Self {
        if !is_valid_field_name(name) {
            if self.error.is_none() {
                self.error = Some(FieldError::InvalidName(name.to_string()));
            }
            return self;
        }
        match self.fields.iter_mut().find(|spec| spec.name == name) {
            Some(existing) => {
                existing.compute = compute;
                existing.cached = cached;
            }
            None => self.fields.push(FieldSpec {
                name,
                compute,
                cached,
            }),
        }
        self
    }
}

/// Field names become item keys and must be identifiers.
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
