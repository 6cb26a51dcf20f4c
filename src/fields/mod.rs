//! Declarative fields and item assembly.
//!
//! This module provides:
//! - [`FieldRegistry`]: the ordered fields a page type declares
//! - [`FieldValue`]: immediate or deferred field results
//! - [`FieldCache`]: per-instance storage for cached fields
//! - [`item_from_fields`] / [`item_from_fields_sync`]: item assembly
//!
//! A page type registers its fields once, implements [`ItemPage`], and can
//! then be turned into any [`Item`].

mod assemble;
mod cache;
mod item;
mod page;
mod registry;
mod value;

// Re-export public API
pub use assemble::{item_from_fields, item_from_fields_sync};
pub use cache::FieldCache;
pub use item::Item;
pub use page::ItemPage;
pub use registry::{ComputeFn, FieldRegistry, FieldRegistryBuilder, FieldSpec};
pub use value::FieldValue;
