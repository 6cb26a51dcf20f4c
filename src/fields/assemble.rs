//! Item assembly.
//!
//! Both assemblers read the registered fields of a page in registration
//! order, optionally drop the ones the target item does not declare, and
//! build the item from the resulting name/value map. Assembly is all or
//! nothing: the first failing field aborts it and its error is returned
//! unchanged.

use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::error_handling::FieldError;
use crate::fields::item::{filter_to_item_schema, Item};
use crate::fields::page::{read_field, resolve_field, ItemPage};
use crate::fields::registry::FieldSpec;

/// Builds an item from the fields of `page`, resolving deferred values.
///
/// Field computations run concurrently. Keys are still bound in
/// registration order.
///
/// # Arguments
///
/// * `page` - The page to read fields from
/// * `filter_to_item_schema` - Pass only the fields `I` declares (see
///   [`Item::declared_field_names`]). Has no effect when `I` declares none.
///
/// # Errors
///
/// Returns the error of the first field that fails, or
/// [`FieldError::ItemConstruction`] if the values do not fit `I`.
pub async fn item_from_fields<P, I>(page: &P, filter_to_item_schema: bool) -> Result<I, FieldError>
where
    P: ItemPage,
    I: Item,
{
    let specs = selected_fields::<P, I>(filter_to_item_schema);
    let values = try_join_all(specs.iter().map(|spec| resolve_field(page, *spec))).await?;
    build_item(specs.iter().map(|spec| spec.name()).zip(values))
}

/// Synchronous form of [`item_from_fields`].
///
/// # Errors
///
/// Like [`item_from_fields`], and additionally
/// [`FieldError::DeferredInSyncContext`] if a field produces a deferred
/// value.
pub fn item_from_fields_sync<P, I>(page: &P, filter_to_item_schema: bool) -> Result<I, FieldError>
where
    P: ItemPage,
    I: Item,
{
    let specs = selected_fields::<P, I>(filter_to_item_schema);
    let values = specs
        .iter()
        .map(|spec| read_field(page, *spec))
        .collect::<Result<Vec<_>, _>>()?;
    build_item(specs.iter().map(|spec| spec.name()).zip(values))
}

fn selected_fields<P: ItemPage, I: Item>(filter: bool) -> Vec<&'static FieldSpec<P>> {
    let registry = P::fields();
    if !filter {
        return registry.iter().collect();
    }
    let names = registry.names();
    filter_to_item_schema::<I>(&names)
        .into_iter()
        .filter_map(|name| registry.get(name))
        .collect()
}

fn build_item<I: Item>(
    fields: impl Iterator<Item = (&'static str, Value)>,
) -> Result<I, FieldError> {
    let map: Map<String, Value> = fields
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    serde_json::from_value(Value::Object(map)).map_err(FieldError::ItemConstruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldCache, FieldRegistry, FieldValue};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::LazyLock;

    #[derive(Default)]
    struct Page {
        cache: FieldCache,
        b_calls: AtomicUsize,
    }

    static FIELDS: LazyLock<FieldRegistry<Page>> = LazyLock::new(|| {
        FieldRegistry::builder()
            .field("a", |_: &Page| Ok(json!(5).into()))
            .cached_field("b", |page: &Page| {
                page.b_calls.fetch_add(1, Ordering::SeqCst);
                Ok(FieldValue::deferred(async { Ok::<_, anyhow::Error>(json!(7)) }))
            })
            .field("c", |_: &Page| Ok(json!("c").into()))
            .build()
            .unwrap()
    });

    impl ItemPage for Page {
        fn fields() -> &'static FieldRegistry<Self> {
            &FIELDS
        }

        fn field_cache(&self) -> &FieldCache {
            &self.cache
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Summary {
        a: i64,
        c: String,
    }

    impl Item for Summary {
        fn declared_field_names() -> Option<&'static [&'static str]> {
            Some(&["a", "c"])
        }
    }

    #[tokio::test]
    async fn test_async_resolves_deferred_values_in_order() {
        let page = Page::default();
        let item: Map<String, Value> = item_from_fields(&page, false).await.unwrap();
        assert_eq!(Value::Object(item.clone()), json!({"a": 5, "b": 7, "c": "c"}));
        let keys: Vec<&String> = item.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_async_cached_field_runs_once() {
        let page = Page::default();
        let _: Value = item_from_fields(&page, false).await.unwrap();
        let _: Value = item_from_fields(&page, false).await.unwrap();
        assert_eq!(page.b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(page.field_cache().get("b"), Some(json!(7)));
    }

    #[test]
    fn test_sync_rejects_deferred_values() {
        let page = Page::default();
        let result: Result<Value, _> = item_from_fields_sync(&page, false);
        assert!(matches!(result, Err(FieldError::DeferredInSyncContext(name)) if name == "b"));
        // Nothing was cached for the failed field
        assert!(page.field_cache().get("b").is_none());
    }

    #[test]
    fn test_sync_with_filter_skips_deferred_field() {
        let page = Page::default();
        let item: Summary = item_from_fields_sync(&page, true).unwrap();
        assert_eq!(
            item,
            Summary {
                a: 5,
                c: "c".to_string()
            }
        );
        assert_eq!(page.b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sync_reads_value_cached_by_async() {
        let page = Page::default();
        let _: Value = item_from_fields(&page, false).await.unwrap();
        let item: Value = item_from_fields_sync(&page, false).unwrap();
        assert_eq!(item, json!({"a": 5, "b": 7, "c": "c"}));
    }

    #[tokio::test]
    async fn test_sync_keeps_registration_order() {
        let page = Page::default();
        let _: Value = item_from_fields(&page, false).await.unwrap();
        let item: Map<String, Value> = item_from_fields_sync(&page, false).unwrap();
        let keys: Vec<&String> = item.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sync_order_is_not_alphabetical() {
        struct Unsorted {
            cache: FieldCache,
        }
        static UNSORTED_FIELDS: LazyLock<FieldRegistry<Unsorted>> = LazyLock::new(|| {
            FieldRegistry::builder()
                .field("zeta", |_: &Unsorted| Ok(json!(1).into()))
                .field("alpha", |_: &Unsorted| Ok(json!(2).into()))
                .cached_field("mid", |_: &Unsorted| Ok(json!(3).into()))
                .build()
                .unwrap()
        });
        impl ItemPage for Unsorted {
            fn fields() -> &'static FieldRegistry<Self> {
                &UNSORTED_FIELDS
            }

            fn field_cache(&self) -> &FieldCache {
                &self.cache
            }
        }

        let page = Unsorted {
            cache: FieldCache::new(),
        };
        let item: Map<String, Value> = item_from_fields_sync(&page, false).unwrap();
        let keys: Vec<&str> = item.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_item_construction_error() {
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        #[allow(dead_code)]
        struct OnlyA {
            a: i64,
        }
        impl Item for OnlyA {}

        struct Small {
            cache: FieldCache,
        }
        static SMALL_FIELDS: LazyLock<FieldRegistry<Small>> = LazyLock::new(|| {
            FieldRegistry::builder()
                .field("a", |_: &Small| Ok(json!(1).into()))
                .field("z", |_: &Small| Ok(json!(2).into()))
                .build()
                .unwrap()
        });
        impl ItemPage for Small {
            fn fields() -> &'static FieldRegistry<Self> {
                &SMALL_FIELDS
            }
            fn field_cache(&self) -> &FieldCache {
                &self.cache
            }
        }

        let page = Small {
            cache: FieldCache::new(),
        };
        let result: Result<OnlyA, _> = item_from_fields_sync(&page, false);
        assert!(matches!(result, Err(FieldError::ItemConstruction(_))));
    }
}
