//! Item targets.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A type that assembled field values can be turned into.
///
/// Items are built by deserializing the name/value map of the fields, so
/// any `Deserialize` type works: plain maps, `serde_json::Value`, or a
/// struct whose field names match the page's field names.
///
/// An item type may also declare the field names it accepts. When an
/// assembler is asked to filter to the item schema, fields outside that
/// set are left out. Types that declare nothing accept every field.
pub trait Item: DeserializeOwned {
    /// The field names this item accepts, or `None` if it does not say.
    fn declared_field_names() -> Option<&'static [&'static str]> {
        None
    }
}

impl Item for Map<String, Value> {}

impl Item for Value {}

impl<V: DeserializeOwned> Item for HashMap<String, V> {}

impl<V: DeserializeOwned> Item for BTreeMap<String, V> {}

/// Keeps the names accepted by `I`, in their original order.
pub(crate) fn filter_to_item_schema<'n, I: Item>(names: &[&'n str]) -> Vec<&'n str> {
    match I::declared_field_names() {
        Some(declared) => names
            .iter()
            .copied()
            .filter(|name| declared.iter().any(|declared_name| declared_name == name))
            .collect(),
        None => names.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Product {
        a: i64,
        c: i64,
    }

    impl Item for Product {
        fn declared_field_names() -> Option<&'static [&'static str]> {
            Some(&["a", "c"])
        }
    }

    #[test]
    fn test_filter_keeps_declared_names_in_order() {
        let names = ["c", "b", "a"];
        assert_eq!(filter_to_item_schema::<Product>(&names), vec!["c", "a"]);
    }

    #[test]
    fn test_undeclared_schema_keeps_everything() {
        let names = ["a", "b", "c"];
        assert_eq!(
            filter_to_item_schema::<Map<String, Value>>(&names),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            filter_to_item_schema::<HashMap<String, i64>>(&names),
            vec!["a", "b", "c"]
        );
    }
}
