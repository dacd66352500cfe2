//! Value-equality keys that decide when a provider must re-fetch.

use crate::query::{Query, View};

/// Identifying inputs of a fetch. Two keys equal by value mean the same
/// request; a provider re-fetches exactly when its key changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchKey {
    pub type_name: String,
    pub query: Query,
    pub view: View,
}

impl FetchKey {
    pub fn new(type_name: &str, query: Query, view: View) -> Self {
        Self {
            type_name: type_name.to_string(),
            query,
            view,
        }
    }
}

/// The single place re-fetch decisions are made.
pub fn needs_fetch(fetched: Option<&FetchKey>, next: &FetchKey) -> bool {
    fetched != Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_keys_do_not_refetch() {
        let a = FetchKey::new(
            "Vendor",
            Query::from_value(json!({ "id": 1 })),
            View::new(),
        );
        let b = FetchKey::new(
            "Vendor",
            Query::from_value(json!({ "id": 1 })),
            View::new(),
        );
        assert!(!needs_fetch(Some(&a), &b));
    }

    #[test]
    fn any_component_change_refetches() {
        let base = FetchKey::new("Vendor", Query::by_id(1), View::new());

        let other_type = FetchKey::new("Listing", Query::by_id(1), View::new());
        assert!(needs_fetch(Some(&base), &other_type));

        let other_id = FetchKey::new("Vendor", Query::by_id(2), View::new());
        assert!(needs_fetch(Some(&base), &other_id));

        let other_view = FetchKey::new("Vendor", Query::by_id(1), View::preview());
        assert!(needs_fetch(Some(&base), &other_view));
    }

    #[test]
    fn first_fetch_always_fires() {
        let key = FetchKey::new("Vendor", Query::by_id(1), View::new());
        assert!(needs_fetch(None, &key));
    }
}
