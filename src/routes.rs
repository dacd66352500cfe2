//! Typed navigation targets rendered as `/{Type}/{id}`-style paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    Collection { type_name: String },
    Detail { type_name: String, id: i64 },
    Tasks,
}

impl Route {
    pub fn collection(type_name: &str) -> Self {
        Route::Collection {
            type_name: type_name.to_string(),
        }
    }

    pub fn detail(type_name: &str, id: i64) -> Self {
        Route::Detail {
            type_name: type_name.to_string(),
            id,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Search => "/search".to_string(),
            Route::Collection { type_name } => format!("/{type_name}"),
            Route::Detail { type_name, id } => format!("/{type_name}/{id}"),
            Route::Tasks => "/tasks".to_string(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        match trimmed {
            "search" => return Some(Route::Search),
            "tasks" => return Some(Route::Tasks),
            _ => {}
        }

        let mut parts = trimmed.splitn(2, '/');
        let type_name = parts.next()?.to_string();
        match parts.next() {
            None => Some(Route::Collection { type_name }),
            Some(id) => id.parse().ok().map(|id| Route::Detail { type_name, id }),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_renders_type_and_id() {
        assert_eq!(Route::detail("Vendor", 42).path(), "/Vendor/42");
    }

    #[test]
    fn parse_round_trips() {
        for raw in ["/search", "/tasks", "/Vendor", "/Listing/7"] {
            let route = Route::parse(raw).expect("parses");
            assert_eq!(route.path(), raw);
        }
    }

    #[test]
    fn parse_rejects_garbage_ids() {
        assert_eq!(Route::parse("/Vendor/forty-two"), None);
        assert_eq!(Route::parse(""), None);
    }
}
