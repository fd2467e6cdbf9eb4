//! # Query Parameters
//!
//! Flattening of nested request parameters into `key=value` pairs, and the
//! [`PageQuery`] a list controller sends with every reload.
//!
//! Nested keys are written `parent[child]` for GET/DELETE and `parent.child`
//! for POST/PUT. Falsy leaves (`null`, `false`, `0`, `""`) are dropped.
//! Objects keep insertion order (`serde_json`'s `preserve_order`), which is
//! what carries sort priority to the backend.

use crate::sortable::{Filter, Order};
use reqwest::Method;
use serde_json::{Map, Value};

/// How nested parameter keys are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// `parent[child]`
    Bracket,
    /// `parent.child`
    Dot,
}

impl Notation {
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::POST || *method == Method::PUT {
            Notation::Dot
        } else {
            Notation::Bracket
        }
    }

    pub fn join(&self, parent: &str, child: &str) -> String {
        match self {
            Notation::Bracket => format!("{}[{}]", parent, child),
            Notation::Dot => format!("{}.{}", parent, child),
        }
    }
}

/// Flattens a JSON object (or array) into ordered `key=value` pairs.
pub fn flatten_params(value: &Value, notation: Notation) -> Vec<(String, String)> {
    let mut out = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(key.clone(), child, notation, &mut out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(index.to_string(), child, notation, &mut out);
            }
        }
        _ => {}
    }
    out
}

fn flatten_into(key: String, value: &Value, notation: Notation, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_into(notation.join(&key, child_key), child, notation, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(notation.join(&key, &index.to_string()), child, notation, out);
            }
        }
        leaf => {
            if let Some(rendered) = render_leaf(leaf) {
                out.push((key, rendered));
            }
        }
    }
}

fn render_leaf(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Insertion-ordered string map. Re-inserting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues(Vec<(String, String)>);

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kv = KeyValues::new();
        for (k, v) in iter {
            kv.insert(k, v);
        }
        kv
    }
}

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub order: Option<KeyValues>,
    pub filter: Option<KeyValues>,
}

impl PageQuery {
    /// Builds the query from controller state. Empty search, order and filter are omitted.
    pub fn build(page: u32, size: u32, search: Option<&str>, orders: &[Order], filters: &[Filter]) -> Self {
        let order: KeyValues = orders
            .iter()
            .map(|o| (o.column.as_str(), o.direction.as_str()))
            .collect();
        let filter: KeyValues = filters
            .iter()
            .map(|f| (f.key.as_str(), f.value.as_str()))
            .collect();
        Self {
            page,
            size,
            search: search.filter(|s| !s.is_empty()).map(str::to_string),
            order: (!order.is_empty()).then_some(order),
            filter: (!filter.is_empty()).then_some(filter),
        }
    }

    /// The query as a nested JSON object, keys in request order.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("page".to_string(), Value::from(self.page));
        root.insert("size".to_string(), Value::from(self.size));
        if let Some(search) = &self.search {
            root.insert("search".to_string(), Value::from(search.as_str()));
        }
        for (name, map) in [("order", &self.order), ("filter", &self.filter)] {
            if let Some(map) = map {
                let nested: Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect();
                root.insert(name.to_string(), Value::Object(nested));
            }
        }
        Value::Object(root)
    }

    /// Flat pairs for a request sent with `method`. Order priority is kept.
    pub fn to_params(&self, method: &Method) -> Vec<(String, String)> {
        flatten_params(&self.to_value(), Notation::for_method(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sortable::SortDirection;
    use serde_json::json;

    #[test]
    fn test_flatten_notation_follows_method() {
        let params = json!({"user": {"name": "Ann", "tags": ["a", "b"]}, "active": true});

        let get = flatten_params(&params, Notation::for_method(&Method::GET));
        assert!(get.contains(&("user[name]".to_string(), "Ann".to_string())));
        assert!(get.contains(&("user[tags][1]".to_string(), "b".to_string())));
        assert!(get.contains(&("active".to_string(), "true".to_string())));

        let post = flatten_params(&params, Notation::for_method(&Method::POST));
        assert!(post.contains(&("user.name".to_string(), "Ann".to_string())));
    }

    #[test]
    fn test_flatten_drops_falsy_leaves() {
        let params = json!({"a": null, "b": false, "c": 0, "d": "", "e": 7, "f": {"g": ""}});
        assert_eq!(
            flatten_params(&params, Notation::Bracket),
            vec![("e".to_string(), "7".to_string())]
        );
    }

    #[test]
    fn test_page_query_omits_empty_parts() {
        let query = PageQuery::build(1, 10, Some(""), &[], &[]);
        assert_eq!(query.search, None);
        assert_eq!(query.order, None);
        assert_eq!(query.filter, None);
        assert_eq!(
            query.to_params(&Method::GET),
            vec![
                ("page".to_string(), "1".to_string()),
                ("size".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_page_query_keeps_order_priority() {
        let orders = [
            Order::new("name", SortDirection::Asc),
            Order::new("created_at", SortDirection::Desc),
        ];
        let filters = [Filter::new("status", "active")];
        let query = PageQuery::build(2, 25, Some("ann"), &orders, &filters);

        assert_eq!(
            query.to_params(&Method::GET),
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "25".to_string()),
                ("search".to_string(), "ann".to_string()),
                ("order[name]".to_string(), "ASC".to_string()),
                ("order[created_at]".to_string(), "DESC".to_string()),
                ("filter[status]".to_string(), "active".to_string()),
            ]
        );
    }

    #[test]
    fn test_key_values_reinsert_keeps_position() {
        let mut kv = KeyValues::new();
        kv.insert("a", "1");
        kv.insert("b", "2");
        kv.insert("a", "3");
        assert_eq!(kv.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
        assert_eq!(kv.get("a"), Some("3"));
    }

    #[test]
    fn test_page_query_dot_notation_for_post() {
        let orders = [Order::new("name", SortDirection::Asc)];
        let filters = [Filter::new("status", "active"), Filter::new("role", "")];
        let query = PageQuery::build(1, 10, None, &orders, &filters);

        assert_eq!(
            query.to_params(&Method::POST),
            vec![
                ("page".to_string(), "1".to_string()),
                ("size".to_string(), "10".to_string()),
                ("order.name".to_string(), "ASC".to_string()),
                ("filter.status".to_string(), "active".to_string()),
            ]
        );
    }
}
