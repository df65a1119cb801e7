//! Template context: the key/value namespace templates render against.
//!
//! A [`Context`] is an insertion-ordered map from string keys to JSON values.
//! Every artifact owns one, and the site owns one more for the aggregates
//! shared by all pages. Lookups are explicit: [`Context::get`] returns `None`
//! for a missing key instead of silently producing a null.
//!
//! Templates see the site context and the artifact context merged, with the
//! artifact's keys winning.

use serde::Serialize;
use serde_json::{Map, Value};

/// An ordered, owned mapping of context keys to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level value, or `None` if the key was never set.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a top-level value as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy a subset of keys into a JSON object, skipping absent ones.
    pub fn project(&self, keys: &[&str]) -> Value {
        let mut out = Map::new();
        for key in keys {
            if let Some(value) = self.0.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
        Value::Object(out)
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_key_is_none() {
        let ctx = Context::new();
        assert_eq!(ctx.get("title"), None);
    }

    #[test]
    fn insert_preserves_order() {
        let mut ctx = Context::new();
        ctx.insert("url", "/a/");
        ctx.insert("title", "A");
        ctx.insert("src", "a.md");
        let keys: Vec<&str> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["url", "title", "src"]);
    }

    #[test]
    fn project_skips_absent_keys() {
        let mut ctx = Context::new();
        ctx.insert("url", "/a/");
        ctx.insert("raw_content", "lots of text");
        assert_eq!(ctx.project(&["url", "title"]), json!({"url": "/a/"}));
    }

    #[test]
    fn iter_follows_insertion_order() {
        let ctx: Context = [("b".to_string(), json!(1)), ("a".to_string(), json!(2))]
            .into_iter()
            .collect();
        let pairs: Vec<(&str, &Value)> = ctx.iter().collect();
        assert_eq!(pairs, vec![("b", &json!(1)), ("a", &json!(2))]);
    }
}
