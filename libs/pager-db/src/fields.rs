//! Explicit per-record-type field registry for in-process sources.
//!
//! Keys are case-insensitive. A nested record registered with
//! [`FieldMap::nest`] makes dotted paths (`owner.name`) resolvable one segment
//! at a time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use pager_core::Value;

type Read<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;
type Nested<R> = Arc<dyn Fn(&str) -> Option<Read<R>> + Send + Sync>;

/// A resolved field: its canonical path and how to read it off a record.
pub struct FieldAccessor<R> {
    path: Arc<str>,
    read: Read<R>,
}

impl<R> FieldAccessor<R> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn read(&self, record: &R) -> Value {
        (self.read)(record)
    }
}

impl<R> Clone for FieldAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            read: self.read.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldAccessor").field(&self.path).finish()
    }
}

impl<R> PartialEq for FieldAccessor<R> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

pub struct FieldMap<R> {
    fields: HashMap<String, Read<R>>,
    nested: HashMap<String, Nested<R>>,
    cache: DashMap<String, FieldAccessor<R>>,
}

impl<R> Default for FieldMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for FieldMap<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            nested: self.nested.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<R> FieldMap<R> {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            nested: HashMap::new(),
            cache: DashMap::new(),
        }
    }

    pub fn insert<F>(mut self, api_name: impl Into<String>, read: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.fields.insert(api_name.into().to_lowercase(), Arc::new(read));
        self
    }

    /// Register `inner` under `api_name`, reached from `R` through `via`.
    pub fn nest<N>(
        mut self,
        api_name: impl Into<String>,
        via: fn(&R) -> &N,
        inner: FieldMap<N>,
    ) -> Self
    where
        R: 'static,
        N: 'static,
    {
        let inner = Arc::new(inner);
        let resolve: Nested<R> = Arc::new(move |rest: &str| {
            let field = inner.get(rest)?;
            let read: Read<R> = Arc::new(move |record: &R| field.read(via(record)));
            Some(read)
        });
        self.nested.insert(api_name.into().to_lowercase(), resolve);
        self
    }

    /// Resolve a field path. Successful lookups are cached per distinct path.
    pub fn get(&self, path: &str) -> Option<FieldAccessor<R>> {
        let key = path.trim().to_lowercase();
        if let Some(hit) = self.cache.get(&key) {
            return Some(hit.clone());
        }

        let read = self.lookup(&key)?;
        let accessor = FieldAccessor {
            path: Arc::from(key.as_str()),
            read,
        };
        self.cache.insert(key, accessor.clone());
        Some(accessor)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    fn lookup(&self, key: &str) -> Option<Read<R>> {
        if let Some(read) = self.fields.get(key) {
            return Some(read.clone());
        }
        let (head, rest) = key.split_once('.')?;
        let resolve = self.nested.get(head)?;
        resolve(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        label: String,
    }

    struct Outer {
        n: i64,
        inner: Inner,
    }

    fn outer_fields() -> FieldMap<Outer> {
        let inner = FieldMap::new().insert("label", |i: &Inner| Value::from(&i.label));
        FieldMap::new()
            .insert("N", |o: &Outer| Value::from(o.n))
            .nest("Inner", |o: &Outer| &o.inner, inner)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let fields = outer_fields();
        let rec = Outer {
            n: 7,
            inner: Inner {
                label: "x".into(),
            },
        };
        let n = fields.get(" n ").expect("n");
        assert_eq!(n.path(), "n");
        assert_eq!(n.read(&rec), Value::Int(7));
        assert!(fields.contains("INNER.Label"));
    }

    #[test]
    fn test_dotted_path_reads_nested_record() {
        let fields = outer_fields();
        let rec = Outer {
            n: 1,
            inner: Inner {
                label: "deep".into(),
            },
        };
        let label = fields.get("inner.label").expect("inner.label");
        assert_eq!(label.read(&rec), Value::from("deep"));
    }

    #[test]
    fn test_unknown_paths_are_rejected_and_not_cached() {
        let fields = outer_fields();
        assert!(fields.get("missing").is_none());
        assert!(fields.get("inner.missing").is_none());
        assert!(fields.get("n.label").is_none());
        assert!(fields.cache.is_empty());

        fields.get("n");
        fields.get("N");
        assert_eq!(fields.cache.len(), 1);
    }
}
