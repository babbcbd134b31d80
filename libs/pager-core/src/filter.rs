//! Storage-agnostic predicate AST and the filter composer.
//!
//! Data sources never see field names: the orchestrator resolves a
//! `Filter<String>` into `Filter<K>` (where `K` is whatever the source uses to
//! address a field) before the count and the fetch. Both receive the very same
//! resolved value.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pageable::Pageable;
use crate::query::QueryParameters;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
            Value::Uuid(_) => 4,
            Value::DateTime(_) => 5,
        }
    }

    /// Total order used for in-process sorting.
    ///
    /// Nulls sort first; ints and floats compare numerically; values of
    /// different kinds compare by kind.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Predicate over a record, addressed through field keys of type `K`.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter<K = String> {
    /// Matches every record.
    All,
    /// Equality. `Eq(k, Value::Null)` tests for a missing value.
    Eq(K, Value),
    /// Case-insensitive substring match on a text field. A non-text value
    /// never matches.
    Contains(K, String),
    And(Vec<Filter<K>>),
    Or(Vec<Filter<K>>),
    Not(Box<Filter<K>>),
}

impl Filter<String> {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains(field.into(), needle.into())
    }
}

impl<K> Filter<K> {
    /// Conjunction, flattening nested `And`s and dropping `All`.
    pub fn and(self, other: Filter<K>) -> Self {
        let mut parts = Vec::new();
        for f in [self, other] {
            match f {
                Filter::All => {}
                Filter::And(inner) => parts.extend(inner),
                f => parts.push(f),
            }
        }
        match parts.len() {
            0 => Filter::All,
            1 => parts.pop().unwrap_or(Filter::All),
            _ => Filter::And(parts),
        }
    }

    pub fn or(self, other: Filter<K>) -> Self {
        match self {
            Filter::Or(mut parts) => {
                parts.push(other);
                Filter::Or(parts)
            }
            f => Filter::Or(vec![f, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Map every field key, failing on the first one `lookup` cannot resolve.
    pub fn try_map_keys<K2, E>(
        &self,
        lookup: &mut impl FnMut(&K) -> std::result::Result<K2, E>,
    ) -> std::result::Result<Filter<K2>, E> {
        Ok(match self {
            Filter::All => Filter::All,
            Filter::Eq(k, v) => Filter::Eq(lookup(k)?, v.clone()),
            Filter::Contains(k, s) => Filter::Contains(lookup(k)?, s.clone()),
            Filter::And(parts) => Filter::And(
                parts
                    .iter()
                    .map(|p| p.try_map_keys(lookup))
                    .collect::<std::result::Result<_, _>>()?,
            ),
            Filter::Or(parts) => Filter::Or(
                parts
                    .iter()
                    .map(|p| p.try_map_keys(lookup))
                    .collect::<std::result::Result<_, _>>()?,
            ),
            Filter::Not(inner) => Filter::Not(Box::new(inner.try_map_keys(lookup)?)),
        })
    }

    /// Evaluate against a record, given a way to read a field's value.
    ///
    /// Null values follow SQL three-valued logic: comparing a null field with
    /// a non-null value is unknown, and `Not` of unknown is still unknown, so
    /// such a record matches neither a predicate nor its negation.
    pub fn matches<R>(&self, record: &R, read: &impl Fn(&K, &R) -> Value) -> bool {
        self.eval(record, read) == Some(true)
    }

    fn eval<R>(&self, record: &R, read: &impl Fn(&K, &R) -> Value) -> Option<bool> {
        match self {
            Filter::All => Some(true),
            Filter::Eq(k, Value::Null) => Some(read(k, record) == Value::Null),
            Filter::Eq(k, v) => match read(k, record) {
                Value::Null => None,
                found => Some(found.sort_cmp(v) == Ordering::Equal),
            },
            Filter::Contains(k, needle) => match read(k, record) {
                Value::Null => None,
                Value::Text(s) => Some(s.to_lowercase().contains(&needle.to_lowercase())),
                _ => Some(false),
            },
            Filter::And(parts) => {
                let mut result = Some(true);
                for part in parts {
                    match part.eval(record, read) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Filter::Or(parts) => {
                let mut result = Some(false);
                for part in parts {
                    match part.eval(record, read) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Filter::Not(inner) => inner.eval(record, read).map(|b| !b),
        }
    }
}

impl Filter<String> {
    /// Resolve field names to source keys. Unknown names are request errors.
    pub fn resolve<K2>(&self, mut lookup: impl FnMut(&str) -> Option<K2>) -> Result<Filter<K2>> {
        self.try_map_keys(&mut |name: &String| {
            lookup(name).ok_or_else(|| Error::UnknownField(name.clone()))
        })
    }
}

/// Mandatory predicate: exclude soft-deleted records.
pub fn baseline_filter<R: Pageable>() -> Filter {
    Filter::equals(R::DELETED_FIELD, false)
}

/// Build the single predicate used for both counting and fetching.
///
/// `baseline AND [relative scope] AND [search]`. The search key never
/// replaces or loosens the baseline.
pub fn compose_filter<R: Pageable>(query: &QueryParameters) -> Result<Filter> {
    let mut filter = baseline_filter::<R>();

    if let Some(relative_id) = query.relative_id {
        let field = R::RELATIVE_FIELD.ok_or(Error::UnsupportedRelativeScope)?;
        filter = filter.and(Filter::equals(field, relative_id));
    }

    if query.has_search() {
        filter = filter.and(R::search_filter(query.search_key.trim()));
    }

    Ok(filter)
}
