//! Sort direction, sort descriptions and the composite sort-spec parser.
//!
//! A sort spec is either a single column name (`"name"`) or a composite
//! spec `col1|dir1&col2|dir2&...`. Inside a composite spec a segment may omit
//! its `|dir` part, in which case the request's default direction applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator between the keys of a composite sort spec.
pub const KEY_SEPARATOR: &str = "&";
/// Separator between a column and its direction inside one segment.
pub const DIRECTION_SEPARATOR: &str = "|";
/// Upper bound on the number of keys in one sort spec.
pub const MAX_SORT_KEYS: usize = 10;

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("Ascending"),
            SortDirection::Descending => f.write_str("Descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            _ => Err(Error::InvalidSortDirection {
                segment: s.to_string(),
                token: s.trim().to_string(),
            }),
        }
    }
}

/// One key of a multi-key ordering.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescription {
    pub property_name: String,
    pub direction: SortDirection,
}

impl SortDescription {
    pub fn new(property_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property_name: property_name.into(),
            direction,
        }
    }

    pub fn asc(property_name: impl Into<String>) -> Self {
        Self::new(property_name, SortDirection::Ascending)
    }

    pub fn desc(property_name: impl Into<String>) -> Self {
        Self::new(property_name, SortDirection::Descending)
    }
}

/// Ordered sequence of sort keys: the first is the primary key, the rest are
/// tie-breaks applied in listed order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder(pub Vec<SortDescription>);

impl SortOrder {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn single(property_name: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![SortDescription::new(property_name, direction)])
    }

    /// Append a tie-break key.
    #[must_use]
    pub fn then(mut self, property_name: impl Into<String>, direction: SortDirection) -> Self {
        self.0.push(SortDescription::new(property_name, direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn primary(&self) -> Option<&SortDescription> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortDescription> {
        self.0.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|k| k.property_name.eq_ignore_ascii_case(field))
    }

    /// Append `field` as the final key unless a key already names it.
    #[must_use]
    pub fn ensure_tiebreaker(mut self, field: &str, direction: SortDirection) -> Self {
        if !self.contains_field(field) {
            self.0.push(SortDescription::new(field, direction));
        }
        self
    }

    /// Render back into sort-spec form. A single key renders as the bare
    /// column name; its direction travels separately.
    pub fn to_spec_string(&self) -> String {
        match self.0.as_slice() {
            [] => String::new(),
            [only] => only.property_name.clone(),
            keys => keys
                .iter()
                .map(|k| format!("{}{}{}", k.property_name, DIRECTION_SEPARATOR, k.direction))
                .collect::<Vec<_>>()
                .join(KEY_SEPARATOR),
        }
    }
}

impl From<Vec<SortDescription>> for SortOrder {
    fn from(keys: Vec<SortDescription>) -> Self {
        Self(keys)
    }
}

impl<'a> IntoIterator for &'a SortOrder {
    type Item = &'a SortDescription;
    type IntoIter = std::slice::Iter<'a, SortDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a raw sort spec into an ordered sequence of sort descriptions.
///
/// Without a `&` the whole (trimmed) string is one column name sorted in
/// `default_direction`. With a `&` every segment is `col` or `col|dir`; an
/// unparsable `dir` is an error, never a silent default.
pub fn parse_sort_spec(raw: &str, default_direction: SortDirection) -> Result<SortOrder> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(SortOrder::empty());
    }

    if !raw.contains(KEY_SEPARATOR) {
        return Ok(SortOrder::single(raw, default_direction));
    }

    let mut keys = Vec::new();
    for segment in raw.split(KEY_SEPARATOR) {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(Error::InvalidSortSpec(format!("empty segment in '{raw}'")));
        }

        let (column, direction) = match segment.split_once(DIRECTION_SEPARATOR) {
            Some((column, token)) => {
                let direction =
                    token
                        .parse::<SortDirection>()
                        .map_err(|_| Error::InvalidSortDirection {
                            segment: segment.to_string(),
                            token: token.trim().to_string(),
                        })?;
                (column.trim(), direction)
            }
            None => (segment, default_direction),
        };

        if column.is_empty() {
            return Err(Error::InvalidSortSpec(format!(
                "empty column name in segment '{segment}'"
            )));
        }

        keys.push(SortDescription::new(column, direction));
    }

    if keys.len() > MAX_SORT_KEYS {
        return Err(Error::InvalidSortSpec(format!(
            "too many sort keys: {} (max {MAX_SORT_KEYS})",
            keys.len()
        )));
    }

    Ok(SortOrder(keys))
}
