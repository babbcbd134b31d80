//! Dynamic ordering: from request parameters to a source ordering.

use pager_core::{parse_sort_spec, Error, Pageable, QueryParameters, Result, SortDirection, SortOrder};

use crate::source::{OrderedQuery, QueryableSource};

/// Ordering a request runs under.
///
/// The parsed explicit sort when the request carries one, otherwise the
/// record type's default. The declared tie-break, if any, is appended.
pub fn effective_order<R: Pageable>(query: &QueryParameters) -> Result<SortOrder> {
    let order = if query.has_sorting_condition() {
        parse_sort_spec(&query.sort_spec, query.sort_direction)?
    } else {
        R::default_order()
    };

    Ok(match R::TIEBREAKER {
        Some(field) => order.ensure_tiebreaker(field, SortDirection::Ascending),
        None => order,
    })
}

/// Resolve every key of `order` against `source`. Nothing is applied unless
/// all keys resolve.
pub fn resolve_order<S>(source: &S, order: &SortOrder) -> Result<Vec<(S::Key, SortDirection)>>
where
    S: QueryableSource + ?Sized,
{
    order
        .iter()
        .map(|key| {
            source
                .resolve(&key.property_name)
                .map(|k| (k, key.direction))
                .ok_or_else(|| Error::UnknownField(key.property_name.clone()))
        })
        .collect()
}

/// First key becomes the primary ordering, the rest are tie-breaks in order.
pub fn apply_order<Q: OrderedQuery>(query: Q, keys: &[(Q::Key, SortDirection)]) -> Q {
    let mut keys = keys.iter();
    let Some((first, direction)) = keys.next() else {
        return query;
    };
    keys.fold(query.order_by(first, *direction), |q, (key, direction)| {
        q.then_by(key, *direction)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pager_core::SortDescription;

    struct Plain;
    impl Pageable for Plain {}

    struct WithTiebreak;
    impl Pageable for WithTiebreak {
        const TIEBREAKER: Option<&'static str> = Some("id");

        fn default_order() -> SortOrder {
            SortOrder::single("created", SortDirection::Descending)
        }
    }

    #[test]
    fn test_default_order_when_no_explicit_sort() {
        let order = effective_order::<Plain>(&QueryParameters::new()).expect("order");
        assert_eq!(order.0, vec![SortDescription::asc("name")]);
    }

    #[test]
    fn test_explicit_sort_overrides_default() {
        let q = QueryParameters::new().with_sort("age|Descending&name", SortDirection::Ascending);
        let order = effective_order::<Plain>(&q).expect("order");
        assert_eq!(
            order.0,
            vec![SortDescription::desc("age"), SortDescription::asc("name")]
        );
    }

    #[test]
    fn test_tiebreaker_appended_once() {
        let order = effective_order::<WithTiebreak>(&QueryParameters::new()).expect("order");
        assert_eq!(
            order.0,
            vec![SortDescription::desc("created"), SortDescription::asc("id")]
        );

        let q = QueryParameters::new().with_sort("ID", SortDirection::Descending);
        let order = effective_order::<WithTiebreak>(&q).expect("order");
        assert_eq!(order.0, vec![SortDescription::desc("ID")]);
    }
}
