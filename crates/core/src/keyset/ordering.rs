//! Total order over paginated items.

use std::cmp::Ordering;

use crate::ports::{OrderDirection, PageItem};

/// Compare two items by `(sort_key, id)`.
///
/// The id only breaks ties between equal sort values. `Desc` reverses the
/// whole comparison, tie-break included, so a descending walk is exactly
/// the ascending walk read backwards.
pub fn compare<T: PageItem>(a: &T, b: &T, key: T::SortKey, direction: OrderDirection) -> Ordering {
    let ascending = a
        .sort_value(key)
        .cmp(&b.sort_value(key))
        .then_with(|| a.id().cmp(b.id()));

    match direction {
        OrderDirection::Asc => ascending,
        OrderDirection::Desc => ascending.reverse(),
    }
}

/// Sort `items` in place by [`compare`].
pub fn sort_items<T: PageItem>(items: &mut [T], key: T::SortKey, direction: OrderDirection) {
    items.sort_by(|a, b| compare(a, b, key, direction));
}

/// Whether `item` comes strictly after `anchor` in `direction`.
pub fn is_after<T: PageItem>(item: &T, anchor: &T, key: T::SortKey, direction: OrderDirection) -> bool {
    compare(item, anchor, key, direction) == Ordering::Greater
}
