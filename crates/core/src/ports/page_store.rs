//! Port trait for keyset page reads.
//!
//! Each paginated resource supplies one implementation; the connection
//! engine never branches on the resource type.

use async_trait::async_trait;

use crate::error::StorageResult;

use super::pagination::{OrderDirection, PageItem};

/// In-process form of a list filter.
///
/// Adapters that cannot push the filter down to a query engine use this
/// predicate. It must select exactly the rows the SQL form selects.
pub trait Filter<T>: Send + Sync + 'static {
    fn matches(&self, item: &T) -> bool;
}

/// Read side of a paginated resource.
#[async_trait]
pub trait PageStore<F, T>: Send + Sync
where
    F: Send + Sync + 'static,
    T: PageItem,
{
    /// Fetch up to `limit` items matching `filter`, ordered by
    /// `(sort_key, id)` in `direction`, strictly after `after`.
    ///
    /// With no cursor the read starts at the beginning of the ordering.
    /// If `after` no longer refers to an existing item the result is empty.
    async fn fetch_ordered(
        &self,
        sort_key: T::SortKey,
        direction: OrderDirection,
        after: Option<&T::Id>,
        limit: usize,
        filter: &F,
    ) -> StorageResult<Vec<T>>;

    /// Count all items matching `filter`, ignoring any window.
    async fn count_matching(&self, filter: &F) -> StorageResult<i64>;
}
