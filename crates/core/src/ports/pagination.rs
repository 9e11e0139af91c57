//! Pagination types for list queries.
//!
//! These types implement Relay-style cursor pagination over keyset
//! ordering. A cursor is the unique id of an item, never an offset, so
//! pages stay stable while rows are inserted or deleted around them.

use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Opaque cursor for pagination.
///
/// The value is the string form of one item's unique id. Clients must
/// treat it as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Cursor pointing at `item`.
    pub fn for_item<T: PageItem>(item: &T) -> Self {
        Self::new(item.id().to_string())
    }

    /// Decode the cursor back into the resource identifier.
    pub fn decode<Id: FromStr>(&self) -> Option<Id> {
        self.value.parse().ok()
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// A record that can be paginated with keyset cursors.
///
/// Items are totally ordered by `(sort_value(key), id)`. The id doubles as
/// the cursor, so it must be unique within the resource.
pub trait PageItem: Send + Sync + 'static {
    /// Unique identifier, also the cursor payload.
    type Id: Ord + Clone + Display + FromStr + Debug + Send + Sync + 'static;

    /// Closed set of columns this resource can be sorted by.
    type SortKey: Copy + Debug + Send + Sync + 'static;

    /// Value of a sort column for one item.
    type SortValue: Ord;

    /// Resource label used in logs and metrics.
    const RESOURCE: &'static str;

    fn id(&self) -> &Self::Id;

    fn sort_value(&self, key: Self::SortKey) -> Self::SortValue;
}

/// Raw connection arguments as received from the API layer.
///
/// Supports forward pagination (`first`/`after`) and backward
/// pagination (`last`/`before`). `reverse` flips the natural ascending
/// order of `sort_key`.
#[derive(Debug, Clone)]
pub struct ConnectionArgs<K> {
    /// Number of items to fetch (forward pagination).
    pub first: Option<i32>,
    /// Cursor to start after (forward pagination).
    pub after: Option<Cursor>,
    /// Number of items to fetch (backward pagination).
    pub last: Option<i32>,
    /// Cursor to end before (backward pagination).
    pub before: Option<Cursor>,
    /// Column to order by.
    pub sort_key: K,
    /// Sort descending instead of ascending.
    pub reverse: bool,
}

impl<K> ConnectionArgs<K> {
    /// Arguments with no window, only an ordering.
    pub fn ordered(sort_key: K, reverse: bool) -> Self {
        Self {
            first: None,
            after: None,
            last: None,
            before: None,
            sort_key,
            reverse,
        }
    }

    pub fn first(mut self, first: i32) -> Self {
        self.first = Some(first);
        self
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.after = Some(cursor);
        self
    }

    pub fn last(mut self, last: i32) -> Self {
        self.last = Some(last);
        self
    }

    pub fn before(mut self, cursor: Cursor) -> Self {
        self.before = Some(cursor);
        self
    }
}

/// Per-field window size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Largest accepted `first`.
    pub first_max: u32,
    /// Largest accepted `last`.
    pub last_max: u32,
    /// Window size used when neither `first` nor `last` is given.
    pub default_limit: u32,
}

impl PageLimits {
    pub const fn new(first_max: u32, last_max: u32, default_limit: u32) -> Self {
        Self {
            first_max,
            last_max,
            default_limit,
        }
    }
}

/// Normalized window produced by argument validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest<Id> {
    /// Maximum number of items in the page.
    pub limit: usize,
    /// Decoded `after ?? before`.
    pub cursor: Option<Id>,
    /// `last` was supplied.
    pub backward: bool,
    /// An `after` cursor was supplied.
    pub after_supplied: bool,
    /// A `before` cursor was supplied.
    pub before_supplied: bool,
}

/// Concrete instruction for the page store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan<Id> {
    /// Direction rows are read in.
    pub direction: OrderDirection,
    /// Exclusive lower bound in `direction`.
    pub cursor: Option<Id>,
    /// Page size plus one look-ahead row.
    pub fetch_limit: usize,
}

/// Paginated result set with edges and page info.
///
/// This is the Relay connection pattern for cursor-based pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<T> {
    /// List of edges (node + cursor pairs).
    pub edges: Vec<Edge<T>>,
    /// Information about the current page.
    pub page_info: PageInfo,
    /// Total count of items matching the filter, ignoring the window.
    pub total_count: i64,
}

/// A single item in a paginated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    /// The actual item.
    pub node: T,
    /// Cursor for this item (used for pagination).
    pub cursor: Cursor,
}

/// Information about the current page in a paginated result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor of the first item in this page.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last item in this page.
    pub end_cursor: Option<Cursor>,
}

/// Ordering direction for sorted queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl OrderDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending { Self::Desc } else { Self::Asc }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
