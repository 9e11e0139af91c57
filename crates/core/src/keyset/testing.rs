//! Test doubles shared by the keyset and service tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::ports::{Filter, OrderDirection, PageItem, PageStore};

use super::ordering::{is_after, sort_items};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub id: u32,
    pub rank: i32,
}

impl Row {
    pub fn new(id: u32, rank: i32) -> Self {
        Self { id, rank }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RowKey {
    Rank,
}

impl PageItem for Row {
    type Id = u32;
    type SortKey = RowKey;
    type SortValue = i32;

    const RESOURCE: &'static str = "rows";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn sort_value(&self, key: RowKey) -> i32 {
        match key {
            RowKey::Rank => self.rank,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RowFilter {
    pub min_rank: Option<i32>,
}

impl Filter<Row> for RowFilter {
    fn matches(&self, row: &Row) -> bool {
        self.min_rank.is_none_or(|min| row.rank >= min)
    }
}

/// Vec-backed store that counts calls and can be told to fail.
#[derive(Default)]
pub(crate) struct VecStore {
    pub rows: Vec<Row>,
    pub fail_fetch: bool,
    pub fail_count: bool,
    fetches: AtomicUsize,
    counts: AtomicUsize,
}

impl VecStore {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.fetches.load(Ordering::SeqCst),
            self.counts.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl PageStore<RowFilter, Row> for VecStore {
    async fn fetch_ordered(
        &self,
        sort_key: RowKey,
        direction: OrderDirection,
        after: Option<&u32>,
        limit: usize,
        filter: &RowFilter,
    ) -> StorageResult<Vec<Row>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(StorageError::QueryError("fetch failed".into()));
        }

        let mut rows: Vec<Row> = self.rows.iter().filter(|r| filter.matches(r)).cloned().collect();
        sort_items(&mut rows, sort_key, direction);

        if let Some(id) = after {
            let Some(anchor) = self.rows.iter().find(|r| r.id == *id) else {
                return Ok(Vec::new());
            };
            rows.retain(|r| is_after(r, anchor, sort_key, direction));
        }

        rows.truncate(limit);
        Ok(rows)
    }

    async fn count_matching(&self, filter: &RowFilter) -> StorageResult<i64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(StorageError::ConnectionError("count failed".into()));
        }
        Ok(self.rows.iter().filter(|r| filter.matches(r)).count() as i64)
    }
}
