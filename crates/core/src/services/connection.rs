//! Connection resolution service.
//!
//! One generic entry point shared by every paginated list field, so the
//! window arithmetic lives in exactly one place.

use futures::future::try_join;
use tracing::{debug, instrument, trace, warn};

use crate::error::ConnectionResult;
use crate::keyset::{assemble, validate};
use crate::metrics::{
    ResolutionTimer, record_connection_resolved, record_storage_error, record_validation_error,
};
use crate::ports::{Connection, ConnectionArgs, PageItem, PageLimits, PageStore, WindowRequest};

/// Resolve one paginated list field.
///
/// Arguments are validated before the store is touched. The page read and
/// the count are then issued together and both must succeed; they may
/// observe different snapshots.
#[instrument(
    skip_all,
    fields(resource = T::RESOURCE, sort = ?args.sort_key, reverse = args.reverse)
)]
pub async fn resolve_connection<S, F, T>(
    store: &S,
    args: ConnectionArgs<T::SortKey>,
    limits: &PageLimits,
    filter: F,
) -> ConnectionResult<Connection<T>>
where
    S: PageStore<F, T> + ?Sized,
    F: Send + Sync + 'static,
    T: PageItem,
{
    let window: WindowRequest<T::Id> = validate(&args, limits).inspect_err(|e| {
        debug!(error = %e, "Rejected connection arguments");
        record_validation_error(T::RESOURCE, e.kind());
    })?;

    let _timer = ResolutionTimer::new(T::RESOURCE);
    let plan = window.plan(args.reverse);
    trace!(
        limit = window.limit,
        backward = window.backward,
        direction = ?plan.direction,
        cursor = ?plan.cursor,
        "Planned window"
    );

    let fetch = store.fetch_ordered(
        args.sort_key,
        plan.direction,
        plan.cursor.as_ref(),
        plan.fetch_limit,
        &filter,
    );
    let count = store.count_matching(&filter);

    let (fetched, total_count) = try_join(fetch, count).await.inspect_err(|e| {
        warn!(error = %e, "⚠️  Connection storage read failed");
        record_storage_error(T::RESOURCE);
    })?;

    let settled = window.settle(fetched);
    record_connection_resolved(T::RESOURCE, window.backward);
    trace!(
        items = settled.items.len(),
        total = total_count,
        "Connection resolved"
    );

    Ok(assemble(settled.items, settled.page_info, total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectionError, PaginationError};
    use crate::keyset::testing::{Row, RowFilter, RowKey, VecStore};
    use crate::keyset::{compare, sort_items};
    use crate::ports::{Cursor, OrderDirection};
    use futures::executor::block_on;
    use proptest::prelude::*;

    const LIMITS: PageLimits = PageLimits::new(30, 50, 10);

    /// A was created before B.
    fn two_items() -> VecStore {
        VecStore::new(vec![Row::new(1, 1), Row::new(2, 2)])
    }

    fn args(reverse: bool) -> ConnectionArgs<RowKey> {
        ConnectionArgs::ordered(RowKey::Rank, reverse)
    }

    async fn resolve(store: &VecStore, args: ConnectionArgs<RowKey>) -> ConnectionResult<Connection<Row>> {
        resolve_connection(store, args, &LIMITS, RowFilter::default()).await
    }

    fn ids(conn: &Connection<Row>) -> Vec<u32> {
        conn.edges.iter().map(|e| e.node.id).collect()
    }

    fn cursor(id: u32) -> Cursor {
        Cursor::new(id.to_string())
    }

    // -------------------------------------------------------------------------
    // Two-item scenarios
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_first_page_forward() {
        let conn = resolve(&two_items(), args(false).first(1)).await.unwrap();

        assert_eq!(ids(&conn), [1]);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
        assert_eq!(conn.page_info.start_cursor, Some(cursor(1)));
        assert_eq!(conn.page_info.end_cursor, Some(cursor(1)));
        assert_eq!(conn.total_count, 2);
    }

    #[tokio::test]
    async fn test_second_page_forward() {
        let conn = resolve(&two_items(), args(false).first(1).after(cursor(1)))
            .await
            .unwrap();

        assert_eq!(ids(&conn), [2]);
        assert!(!conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_last_page_backward() {
        let conn = resolve(&two_items(), args(false).last(1)).await.unwrap();

        assert_eq!(ids(&conn), [2]);
        assert!(!conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_backward_before_cursor() {
        let conn = resolve(&two_items(), args(false).last(1).before(cursor(2)))
            .await
            .unwrap();

        assert_eq!(ids(&conn), [1]);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_reverse_lists_newest_first() {
        let conn = resolve(&two_items(), args(true).first(1)).await.unwrap();

        assert_eq!(ids(&conn), [2]);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }

    // Test critique: un curseur invalide n'atteint jamais le stockage
    #[tokio::test]
    async fn test_malformed_cursor_skips_store() {
        let store = two_items();
        let err = resolve(&store, args(false).first(1).after(Cursor::new("A")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConnectionError::Validation(PaginationError::MalformedCursor { .. })
        ));
        assert_eq!(store.calls(), (0, 0));
    }

    // Test critique: toute erreur de validation précède les lectures
    #[tokio::test]
    async fn test_rejected_windows_skip_store() {
        let rejected = [
            (args(false).first(1).last(1), "ambiguous_window"),
            (args(false).first(31), "limit_exceeded"),
            (args(false).last(51), "limit_exceeded"),
            (args(false).first(-1), "negative_limit"),
            (args(false).last(-5), "negative_limit"),
        ];

        for (request, kind) in rejected {
            let store = two_items();
            let err = resolve(&store, request).await.unwrap_err();

            match err {
                ConnectionError::Validation(e) => assert_eq!(e.kind(), kind),
                other => panic!("expected validation error, got {other:?}"),
            }
            assert_eq!(store.calls(), (0, 0), "{kind}");
        }
    }

    // -------------------------------------------------------------------------
    // Mixed windows: `cursor = after ?? before`, direction from `last`
    // -------------------------------------------------------------------------

    fn five_items() -> VecStore {
        VecStore::new((1..=5).map(|i| Row::new(i, i as i32)).collect())
    }

    #[tokio::test]
    async fn test_first_with_before_reads_forward_from_cursor() {
        let conn = resolve(&five_items(), args(false).first(2).before(cursor(3)))
            .await
            .unwrap();

        assert_eq!(ids(&conn), [4, 5]);
        assert!(!conn.page_info.has_next_page);
        // `after` absent, so no previous page is reported
        assert!(!conn.page_info.has_previous_page);
        assert_eq!(conn.total_count, 5);
    }

    #[tokio::test]
    async fn test_last_with_after_reads_backward_from_cursor() {
        let conn = resolve(&five_items(), args(false).last(2).after(cursor(3)))
            .await
            .unwrap();

        assert_eq!(ids(&conn), [1, 2]);
        assert!(!conn.page_info.has_previous_page);
        // `before` absent, so no next page is reported
        assert!(!conn.page_info.has_next_page);
    }

    #[tokio::test]
    async fn test_last_with_after_reports_more_rows_before() {
        let conn = resolve(&five_items(), args(false).last(1).after(cursor(3)))
            .await
            .unwrap();

        assert_eq!(ids(&conn), [2]);
        assert!(conn.page_info.has_previous_page);
        assert!(!conn.page_info.has_next_page);
    }

    // -------------------------------------------------------------------------
    // Failure propagation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_both_reads_issued_once() {
        let store = two_items();
        resolve(&store, args(false).first(1)).await.unwrap();
        assert_eq!(store.calls(), (1, 1));
    }

    // Test critique: aucune connexion partielle si le comptage échoue
    #[tokio::test]
    async fn test_count_failure_aborts_resolution() {
        let mut store = two_items();
        store.fail_count = true;

        let err = resolve(&store, args(false).first(1)).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Adapter(_)));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_resolution() {
        let mut store = two_items();
        store.fail_fetch = true;

        let err = resolve(&store, args(false).last(1)).await.unwrap_err();
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_vanished_cursor_degrades_to_empty_page() {
        let conn = resolve(&two_items(), args(false).first(5).after(cursor(99)))
            .await
            .unwrap();

        assert!(conn.edges.is_empty());
        assert!(!conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);
        assert_eq!(conn.page_info.start_cursor, None);
        assert_eq!(conn.total_count, 2);
    }

    #[tokio::test]
    async fn test_filter_applies_to_page_and_count() {
        let store = VecStore::new((1..=6).map(|i| Row::new(i, i as i32)).collect());
        let filter = RowFilter { min_rank: Some(4) };

        let conn = resolve_connection(&store, args(false).first(2), &LIMITS, filter)
            .await
            .unwrap();

        assert_eq!(ids(&conn), [4, 5]);
        assert_eq!(conn.total_count, 3);
        assert!(conn.page_info.has_next_page);
    }

    // -------------------------------------------------------------------------
    // Collection-wide properties
    // -------------------------------------------------------------------------

    fn expected_order(rows: &[Row], reverse: bool) -> Vec<u32> {
        let mut sorted = rows.to_vec();
        sort_items(&mut sorted, RowKey::Rank, OrderDirection::from_descending(reverse));
        sorted.into_iter().map(|r| r.id).collect()
    }

    fn walk_forward(store: &VecStore, reverse: bool) -> Vec<u32> {
        let mut seen = Vec::new();
        let mut after = None;
        loop {
            let mut request = args(reverse).first(1);
            request.after = after.take();
            let conn = block_on(resolve(store, request)).unwrap();
            seen.extend(ids(&conn));
            if !conn.page_info.has_next_page {
                return seen;
            }
            after = conn.page_info.end_cursor;
        }
    }

    fn walk_backward(store: &VecStore, reverse: bool) -> Vec<u32> {
        let mut seen = Vec::new();
        let mut before = None;
        loop {
            let mut request = args(reverse).last(1);
            request.before = before.take();
            let conn = block_on(resolve(store, request)).unwrap();
            seen.extend(ids(&conn));
            if !conn.page_info.has_previous_page {
                seen.reverse();
                return seen;
            }
            before = conn.page_info.start_cursor;
        }
    }

    #[tokio::test]
    async fn test_tail_and_head_boundaries() {
        let store = VecStore::new((1..=5).map(|i| Row::new(i, i as i32)).collect());

        let tail = resolve(&store, args(false).first(10).after(cursor(3))).await.unwrap();
        assert_eq!(ids(&tail), [4, 5]);
        assert!(!tail.page_info.has_next_page);
        assert!(tail.page_info.has_previous_page);

        let head = resolve(&store, args(false).last(10).before(cursor(3))).await.unwrap();
        assert_eq!(ids(&head), [1, 2]);
        assert!(head.page_info.has_next_page);
        assert!(!head.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_identical_args_yield_identical_connection() {
        let store = VecStore::new((1..=7).map(|i| Row::new(i, (i % 3) as i32)).collect());
        let request = args(true).last(3).before(cursor(4));

        let first = resolve(&store, request.clone()).await.unwrap();
        let second = resolve(&store, request).await.unwrap();
        assert_eq!(first, second);
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
        // Narrow rank range forces plenty of ties
        prop::collection::vec(0i32..4, 0..12).prop_map(|ranks| {
            ranks
                .into_iter()
                .enumerate()
                .map(|(i, rank)| Row::new(i as u32 * 7 % 13 + 100 * i as u32, rank))
                .collect()
        })
    }

    proptest! {
        // Test critique: parcourir avec first=1 visite chaque élément une seule fois, dans l'ordre
        #[test]
        fn prop_forward_walk_enumerates_in_order(rows in rows_strategy(), reverse: bool) {
            let store = VecStore::new(rows.clone());
            prop_assert_eq!(walk_forward(&store, reverse), expected_order(&rows, reverse));
        }

        // Ties sort identically whichever end the walk starts from
        #[test]
        fn prop_backward_walk_matches_forward_walk(rows in rows_strategy(), reverse: bool) {
            let store = VecStore::new(rows);
            prop_assert_eq!(walk_backward(&store, reverse), walk_forward(&store, reverse));
        }

        #[test]
        fn prop_forward_page_reproducible_backward(
            rows in rows_strategy(),
            reverse: bool,
            offset in 0usize..64,
            size in 1usize..4,
        ) {
            let order = expected_order(&rows, reverse);
            if order.len() <= size {
                return Ok(());
            }
            // Leave at least one item after the page to anchor `before` on
            let start = offset % (order.len() - size);
            let store = VecStore::new(rows);

            let mut forward = args(reverse).first(size as i32);
            if start > 0 {
                forward.after = Some(cursor(order[start - 1]));
            }
            let backward = args(reverse).last(size as i32).before(cursor(order[start + size]));

            let fwd = block_on(resolve(&store, forward)).unwrap();
            let bwd = block_on(resolve(&store, backward)).unwrap();

            prop_assert_eq!(ids(&fwd), order[start..start + size].to_vec());
            prop_assert_eq!(ids(&fwd), ids(&bwd));
            prop_assert_eq!(fwd.page_info.has_next_page, bwd.page_info.has_next_page);
            prop_assert_eq!(fwd.page_info.has_previous_page, bwd.page_info.has_previous_page);
        }
    }

    #[test]
    fn test_compare_consistent_with_walk_order() {
        let rows = vec![Row::new(3, 1), Row::new(1, 1), Row::new(2, 0)];
        let order = expected_order(&rows, false);
        assert_eq!(order, [2, 1, 3]);
        assert_eq!(
            compare(&rows[1], &rows[0], RowKey::Rank, OrderDirection::Asc),
            std::cmp::Ordering::Less
        );
    }
}
