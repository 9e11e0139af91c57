use crate::ports::{Connection, Cursor, Edge, PageInfo, PageItem};

/// Build the connection returned to the API layer.
///
/// `total_count` comes from a separate count over the same filter and is
/// not reconciled with the page.
pub fn assemble<T: PageItem>(page: Vec<T>, page_info: PageInfo, total_count: i64) -> Connection<T> {
    let edges = page
        .into_iter()
        .map(|node| Edge {
            cursor: Cursor::for_item(&node),
            node,
        })
        .collect();

    Connection {
        edges,
        page_info,
        total_count,
    }
}
