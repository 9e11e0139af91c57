//! Window planning and settlement.
//!
//! Backward windows are served by reading forward in the opposite
//! direction: "the `n` items before `C` in the requested order" is the
//! same set as "the first `n` items after `C` in the flipped order". The
//! page store only ever implements the forward read.

use crate::ports::{Cursor, FetchPlan, OrderDirection, PageInfo, PageItem, WindowRequest};

/// Direction the page store must read in.
///
/// `reverse` is the caller's requested order, `backward` whether the
/// window is anchored at the end. The two cancel out when both are set.
pub fn effective_direction(reverse: bool, backward: bool) -> OrderDirection {
    OrderDirection::from_descending(reverse ^ backward)
}

/// A page in the caller's requested order, with its page info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledWindow<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<Id: Clone> WindowRequest<Id> {
    /// Build the store read for this window.
    pub fn plan(&self, reverse: bool) -> FetchPlan<Id> {
        FetchPlan {
            direction: effective_direction(reverse, self.backward),
            cursor: self.cursor.clone(),
            fetch_limit: self.limit.saturating_add(1),
        }
    }

    /// Turn the rows read for [`Self::plan`] into the final page.
    ///
    /// `fetched` must be in the plan's direction and hold at most
    /// `fetch_limit` rows. The extra look-ahead row is dropped here.
    pub fn settle<T>(&self, mut fetched: Vec<T>) -> SettledWindow<T>
    where
        T: PageItem<Id = Id>,
    {
        let has_more = fetched.len() > self.limit;
        fetched.truncate(self.limit);

        if self.backward {
            fetched.reverse();
        }

        let (has_next_page, has_previous_page) = if self.backward {
            (self.before_supplied, has_more)
        } else {
            (has_more, self.after_supplied)
        };

        let page_info = PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: fetched.first().map(Cursor::for_item),
            end_cursor: fetched.last().map(Cursor::for_item),
        };

        SettledWindow {
            items: fetched,
            page_info,
        }
    }
}
