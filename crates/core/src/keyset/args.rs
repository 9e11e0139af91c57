//! Validation of raw connection arguments.

use std::str::FromStr;

use crate::error::{PaginationError, PaginationResult};
use crate::ports::{ConnectionArgs, Cursor, PageLimits, WindowRequest};

/// Normalize `args` into a [`WindowRequest`] or reject them.
///
/// Checks run in a fixed order: window ambiguity, then sizes, then
/// cursors. No storage is touched.
pub fn validate<Id, K>(args: &ConnectionArgs<K>, limits: &PageLimits) -> PaginationResult<WindowRequest<Id>>
where
    Id: FromStr,
{
    if args.first.is_some() && args.last.is_some() {
        return Err(PaginationError::AmbiguousWindow);
    }

    let first = args
        .first
        .map(|n| check_limit("first", n, limits.first_max))
        .transpose()?;
    let last = args
        .last
        .map(|n| check_limit("last", n, limits.last_max))
        .transpose()?;

    let after = args.after.as_ref().map(|c| decode("after", c)).transpose()?;
    let before = args.before.as_ref().map(|c| decode("before", c)).transpose()?;

    let limit = first.or(last).unwrap_or(limits.default_limit as usize);

    Ok(WindowRequest {
        limit,
        backward: last.is_some(),
        after_supplied: after.is_some(),
        before_supplied: before.is_some(),
        cursor: after.or(before),
    })
}

fn check_limit(argument: &'static str, requested: i32, max: u32) -> PaginationResult<usize> {
    let n = u32::try_from(requested)
        .map_err(|_| PaginationError::NegativeLimit { argument, requested })?;

    if n > max {
        return Err(PaginationError::LimitExceeded {
            argument,
            requested,
            max,
        });
    }

    Ok(n as usize)
}

fn decode<Id: FromStr>(argument: &'static str, cursor: &Cursor) -> PaginationResult<Id> {
    cursor.decode().ok_or_else(|| PaginationError::MalformedCursor {
        argument,
        value: cursor.value.clone(),
    })
}
