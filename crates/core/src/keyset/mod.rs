//! Keyset connection engine.
//!
//! Pure building blocks for Relay connections over `(sort_key, id)`
//! ordering:
//!
//! - [`validate`] - raw arguments to a [`WindowRequest`](crate::ports::WindowRequest)
//! - [`effective_direction`] and `WindowRequest::plan` - what to read
//! - `WindowRequest::settle` - page info and requested order
//! - [`assemble`] - the final [`Connection`](crate::ports::Connection)
//! - [`compare`] - the total order every adapter must follow
//!
//! [`crate::services::resolve_connection`] chains them around the page store.

mod args;
mod assemble;
mod ordering;
mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use args::validate;
pub use assemble::assemble;
pub use ordering::{compare, is_after, sort_items};
pub use window::{SettledWindow, effective_direction};
