//! Application services built on the port traits.

mod connection;

pub use connection::resolve_connection;
