//! Core domain layer for the todo API.
//!
//! This crate contains the domain models, port traits (interfaces), the
//! keyset connection engine and the services built on them. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     todo-api (binary)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │        todo-graphql (API)      │   todo-storage (Postgres)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     todo-core  ← YOU ARE HERE               │
//! │            (models, ports, keyset engine, services)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain models (User, Todo) and their sort keys
//! - [`ports`] - Interface traits for adapters to implement
//! - [`keyset`] - Pure pagination building blocks
//! - [`services`] - Connection resolution shared by all list fields
//! - [`error`] - Error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Pagination
//!
//! Every list field resolves through [`services::resolve_connection`]:
//!
//! 1. Validate `first`/`last`/`after`/`before` against the field's limits
//! 2. Pick the read direction (`reverse XOR backward`)
//! 3. Read `limit + 1` rows after the cursor and count the filter, concurrently
//! 4. Trim the look-ahead row, restore the requested order, derive page info
//! 5. Assemble edges, page info and total count

pub mod error;
pub mod keyset;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
