//! GraphQL type definitions.

use async_graphql::{EmptySubscription, Schema};

use crate::schema::{MutationRoot, QueryRoot};

/// The todo API schema.
pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;
