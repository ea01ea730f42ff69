//! GraphQL transport for the Kiva marketplace API

mod client;
pub mod queries;

pub use client::{GraphQLTransport, HttpGraphQLClient};
