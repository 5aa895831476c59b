//! GraphQL client for the Shopify Admin API.
//!
//! - [`GraphqlClient`]: sends one query per call to `graphql.json`
//! - [`GraphqlRequest`] / [`GraphqlResponse`]: the JSON envelopes
//! - [`GraphqlErrorDescriptor`]: one entry of the response `errors` array
//! - [`GraphqlError`]: every way a call can fail
//!
//! # Response Structure
//!
//! GraphQL responses contain these fields in the body:
//!
//! - `data`: The query result data
//! - `errors`: Any GraphQL errors (still HTTP 200)
//! - `extensions`: Query cost information
//!
//! A response with a non-empty `errors` array is returned as
//! [`GraphqlError::Response`]; its partial `data` is kept on the error.

mod client;
mod errors;
mod response;

pub use client::GraphqlClient;
pub use errors::GraphqlError;
pub use response::{
    GraphqlErrorDescriptor, GraphqlErrorLocation, GraphqlRequest, GraphqlResponse, Variables,
};
