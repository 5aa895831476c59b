//! The two Admin API tasks.
//!
//! - [`leaderboard`]: export the top customers of a tagged segment to CSV
//! - [`flag_capture`]: find the flag product, stop tracking its inventory and
//!   look for an order that bought it
//!
//! The tasks are independent. Each takes the shared [`GraphqlClient`] and
//! returns its own report or error; deciding what is fatal is left to the
//! caller.
//!
//! [`GraphqlClient`]: crate::clients::GraphqlClient

use serde::Deserialize;

pub mod flag_capture;
pub mod leaderboard;

/// Result of a workflow step that is allowed to go wrong.
///
/// A step that cannot be tolerated returns a plain `Result` instead. Both
/// failure tags carry the same error type; the caller decides for each tag
/// whether the workflow continues.
#[derive(Debug)]
#[must_use]
pub enum StepOutcome<T, E> {
    /// The step did what it was asked.
    Success(T),
    /// The step ran and the service reported a problem, or found nothing.
    Warning(E),
    /// The step did not run to completion: the request failed or the response
    /// could not be read.
    Failed(E),
}

/// A Relay-style connection as returned by the Admin API.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

/// An object that only carries a global ID.
#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly {
    pub id: String,
}
