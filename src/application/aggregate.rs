//! Aggregation Query Coordinator
//!
//! Runs a named set of independent lookups concurrently and joins them into
//! one result map. The first failure wins: the remaining lookups are aborted
//! and no partial map is returned.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::task::{JoinError, JoinSet};
use tracing::debug;

type Query<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query '{0}' was added twice")]
pub struct DuplicateQuery(pub &'static str);

pub struct Aggregate<T, E> {
    queries: Vec<(&'static str, Query<T, E>)>,
}

impl<T, E> Default for Aggregate<T, E> {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
        }
    }
}

impl<T, E> Aggregate<T, E>
where
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query<F>(mut self, name: &'static str, future: F) -> Result<Self, DuplicateQuery>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        if self.queries.iter().any(|(existing, _)| *existing == name) {
            return Err(DuplicateQuery(name));
        }
        self.queries.push((name, Box::pin(future)));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Spawn every query and wait for all of them, or for the first error.
    ///
    /// A panicked task is reported through `E::from(JoinError)`.
    pub async fn run(self) -> Result<Combined<T>, E> {
        let mut set = JoinSet::new();
        for (name, future) in self.queries {
            set.spawn(async move { (name, future.await) });
        }

        let mut slots = HashMap::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(value))) => {
                    slots.insert(name, value);
                }
                Ok((name, Err(err))) => {
                    debug!(query = name, pending = set.len(), "aggregate query failed");
                    set.abort_all();
                    return Err(err);
                }
                Err(join) => {
                    debug!(pending = set.len(), "aggregate task did not complete");
                    set.abort_all();
                    return Err(E::from(join));
                }
            }
        }
        Ok(Combined { slots })
    }
}

/// Results of a completed aggregate, keyed by query name.
#[derive(Debug)]
pub struct Combined<T> {
    slots: HashMap<&'static str, T>,
}

impl<T> Combined<T> {
    pub fn take(&mut self, name: &str) -> Option<T> {
        self.slots.remove(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
