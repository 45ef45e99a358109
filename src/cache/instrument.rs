//! Call Instrumentation
//!
//! Decorators that wrap an [`Operation`] without changing its signature:
//! [`CountCalls`] keeps a per-identity counter and [`CallHistory`] appends the
//! arguments and result of every call to two parallel store lists.
//!
//! Decorators are composed at construction time:
//!
//! ```ignore
//! let op = CountCalls::new(store.clone(), CallHistory::new(store.clone(), inner));
//! ```

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use super::value::decode_int;
use crate::error::Result;
use crate::store::{KeyValueStore, SharedStore};

// == Operation ==
/// An async operation with a stable identity that decorators can wrap.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Argument type; its debug form is the recorded input snapshot
    type Input: fmt::Debug + Send + 'static;
    /// Result type; its display form is the recorded output
    type Output: fmt::Display + Send + 'static;

    /// Stable name used to namespace counters and history keys.
    fn identity(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}

/// Store key of the list holding recorded inputs for `identity`.
pub fn inputs_key(identity: &str) -> String {
    format!("{}:inputs", identity)
}

/// Store key of the list holding recorded outputs for `identity`.
pub fn outputs_key(identity: &str) -> String {
    format!("{}:outputs", identity)
}

/// Reads an integer counter, treating a missing key as zero.
pub async fn read_counter(store: &dyn KeyValueStore, key: &str) -> Result<i64> {
    match store.get(key).await? {
        Some(bytes) => decode_int(bytes),
        None => Ok(0),
    }
}

// == Count Calls ==
/// Increments the counter keyed by the operation identity before every call.
pub struct CountCalls<O> {
    store: SharedStore,
    inner: O,
}

impl<O: Operation> CountCalls<O> {
    pub fn new(store: SharedStore, inner: O) -> Self {
        Self { store, inner }
    }

    /// Number of recorded invocations.
    pub async fn count(&self) -> Result<i64> {
        read_counter(self.store.as_ref(), self.inner.identity()).await
    }
}

#[async_trait]
impl<O: Operation> Operation for CountCalls<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn identity(&self) -> &str {
        self.inner.identity()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let count = self.store.increment(self.identity()).await?;
        debug!("{} call #{}", self.identity(), count);
        self.inner.call(input).await
    }
}

// == Call History ==
/// Records the argument snapshot before the call and the result after it.
///
/// A failing inner call leaves its input recorded without a matching output,
/// so the two lists can differ in length.
pub struct CallHistory<O> {
    store: SharedStore,
    inner: O,
}

impl<O: Operation> CallHistory<O> {
    pub fn new(store: SharedStore, inner: O) -> Self {
        Self { store, inner }
    }
}

#[async_trait]
impl<O: Operation> Operation for CallHistory<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn identity(&self) -> &str {
        self.inner.identity()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let identity = self.identity();

        let snapshot = format!("{:?}", (&input,));
        self.store
            .append_to_list(&inputs_key(identity), snapshot.as_bytes())
            .await?;

        let output = self.inner.call(input).await?;

        self.store
            .append_to_list(&outputs_key(identity), output.to_string().as_bytes())
            .await?;

        Ok(output)
    }
}
