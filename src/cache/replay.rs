//! Replay Module
//!
//! Reads back the call history recorded by
//! [`CallHistory`](super::instrument::CallHistory) and renders it as a trace.

use std::fmt;

use serde::Serialize;

use super::instrument::{inputs_key, outputs_key};
use crate::error::Result;
use crate::store::KeyValueStore;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Argument snapshot, e.g. `("foo",)`
    pub input: String,
    /// Rendered result
    pub output: String,
}

/// Recorded history of one operation identity.
///
/// Renders as:
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store(*("foo",)) -> 6a1b...
/// Cache.store(*(42,)) -> 0f3c...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub identity: String,
    /// Number of recorded inputs
    pub call_count: usize,
    /// Inputs paired with outputs by index, truncated to the shorter list
    pub calls: Vec<CallRecord>,
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.identity, self.call_count)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.identity, call.input, call.output)?;
        }
        Ok(())
    }
}

/// Reads the full input and output history recorded for `identity`.
pub async fn replay(store: &dyn KeyValueStore, identity: &str) -> Result<Replay> {
    let inputs = store.read_list_range(&inputs_key(identity), 0, -1).await?;
    let outputs = store.read_list_range(&outputs_key(identity), 0, -1).await?;

    let call_count = inputs.len();
    let calls = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| CallRecord {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        identity: identity.to_string(),
        call_count,
        calls,
    })
}
