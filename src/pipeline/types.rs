//! Pipeline types
//!
//! Per-source outcomes and the invocation summary returned to the runtime.

use crate::http::FetchResult;
use crate::output::WriteResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// What happened to one source during an invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    /// Source name
    pub name: String,
    /// Fetch step result
    pub fetch: FetchResult,
    /// Write step result
    pub put: WriteResult,
}

/// Summary returned from one invocation
///
/// Serializes as `{fetch, put}`. The multi variant keys both maps by
/// source name.
///
/// An empty response body is reported as `"body": null` in both variants,
/// including the single variant, and the source gets the `empty` write
/// marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvocationSummary {
    /// One raw source
    Single { fetch: FetchResult, put: WriteResult },
    /// Several normalized sources
    Multi {
        fetch: BTreeMap<String, FetchResult>,
        put: BTreeMap<String, WriteResult>,
    },
}

impl InvocationSummary {
    /// Build the multi-source summary from ordered outcomes
    pub fn multi(outcomes: Vec<SourceOutcome>) -> Self {
        let mut fetch = BTreeMap::new();
        let mut put = BTreeMap::new();
        for outcome in outcomes {
            fetch.insert(outcome.name.clone(), outcome.fetch);
            put.insert(outcome.name, outcome.put);
        }
        InvocationSummary::Multi { fetch, put }
    }

    /// Write results in source-name order
    pub fn puts(&self) -> Vec<&WriteResult> {
        match self {
            InvocationSummary::Single { put, .. } => vec![put],
            InvocationSummary::Multi { put, .. } => put.values().collect(),
        }
    }

    /// Number of batches actually written
    pub fn written_batches(&self) -> usize {
        self.puts().into_iter().filter(|p| p.is_ok()).count()
    }
}
