//! Correlation ids
//!
//! A request id ties together the log lines and errors produced by one
//! analyst action (record, merge, execute) as it crosses the engine and
//! store layers. A trace id can span several actions, e.g. a merge and the
//! execution of the merged batch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh time-ordered id (UUIDv7)
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id! {
    /// Id of a single analyst action
    RequestId
}

correlation_id! {
    /// Id shared by related actions
    TraceId
}

/// Correlation carried into an engine operation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Untraced context with a fresh request id
    pub fn new() -> Self {
        Self {
            request_id: RequestId::generate(),
            trace_id: None,
        }
    }

    /// Context for a new action belonging to `trace_id`
    pub fn in_trace(trace_id: TraceId) -> Self {
        Self {
            request_id: RequestId::generate(),
            trace_id: Some(trace_id),
        }
    }

    /// Follow-up action in the same trace; starts a trace if there is none
    pub fn follow_up(&self) -> Self {
        Self::in_trace(self.trace_id.clone().unwrap_or_else(TraceId::generate))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
