//! Types shared by the SeisCat error and logging facilities
//!
//! - [`correlation`]: request and trace ids
//! - [`schema`]: canonical log field and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
