//! Token merge engine: decides, each time a flow node of a running process
//! instance finishes, whether a token is forked, joined, passed through or
//! dropped, and which identifiers the outgoing token carries.

pub mod error;
pub mod model;
pub mod merge;
pub mod runtime;

pub use error::{FlowMergeError, Result};
