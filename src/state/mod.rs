//! State definitions for one batch run
//!
//! This module contains the values that flow through the pipeline: per-attempt
//! requests and outcomes, the deduplicated link set a chain produces, and the
//! aggregated batch result.

mod batch;
mod link_set;
mod outcome;

pub use batch::{BatchEntry, BatchResult, ChainResult};
pub(crate) use batch::BatchBuilder;
pub use link_set::LinkSet;
pub use outcome::{FailureKind, FetchFailure, FetchOutcome, FetchRequest};
