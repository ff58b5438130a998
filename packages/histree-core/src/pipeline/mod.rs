//! Project history coordination
//!
//! Drives the full per-revision pipeline: parallel file extraction, per-file
//! diffing against the previous revision's trees and sequential history
//! aggregation in deterministic file order.

pub mod coordinator;

pub use coordinator::{process_project, ProjectHistory, Revision};
