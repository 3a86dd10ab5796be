//! # KARST Cluster
//!
//! Runs the cave generation algorithm under two scheduling models.
//!
//! ## Distributed (message passing)
//!
//! N workers, each owning one row band, no shared grid. Per smoothing
//! iteration every worker trades boundary rows with its neighbors over
//! channels, then waits at a barrier; no worker may compute iteration `k`
//! until every worker holds its iteration-`k` halos. After smoothing,
//! non-terminal bands borrow the next band's first row once, extract their
//! contours, and ship flat segment data to the collector through a counted
//! gather.
//!
//! ## Shared-memory (parallel loops)
//!
//! One grid, scoped threads over disjoint row ranges, one next-state buffer
//! swapped in only after every thread has joined. Same cellular-automaton
//! rule, same extractor; only the synchronization differs.
//!
//! Any protocol violation - wrong halo length, stale iteration tag, a
//! neighbor gone quiet, a gather count that does not match its payload -
//! aborts the whole run. A partially-smoothed cave is not a degraded
//! result, it is a wrong one.

pub mod distributed;
pub mod error;
pub mod gather;
pub mod parallel;

mod halo;
mod sync;
mod worker;

pub use distributed::run_distributed;
pub use error::{ClusterError, ClusterResult};
pub use gather::{GatheredSegments, WorkerReport};
pub use parallel::{run_parallel, ParallelOutput};
