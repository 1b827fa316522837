// src/judge/mod.rs

//! Submission judging pipeline.
//!
//! Leaf first: `executor` talks to the Execution Service, `evaluator` walks a
//! list of test cases through it, `drafts` keeps the editor contents,
//! `orchestrator` drives the Run and Submit flows, and `progression` decides
//! what a learner may open next.

pub mod cancel;
pub mod drafts;
pub mod evaluator;
pub mod executor;
pub mod language;
pub mod limiter;
pub mod orchestrator;
pub mod ports;
pub mod progression;
pub mod sessions;

#[cfg(test)]
pub(crate) mod testing;
