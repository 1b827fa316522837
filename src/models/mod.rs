// src/models/mod.rs

pub mod draft;
pub mod execution;
pub mod progress;
pub mod question;
pub mod submission;
pub mod topic;
pub mod user;
