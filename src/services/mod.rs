// src/services/mod.rs

//! Outbound collaborators: the Execution Service, the Backend API and the
//! self-contained local store.

pub mod backend;
pub mod catalog;
pub mod local_store;
pub mod piston;
