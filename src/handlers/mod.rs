// src/handlers/mod.rs

pub mod drafts;
pub mod languages;
pub mod practice;
pub mod progress;
pub mod submissions;
