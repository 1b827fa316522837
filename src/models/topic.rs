// src/models/topic.rs

use serde::{Deserialize, Serialize};

/// A practice topic as served by `GET /moderator/topics`.
/// Topics are unlocked one after another following `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Free-form label such as "Easy", "Medium" or "Hard".
    #[serde(default)]
    pub difficulty: String,

    /// Position in the learning path. Lower comes first.
    #[serde(default)]
    pub order: i64,
}
