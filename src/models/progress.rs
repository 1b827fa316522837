// src/models/progress.rs

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Learner progress as reported by `GET /user/progress`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub user_id: String,

    /// Sum of points of questions accepted at least once.
    #[serde(default)]
    pub total_coins: i64,

    /// Accepts either a list of ids or a list of populated question documents.
    #[serde(
        rename = "completedQuestions",
        default,
        deserialize_with = "deserialize_completed"
    )]
    pub completed_question_ids: Vec<String>,

    #[serde(default)]
    pub total_submissions: i64,

    #[serde(default)]
    pub successful_submissions: i64,
}

impl UserProgress {
    pub fn completed_set(&self) -> HashSet<String> {
        self.completed_question_ids.iter().cloned().collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompletedRef {
    Id(String),
    Doc {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

fn deserialize_completed<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<CompletedRef>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(refs.len());
    for r in refs {
        let id = match r {
            CompletedRef::Id(id) => id,
            CompletedRef::Doc { id } => id,
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    Ok(ids)
}
