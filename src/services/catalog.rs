// src/services/catalog.rs

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::JudgeError,
    judge::{ports::Catalog, progression::TopicOutline},
    models::{question::Question, topic::Topic, user::UserContext},
};

/// Topic document in a catalog file: the topic fields plus its questions.
#[derive(Debug, Deserialize)]
struct CatalogTopic {
    #[serde(flatten)]
    topic: Topic,
    #[serde(default)]
    questions: Vec<Question>,
}

/// Fixed, in-memory catalog. Used in local mode and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    outlines: Vec<TopicOutline>,
}

impl StaticCatalog {
    pub fn new(outlines: Vec<TopicOutline>) -> Self {
        Self { outlines }
    }

    /// Parses a JSON array of topics, each carrying a `questions` array.
    /// Questions without a `topicId` inherit the id of their topic.
    pub fn from_json(raw: &str) -> Result<Self, JudgeError> {
        let topics: Vec<CatalogTopic> = serde_json::from_str(raw)
            .map_err(|e| JudgeError::Storage(format!("invalid catalog: {}", e)))?;

        let outlines = topics
            .into_iter()
            .map(|entry| {
                let topic_id = entry.topic.id.clone();
                let questions = entry
                    .questions
                    .into_iter()
                    .map(|mut q| {
                        if q.topic_id.is_empty() {
                            q.topic_id = topic_id.clone();
                        }
                        q
                    })
                    .collect();
                TopicOutline {
                    topic: entry.topic,
                    questions,
                }
            })
            .collect();

        Ok(Self { outlines })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JudgeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JudgeError::Storage(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_topics(&self, _user: &UserContext) -> Result<Vec<Topic>, JudgeError> {
        Ok(self.outlines.iter().map(|o| o.topic.clone()).collect())
    }

    async fn list_questions(
        &self,
        _user: &UserContext,
        topic_id: &str,
    ) -> Result<Vec<Question>, JudgeError> {
        self.outlines
            .iter()
            .find(|o| o.topic.id == topic_id)
            .map(|o| o.questions.clone())
            .ok_or_else(|| JudgeError::NotFound(format!("Topic '{}'", topic_id)))
    }

    async fn outline(&self, _user: &UserContext) -> Result<Vec<TopicOutline>, JudgeError> {
        Ok(self.outlines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "_id": "arrays",
            "title": "Arrays",
            "difficulty": "Easy",
            "order": 1,
            "questions": [
                {
                    "_id": "sum",
                    "title": "Sum",
                    "points": 10,
                    "order": 1,
                    "testCases": {
                        "public": [{ "input": "1 2", "output": "3", "explanation": "1 + 2" }],
                        "private": [{ "input": "5 5", "output": "10" }]
                    }
                }
            ]
        },
        { "_id": "graphs", "title": "Graphs", "order": 2 }
    ]"#;

    #[tokio::test]
    async fn test_parse_catalog_file_format() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let user = UserContext::new("u1", "t");

        let topics = catalog.list_topics(&user).await.unwrap();
        assert_eq!(topics.len(), 2);

        let questions = catalog.list_questions(&user, "arrays").await.unwrap();
        assert_eq!(questions[0].topic_id, "arrays");
        assert_eq!(questions[0].all_cases().len(), 2);

        assert!(catalog.list_questions(&user, "graphs").await.unwrap().is_empty());
        assert!(matches!(
            catalog.list_questions(&user, "dp").await,
            Err(JudgeError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        assert!(StaticCatalog::from_json("{ not json").is_err());
    }
}
