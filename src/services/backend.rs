// src/services/backend.rs

//! Client for the practice Backend API.
//!
//! Every call carries the caller's bearer token. Implements all collaborator
//! ports so the judge can run entirely against the remote backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::{
    error::JudgeError,
    judge::{
        language::Language,
        ports::{Catalog, DraftStore, ProgressSource, SubmissionLog},
    },
    models::{
        draft::{Draft, SaveCodeBody},
        progress::UserProgress,
        question::Question,
        submission::{NewSubmission, Submission},
        topic::Topic,
        user::UserContext,
    },
};

pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, JudgeError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| JudgeError::Backend(format!("invalid base URL '{}': {}", base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("judge-gateway/0.1")
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, JudgeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| JudgeError::Backend(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        user: &UserContext,
        segments: &[&str],
    ) -> Result<T, JudgeError> {
        let url = self.endpoint(segments)?;
        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(&user.token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(JudgeError::NotFound(url.path().to_string())),
            status => Err(JudgeError::Backend(format!("HTTP {} from {}", status, url.path()))),
        }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        user: &UserContext,
        segments: &[&str],
        body: &B,
    ) -> Result<(), JudgeError> {
        let url = self.endpoint(segments)?;
        let response = self
            .http_client
            .post(url.clone())
            .bearer_auth(&user.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(JudgeError::Backend(format!("HTTP {} from {}", status, url.path())))
        }
    }
}

#[async_trait]
impl Catalog for BackendClient {
    async fn list_topics(&self, user: &UserContext) -> Result<Vec<Topic>, JudgeError> {
        self.get_json(user, &["moderator", "topics"]).await
    }

    async fn list_questions(
        &self,
        user: &UserContext,
        topic_id: &str,
    ) -> Result<Vec<Question>, JudgeError> {
        self.get_json(user, &["moderator", "topics", topic_id, "questions"])
            .await
    }
}

#[async_trait]
impl DraftStore for BackendClient {
    async fn load(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
    ) -> Result<Option<String>, JudgeError> {
        match self
            .get_json::<Draft>(user, &["user", "code", question_id, language.id()])
            .await
        {
            Ok(draft) => Ok(Some(draft.code).filter(|code| !code.is_empty())),
            Err(JudgeError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
        code: &str,
    ) -> Result<(), JudgeError> {
        let body = SaveCodeBody {
            question_id,
            code,
            language: language.id(),
        };
        self.post_json(user, &["user", "save-code"], &body).await
    }
}

#[async_trait]
impl SubmissionLog for BackendClient {
    async fn record(
        &self,
        user: &UserContext,
        submission: &NewSubmission,
    ) -> Result<(), JudgeError> {
        self.post_json(user, &["user", "submit"], submission).await
    }

    async fn history(
        &self,
        user: &UserContext,
        question_id: &str,
    ) -> Result<Vec<Submission>, JudgeError> {
        let mut history: Vec<Submission> = self
            .get_json(user, &["user", "submissions", question_id])
            .await?;
        // Newest first; entries without a timestamp go last.
        history.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(history)
    }
}

#[async_trait]
impl ProgressSource for BackendClient {
    async fn progress(&self, user: &UserContext) -> Result<UserProgress, JudgeError> {
        self.get_json(user, &["user", "progress"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submission::SubmissionStatus;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeBackend {
        auth_headers: Arc<Mutex<Vec<String>>>,
        posted: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl FakeBackend {
        fn remember_auth(&self, headers: &HeaderMap) {
            let value = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            self.auth_headers.lock().unwrap().push(value);
        }
    }

    async fn topics(State(fake): State<FakeBackend>, headers: HeaderMap) -> Json<Value> {
        fake.remember_auth(&headers);
        Json(json!([{ "_id": "t1", "title": "Basics", "difficulty": "Easy", "order": 1 }]))
    }

    async fn questions(Path(topic_id): Path<String>) -> Json<Value> {
        Json(json!([{
            "_id": "q1",
            "topicId": topic_id,
            "title": "Square",
            "points": 15,
            "testCases": { "public": [{ "input": "3", "output": "9" }], "private": [] }
        }]))
    }

    async fn progress() -> Json<Value> {
        Json(json!({ "totalCoins": 15, "completedQuestions": [{ "_id": "q1" }] }))
    }

    async fn code(Path((question_id, language)): Path<(String, String)>) -> Result<Json<Value>, AxumStatus> {
        if question_id == "q1" && language == "python" {
            Ok(Json(json!({ "code": "print(9)" })))
        } else {
            Err(AxumStatus::NOT_FOUND)
        }
    }

    async fn save_code(State(fake): State<FakeBackend>, Json(body): Json<Value>) -> AxumStatus {
        fake.posted.lock().unwrap().push(("save-code".into(), body));
        AxumStatus::OK
    }

    async fn submit(State(fake): State<FakeBackend>, Json(body): Json<Value>) -> AxumStatus {
        fake.posted.lock().unwrap().push(("submit".into(), body));
        AxumStatus::CREATED
    }

    async fn history(Path(question_id): Path<String>) -> Result<Json<Value>, AxumStatus> {
        if question_id == "broken" {
            return Err(AxumStatus::BAD_GATEWAY);
        }
        Ok(Json(json!([
            { "_id": "s1", "questionId": question_id, "language": "python", "status": "failed",
              "submittedAt": "2026-01-01T10:00:00Z" },
            { "_id": "s3", "questionId": question_id, "language": "python", "status": "failed" },
            { "_id": "s2", "questionId": question_id, "language": "python", "status": "accepted",
              "submittedAt": "2026-01-02T10:00:00Z" }
        ])))
    }

    async fn spawn_backend() -> (String, FakeBackend) {
        let fake = FakeBackend::default();
        let app = Router::new()
            .route("/api/moderator/topics", get(topics))
            .route("/api/moderator/topics/{id}/questions", get(questions))
            .route("/api/user/progress", get(progress))
            .route("/api/user/code/{question_id}/{language}", get(code))
            .route("/api/user/save-code", post(save_code))
            .route("/api/user/submit", post(submit))
            .route("/api/user/submissions/{question_id}", get(history))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://127.0.0.1:{}/api/", port), fake)
    }

    fn user() -> UserContext {
        UserContext::new("u1", "secret-token")
    }

    #[tokio::test]
    async fn test_outline_forwards_bearer_token() {
        let (base, fake) = spawn_backend().await;
        let client = BackendClient::new(&base, Duration::from_secs(5)).unwrap();

        let outline = client.outline(&user()).await.unwrap();

        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].topic.id, "t1");
        assert_eq!(outline[0].questions[0].points, 15);
        assert_eq!(outline[0].questions[0].topic_id, "t1");
        assert_eq!(
            fake.auth_headers.lock().unwrap().as_slice(),
            ["Bearer secret-token"]
        );
    }

    #[tokio::test]
    async fn test_progress_and_drafts() {
        let (base, fake) = spawn_backend().await;
        let client = BackendClient::new(&base, Duration::from_secs(5)).unwrap();

        let progress = client.progress(&user()).await.unwrap();
        assert_eq!(progress.total_coins, 15);
        assert_eq!(progress.completed_question_ids, vec!["q1"]);

        let saved = client.load(&user(), "q1", Language::Python).await.unwrap();
        assert_eq!(saved.as_deref(), Some("print(9)"));
        let missing = client.load(&user(), "q1", Language::Java).await.unwrap();
        assert_eq!(missing, None);

        client
            .save(&user(), "q1", Language::Cpp, "int main() {}")
            .await
            .unwrap();
        let posted = fake.posted.lock().unwrap();
        assert_eq!(posted[0].0, "save-code");
        assert_eq!(posted[0].1["questionId"], "q1");
        assert_eq!(posted[0].1["language"], "cpp");
    }

    #[tokio::test]
    async fn test_submit_and_failures() {
        let (base, fake) = spawn_backend().await;
        let client = BackendClient::new(&base, Duration::from_secs(5)).unwrap();

        let submission = NewSubmission {
            question_id: "q1".into(),
            code: "print(9)".into(),
            language: "python".into(),
            status: SubmissionStatus::Accepted,
            runtime_ms: 400,
            memory_estimate_mb: 2,
            test_cases_passed: 1,
            total_test_cases: 1,
            points: 15,
        };
        client.record(&user(), &submission).await.unwrap();
        {
            let posted = fake.posted.lock().unwrap();
            assert_eq!(posted[0].0, "submit");
            assert_eq!(posted[0].1["status"], "accepted");
            assert_eq!(posted[0].1["totalTestCases"], 1);
        }

        let err = client.history(&user(), "broken").await.unwrap_err();
        assert!(matches!(err, JudgeError::Backend(ref msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_history_is_sorted_newest_first() {
        let (base, _) = spawn_backend().await;
        let client = BackendClient::new(&base, Duration::from_secs(5)).unwrap();

        let history = client.history(&user(), "q1").await.unwrap();
        let ids: Vec<&str> = history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s2", "s1", "s3"]);
        assert_eq!(history[0].status, SubmissionStatus::Accepted);
    }
}
