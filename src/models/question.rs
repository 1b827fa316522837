// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_QUESTION_POINTS;

/// A coding question as served by `GET /moderator/topics/{id}/questions`,
/// including the full public and private test case payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Owning topic.
    #[serde(default)]
    pub topic_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub example: Option<Example>,

    #[serde(default)]
    pub explanation: String,

    #[serde(default)]
    pub test_cases: TestCaseSet,

    #[serde(default)]
    pub difficulty: String,

    /// Coins awarded the first time the question is accepted.
    #[serde(default = "default_points")]
    pub points: u32,

    /// Position within the owning topic.
    #[serde(default)]
    pub order: i64,
}

fn default_points() -> u32 {
    DEFAULT_QUESTION_POINTS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

/// Public cases are shown with explanations; private cases only gate acceptance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseSet {
    #[serde(default)]
    pub public: Vec<PublicTestCase>,
    #[serde(default)]
    pub private: Vec<PrivateTestCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicTestCase {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateTestCase {
    pub input: String,
    pub output: String,
}

/// One (stdin, expected stdout) pair fed to the evaluator.
///
/// `input` is stored as authored; literal `\n` sequences are decoded by the
/// execution adapter right before transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl Question {
    /// Public cases in authored order.
    pub fn public_cases(&self) -> Vec<TestCase> {
        self.test_cases
            .public
            .iter()
            .map(|tc| TestCase {
                input: tc.input.clone(),
                expected_output: tc.output.clone(),
            })
            .collect()
    }

    /// Public cases followed by private cases, in order.
    pub fn all_cases(&self) -> Vec<TestCase> {
        let mut cases = self.public_cases();
        cases.extend(self.test_cases.private.iter().map(|tc| TestCase {
            input: tc.input.clone(),
            expected_output: tc.output.clone(),
        }));
        cases
    }
}
