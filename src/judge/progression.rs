// src/judge/progression.rs

//! Progression Gate.
//!
//! Pure functions over (ordered topics, completed question ids). The gate is
//! recomputed from scratch whenever progress changes; nothing here is cached.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{question::Question, topic::Topic};

/// A topic together with its full question set.
#[derive(Debug, Clone)]
pub struct TopicOutline {
    pub topic: Topic,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionGate {
    pub question_id: String,
    pub title: String,
    pub points: u32,
    pub completed: bool,
    pub accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGate {
    pub topic_id: String,
    pub title: String,
    pub difficulty: String,
    pub unlocked: bool,
    pub completed: bool,
    pub completed_count: usize,
    pub total_count: usize,
    /// First uncompleted question of an unlocked topic; the one to open next.
    pub next_question_id: Option<String>,
    pub questions: Vec<QuestionGate>,
}

/// A topic counts as completed only when it has questions and all of them are.
pub fn is_topic_completed(questions: &[Question], completed: &HashSet<String>) -> bool {
    !questions.is_empty() && questions.iter().all(|q| completed.contains(&q.id))
}

/// Computes unlock state for every topic and question.
///
/// * Topics are ordered by `order`, questions by their `order` within a topic
///   (ties keep the supplied order).
/// * The first topic is always unlocked; topic `k+1` unlocks once topic `k`
///   is completed.
/// * In an unlocked topic the first question is accessible and question
///   `i+1` becomes accessible once question `i` is completed. Questions of a
///   locked topic are never accessible.
pub fn compute_gate(outlines: &[TopicOutline], completed: &HashSet<String>) -> Vec<TopicGate> {
    let mut topics: Vec<&TopicOutline> = outlines.iter().collect();
    topics.sort_by_key(|o| o.topic.order);

    let mut gates = Vec::with_capacity(topics.len());
    let mut previous_completed = true;

    for outline in topics {
        let mut questions: Vec<&Question> = outline.questions.iter().collect();
        questions.sort_by_key(|q| q.order);

        let unlocked = previous_completed;
        let topic_completed = is_topic_completed(&outline.questions, completed);

        let mut question_gates = Vec::with_capacity(questions.len());
        let mut previous_question_completed = true;
        for question in &questions {
            let is_completed = completed.contains(&question.id);
            question_gates.push(QuestionGate {
                question_id: question.id.clone(),
                title: question.title.clone(),
                points: question.points,
                completed: is_completed,
                accessible: unlocked && previous_question_completed,
            });
            previous_question_completed = is_completed;
        }

        let completed_count = question_gates.iter().filter(|q| q.completed).count();
        let next_question_id = if unlocked {
            question_gates
                .iter()
                .find(|q| !q.completed)
                .map(|q| q.question_id.clone())
        } else {
            None
        };

        gates.push(TopicGate {
            topic_id: outline.topic.id.clone(),
            title: outline.topic.title.clone(),
            difficulty: outline.topic.difficulty.clone(),
            unlocked,
            completed: topic_completed,
            completed_count,
            total_count: question_gates.len(),
            next_question_id,
            questions: question_gates,
        });

        previous_completed = topic_completed;
    }

    gates
}

/// Looks a question up in a computed gate. `None` if it is not in the catalog.
pub fn find_question<'a>(gates: &'a [TopicGate], question_id: &str) -> Option<&'a QuestionGate> {
    gates
        .iter()
        .flat_map(|t| t.questions.iter())
        .find(|q| q.question_id == question_id)
}
