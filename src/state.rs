// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    judge::{
        drafts::DraftService,
        evaluator::TestEvaluator,
        executor::CodeExecutor,
        limiter::FixedDelay,
        orchestrator::Judge,
        ports::{Catalog, DraftStore, ProgressSource, SubmissionLog},
        sessions::SessionRegistry,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub judge: Arc<Judge>,
    pub catalog: Arc<dyn Catalog>,
    pub submissions: Arc<dyn SubmissionLog>,
    pub progress: Arc<dyn ProgressSource>,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Wires the judge from its collaborators. Public cases are paced by
    /// `config.run_case_delay()`.
    pub fn new(
        config: Config,
        executor: Arc<dyn CodeExecutor>,
        catalog: Arc<dyn Catalog>,
        drafts: Arc<dyn DraftStore>,
        submissions: Arc<dyn SubmissionLog>,
        progress: Arc<dyn ProgressSource>,
    ) -> Self {
        let limiter = Arc::new(FixedDelay::new(config.run_case_delay()));
        let judge = Judge::new(
            TestEvaluator::new(executor, limiter),
            DraftService::new(drafts),
            submissions.clone(),
            progress.clone(),
        )
        .with_write_attempts(config.submission_write_attempts);

        Self {
            config,
            judge: Arc::new(judge),
            catalog,
            submissions,
            progress,
            sessions: SessionRegistry::new(),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
