// src/judge/sessions.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::{error::JudgeError, judge::cancel::CancelFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Run,
    Submit,
}

type SessionKey = (String, String);

struct ActiveSession {
    kind: SessionKind,
    cancel: CancelFlag,
}

/// Tracks in-flight Run/Submit actions per (user, question).
///
/// At most one action per pair is in flight; the slot is released when the
/// returned guard is dropped.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashMap<SessionKey, ActiveSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionKey, ActiveSession>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin(
        &self,
        user_id: &str,
        question_id: &str,
        kind: SessionKind,
    ) -> Result<SessionGuard, JudgeError> {
        let key = (user_id.to_string(), question_id.to_string());
        let mut active = self.lock();
        if active.contains_key(&key) {
            return Err(JudgeError::Busy(question_id.to_string()));
        }

        let cancel = CancelFlag::new();
        active.insert(
            key.clone(),
            ActiveSession {
                kind,
                cancel: cancel.clone(),
            },
        );

        Ok(SessionGuard {
            registry: self.clone(),
            key,
            cancel,
        })
    }

    /// Trips the cancellation flag of the in-flight action, if any.
    pub fn cancel(&self, user_id: &str, question_id: &str) -> Option<SessionKind> {
        let key = (user_id.to_string(), question_id.to_string());
        self.lock().get(&key).map(|session| {
            session.cancel.cancel();
            session.kind
        })
    }

    pub fn is_active(&self, user_id: &str, question_id: &str) -> bool {
        self.lock()
            .contains_key(&(user_id.to_string(), question_id.to_string()))
    }
}

/// Holds a registry slot for the lifetime of one action.
pub struct SessionGuard {
    registry: SessionRegistry,
    key: SessionKey,
    cancel: CancelFlag,
}

impl SessionGuard {
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}
