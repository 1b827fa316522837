// src/models/user.rs

/// The authenticated caller on whose behalf the judge acts.
///
/// Built by the auth middleware from a verified bearer token. The raw token is
/// kept so calls to the Backend API carry the same credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// User ID from the token's `sub` claim.
    pub user_id: String,
    /// Raw bearer token, without the `Bearer ` prefix.
    pub token: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}
