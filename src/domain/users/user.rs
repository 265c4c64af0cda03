use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored account. `token` equals `id` and never rotates, so resolving a
/// bearer token is a plain lookup against this field. Field names are
/// camelCase on disk and on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub token: String,
    pub is_admin: bool,
    /// Reserved for a future activation workflow; persisted but not
    /// consulted by any operation.
    pub valid: bool,
}

impl User {
    /// Construct a fresh account. The id is assigned here, exactly once, and
    /// doubles as the bearer token. `password_hash` must already be encoded;
    /// this type never sees a plaintext password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            token: id.clone(),
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin,
            valid: false,
        }
    }

    /// Shallow-merge a patch into this user. `id` and `token` are immutable
    /// and not representable in the patch.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(is_admin) = patch.is_admin {
            self.is_admin = is_admin;
        }
        if let Some(valid) = patch.valid {
            self.valid = valid;
        }
    }
}

/// The mutable subset of [`User`], for merge updates.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
    pub valid: Option<bool>,
}
