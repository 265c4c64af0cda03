use crate::application::ports::user_repository::UserRepository;
use crate::domain::error::ApiResult;
use crate::domain::users::user::{User, UserPatch};
use crate::infrastructure::crypto::Hasher;

/// Fields a caller may change. A plaintext `password` is hashed here, so the
/// repository only ever sees the encoded form.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub valid: Option<bool>,
}

pub struct UpdateUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub hasher: Hasher,
}

impl<'a, R: UserRepository + ?Sized> UpdateUser<'a, R> {
    pub async fn execute(&self, id: &str, req: UpdateUserRequest) -> ApiResult<User> {
        let password_hash = match req.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let patch = UserPatch {
            username: req.username,
            email: req.email,
            password_hash,
            is_admin: req.is_admin,
            valid: req.valid,
        };
        self.repo.update(id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::error::ApiError;
    use crate::infrastructure::store::json_file::JsonFileUserRepository;

    async fn repo_with_alice() -> (JsonFileUserRepository, User, TempDir) {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileUserRepository::load(dir.path().join("users.json"))
            .await
            .unwrap();
        let hash = Hasher::default().hash("hunter2").unwrap();
        let user = repo
            .save(User::new("alice", "alice@example.com", hash, false))
            .await
            .unwrap();
        (repo, user, dir)
    }

    #[tokio::test]
    async fn password_updates_are_rehashed() {
        let (repo, user, _dir) = repo_with_alice().await;
        let uc = UpdateUser {
            repo: &repo,
            hasher: Hasher::default(),
        };
        let updated = uc
            .execute(
                &user.id,
                UpdateUserRequest {
                    password: Some("correct horse".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_ne!(updated.password_hash, "correct horse");
        assert!(
            Hasher::default()
                .check("correct horse", &updated.password_hash)
                .unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_id_fails_loudly() {
        let (repo, _user, _dir) = repo_with_alice().await;
        let uc = UpdateUser {
            repo: &repo,
            hasher: Hasher::default(),
        };
        let err = uc
            .execute("missing", UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
