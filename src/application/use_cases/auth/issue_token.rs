use crate::application::ports::user_repository::{UserQuery, UserRepository};
use crate::domain::error::{ApiError, ApiResult};
use crate::infrastructure::crypto::Hasher;

pub struct IssueToken<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub hasher: Hasher,
}

impl<'a, R: UserRepository + ?Sized> IssueToken<'a, R> {
    /// Verify credentials and return the account's constant bearer token.
    pub async fn execute(&self, username: &str, password: &str) -> ApiResult<String> {
        let user = self
            .repo
            .find(&UserQuery::by_username(username))
            .await?
            .ok_or(ApiError::NotFound)?;
        if !self.hasher.check(password, &user.password_hash)? {
            return Err(ApiError::Auth("Incorrect password.".into()));
        }
        Ok(user.token)
    }
}
