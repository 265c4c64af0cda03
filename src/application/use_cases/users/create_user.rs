use crate::application::ports::user_repository::{UserQuery, UserRepository};
use crate::domain::error::{ApiError, ApiResult, FieldError};
use crate::domain::users::user::User;
use crate::infrastructure::crypto::Hasher;

pub struct CreateUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub hasher: Hasher,
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl<'a, R: UserRepository + ?Sized> CreateUser<'a, R> {
    /// Create an account after checking username/email uniqueness against
    /// the repository. On rejection every violated field is reported and the
    /// store is left untouched.
    pub async fn execute(&self, req: &CreateUserRequest) -> ApiResult<User> {
        let mut errors = Vec::new();
        if self
            .repo
            .find(&UserQuery::by_username(&req.username))
            .await?
            .is_some()
        {
            errors.push(FieldError::new("username", "Username already in use."));
        }
        if self
            .repo
            .find(&UserQuery::by_email(&req.email))
            .await?
            .is_some()
        {
            errors.push(FieldError::new("email", "Email already in use."));
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let hash = self.hasher.hash(&req.password)?;
        self.repo
            .save(User::new(
                req.username.clone(),
                req.email.clone(),
                hash,
                req.is_admin,
            ))
            .await
    }
}
