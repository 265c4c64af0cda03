use crate::application::ports::user_repository::UserRepository;
use crate::domain::error::ApiResult;
use crate::domain::users::user::User;

pub struct DeleteUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteUser<'a, R> {
    /// Remove an account by id; `None` when no such account exists. Whether
    /// an admin may delete themselves is the route's decision, not this
    /// operation's.
    pub async fn execute(&self, id: &str) -> ApiResult<Option<User>> {
        self.repo.del(id).await
    }
}
