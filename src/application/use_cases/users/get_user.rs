use crate::application::ports::user_repository::{UserQuery, UserRepository};
use crate::domain::error::ApiResult;
use crate::domain::users::user::User;

pub struct GetUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetUser<'a, R> {
    pub async fn execute(&self, id: &str) -> ApiResult<Option<User>> {
        self.repo.find(&UserQuery::by_id(id)).await
    }
}
