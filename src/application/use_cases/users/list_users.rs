use crate::application::ports::user_repository::UserRepository;
use crate::domain::error::ApiResult;
use crate::domain::users::user::User;

/// Optional API-layer filters on top of the repository's full listing.
/// `username` and `email` are substring matches; `admin` is exact.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub admin: Option<bool>,
}

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self, filter: &ListFilter) -> ApiResult<Vec<User>> {
        let mut users = self.repo.all().await?;
        if let Some(q) = filter.username.as_deref() {
            users.retain(|u| u.username.contains(q));
        }
        if let Some(q) = filter.email.as_deref() {
            users.retain(|u| u.email.contains(q));
        }
        if let Some(admin) = filter.admin {
            users.retain(|u| u.is_admin == admin);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::infrastructure::store::json_file::JsonFileUserRepository;

    async fn seeded_repo() -> (JsonFileUserRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileUserRepository::load(dir.path().join("users.json"))
            .await
            .unwrap();
        repo.save(User::new("alice", "alice@example.com", "h", false))
            .await
            .unwrap();
        repo.save(User::new("alicia", "alicia@other.org", "h", true))
            .await
            .unwrap();
        repo.save(User::new("bob", "bob@example.com", "h", false))
            .await
            .unwrap();
        (repo, dir)
    }

    #[tokio::test]
    async fn no_filter_lists_everyone() {
        let (repo, _dir) = seeded_repo().await;
        let uc = ListUsers { repo: &repo };
        assert_eq!(uc.execute(&ListFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn username_filter_is_a_substring_match() {
        let (repo, _dir) = seeded_repo().await;
        let uc = ListUsers { repo: &repo };
        let users = uc
            .execute(&ListFilter {
                username: Some("alic".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "alicia"]);
    }

    #[tokio::test]
    async fn filters_compose() {
        let (repo, _dir) = seeded_repo().await;
        let uc = ListUsers { repo: &repo };
        let users = uc
            .execute(&ListFilter {
                email: Some("example.com".into()),
                admin: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
    }
}
