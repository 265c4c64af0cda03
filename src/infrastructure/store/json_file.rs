use std::path::PathBuf;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::ports::user_repository::{UserQuery, UserRepository};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::users::user::{User, UserPatch};

/// Flat-file adapter for the user repository. The whole collection lives in
/// memory as an id-keyed map (insertion order preserved) and is rewritten to
/// disk, pretty-printed, after every mutation. Mutations hold the write
/// guard across the in-memory change and the awaited file write, so there is
/// exactly one logical writer at a time and no mutation returns before its
/// state is durable.
#[derive(Debug)]
pub struct JsonFileUserRepository {
    path: PathBuf,
    users: RwLock<IndexMap<String, User>>,
}

impl JsonFileUserRepository {
    /// Load the collection from `path`, or start empty when the file does
    /// not exist yet. A file that exists but does not parse as an id→user
    /// object is a storage error; callers treat that as fatal at startup.
    pub async fn load(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<IndexMap<String, User>>(&bytes).map_err(|e| {
                ApiError::Storage(
                    anyhow::Error::new(e).context(format!("parsing {}", path.display())),
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "user store file absent, starting empty");
                IndexMap::new()
            }
            Err(e) => {
                return Err(ApiError::Storage(
                    anyhow::Error::new(e).context(format!("reading {}", path.display())),
                ));
            }
        };
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn persist(&self, users: &IndexMap<String, User>) -> ApiResult<()> {
        let body = serde_json::to_vec_pretty(users).map_err(|e| ApiError::Storage(e.into()))?;
        tokio::fs::write(&self.path, body).await.map_err(|e| {
            ApiError::Storage(anyhow::Error::new(e).context(format!("writing {}", self.path.display())))
        })
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn all(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn filter(&self, query: &UserQuery) -> ApiResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect())
    }

    async fn find(&self, query: &UserQuery) -> ApiResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| query.matches(u))
            .cloned())
    }

    async fn save(&self, user: User) -> ApiResult<User> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        self.persist(&users).await?;
        Ok(user)
    }

    async fn update(&self, id: &str, patch: UserPatch) -> ApiResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or(ApiError::NotFound)?;
        user.apply(patch);
        let updated = user.clone();
        self.persist(&users).await?;
        Ok(updated)
    }

    async fn del(&self, id: &str) -> ApiResult<Option<User>> {
        let mut users = self.users.write().await;
        // shift_remove keeps the remaining entries in insertion order.
        let removed = users.shift_remove(id);
        self.persist(&users).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    async fn empty_repo() -> (JsonFileUserRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileUserRepository::load(dir.path().join("users.json"))
            .await
            .unwrap();
        (repo, dir)
    }

    fn alice() -> User {
        User::new("alice", "alice@example.com", "salt digest", false)
    }

    #[tokio::test]
    async fn save_then_find_by_id_roundtrips() {
        let (repo, _dir) = empty_repo().await;
        let user = repo.save(alice()).await.unwrap();
        let found = repo.find(&UserQuery::by_id(&user.id)).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn empty_store_full_lifecycle() {
        let (repo, _dir) = empty_repo().await;
        assert!(repo.is_empty().await);

        let saved = repo.save(alice()).await.unwrap();
        let found = repo
            .find(&UserQuery::by_username("alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, saved);

        let deleted = repo.del(&saved.id).await.unwrap();
        assert_eq!(deleted, Some(saved));
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_user_is_gone_from_disk_too() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let id = {
            let repo = JsonFileUserRepository::load(&path).await.unwrap();
            let user = repo.save(alice()).await.unwrap();
            repo.del(&user.id).await.unwrap();
            user.id
        };
        let reloaded = JsonFileUserRepository::load(&path).await.unwrap();
        assert_eq!(reloaded.find(&UserQuery::by_id(id)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn mutations_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let user = {
            let repo = JsonFileUserRepository::load(&path).await.unwrap();
            repo.save(alice()).await.unwrap()
        };
        let reloaded = JsonFileUserRepository::load(&path).await.unwrap();
        let found = reloaded.find(&UserQuery::by_id(&user.id)).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn filter_requires_every_supplied_field_to_match() {
        let (repo, _dir) = empty_repo().await;
        repo.save(User::new("alice", "alice@example.com", "h", true))
            .await
            .unwrap();
        repo.save(User::new("bob", "bob@example.com", "h", true))
            .await
            .unwrap();

        let admins = repo
            .filter(&UserQuery {
                is_admin: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 2);

        let query = UserQuery {
            username: Some("alice".into()),
            is_admin: Some(true),
            ..Default::default()
        };
        let matched = repo.filter(&query).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].username, "alice");
    }

    #[tokio::test]
    async fn update_merges_and_persists() {
        let (repo, _dir) = empty_repo().await;
        let user = repo.save(alice()).await.unwrap();
        let updated = repo
            .update(
                &user.id,
                UserPatch {
                    email: Some("new@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn update_of_unknown_id_fails_loudly() {
        let (repo, _dir) = empty_repo().await;
        let err = repo.update("missing", UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn del_of_unknown_id_is_none() {
        let (repo, _dir) = empty_repo().await;
        assert_eq!(repo.del("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_updates_both_land() {
        let (repo, _dir) = empty_repo().await;
        let repo = Arc::new(repo);
        let user = repo.save(alice()).await.unwrap();

        let a = {
            let repo = repo.clone();
            let id = user.id.clone();
            tokio::spawn(async move {
                repo.update(
                    &id,
                    UserPatch {
                        username: Some("alice2".into()),
                        ..Default::default()
                    },
                )
                .await
            })
        };
        let b = {
            let repo = repo.clone();
            let id = user.id.clone();
            tokio::spawn(async move {
                repo.update(
                    &id,
                    UserPatch {
                        email: Some("alice2@example.com".into()),
                        ..Default::default()
                    },
                )
                .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let merged = repo
            .find(&UserQuery::by_id(&user.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged.username, "alice2");
        assert_eq!(merged.email, "alice2@example.com");
    }

    #[tokio::test]
    async fn unparseable_store_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        tokio::fs::write(&path, b"not json at all").await.unwrap();
        let err = JsonFileUserRepository::load(&path).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let (repo, _dir) = empty_repo().await;
        for name in ["a", "b", "c"] {
            repo.save(User::new(name, format!("{name}@example.com"), "h", false))
                .await
                .unwrap();
        }
        let names: Vec<String> = repo
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn on_disk_form_is_an_object_keyed_by_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let repo = JsonFileUserRepository::load(&path).await.unwrap();
        let user = repo.save(alice()).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value[&user.id]["username"],
            serde_json::Value::String("alice".into())
        );
        assert!(value[&user.id].get("passwordHash").is_some());
    }
}
