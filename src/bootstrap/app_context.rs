use std::sync::Arc;

use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::crypto::Hasher;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    hasher: Hasher,
}

impl AppServices {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Hasher) -> Self {
        Self { user_repo, hasher }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn hasher(&self) -> Hasher {
        self.services.hasher
    }
}
