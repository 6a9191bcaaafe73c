/// In-process user store for tests and local runs without Postgres
use async_trait::async_trait;
use chrono::Utc;
use error_types::{ServiceError, ServiceResult};
use tokio::sync::RwLock;

use crate::db::UserRepository;
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    last_id: i64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a user, as if deleted by another service.
    pub async fn remove(&self, id: i64) -> bool {
        let mut store = self.store.write().await;
        let before = store.users.len();
        store.users.retain(|user| user.id != id);
        store.users.len() != before
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|user| user.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|user| user.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> ServiceResult<User> {
        let mut store = self.store.write().await;

        if store
            .users
            .iter()
            .any(|user| user.username == new_user.username || user.email == new_user.email)
        {
            return Err(ServiceError::conflict("Resource already exists"));
        }

        // Same as BIGSERIAL: ids start at 1 and are never reused.
        store.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.last_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            created_at: now,
            updated_at: now,
        };

        store.users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> ServiceResult<bool> {
        let mut store = self.store.write().await;

        match store.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
