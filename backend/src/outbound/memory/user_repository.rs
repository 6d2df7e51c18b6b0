//! Mutex-guarded `UserRepository` adapter.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, User, UserId};

#[derive(Debug, Default)]
struct UserStore {
    by_id: HashMap<UserId, User>,
    id_by_email: HashMap<Email, UserId>,
}

/// In-memory user store with insert-only `save`.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<UserStore>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, UserStore>, UserRepositoryError> {
        self.store
            .lock()
            .map_err(|_| UserRepositoryError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut store = self.lock()?;
        if store.id_by_email.contains_key(user.email()) {
            return Err(UserRepositoryError::duplicate());
        }
        match store.by_id.entry(user.id().clone()) {
            Entry::Occupied(_) => return Err(UserRepositoryError::duplicate()),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
            }
        }
        store
            .id_by_email
            .insert(user.email().clone(), user.id().clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError> {
        self.lock()?
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(UserRepositoryError::not_found)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserRepositoryError> {
        let store = self.lock()?;
        store
            .id_by_email
            .get(email)
            .and_then(|id| store.by_id.get(id))
            .cloned()
            .ok_or_else(UserRepositoryError::not_found)
    }
}
