// database/store/memory.rs - in-process store backing the query tests

use super::DomainStore;
use crate::domains::model::AllowedUser;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    domains: Mutex<HashMap<String, Vec<AllowedUser>>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(self, domain_id: &str, users: Vec<AllowedUser>) -> Self {
        self.lock_domains().insert(domain_id.to_string(), users);
        self
    }

    pub fn contains(&self, domain_id: &str) -> bool {
        self.lock_domains().contains_key(domain_id)
    }

    pub fn users(&self, domain_id: &str) -> Option<Vec<AllowedUser>> {
        self.lock_domains().get(domain_id).cloned()
    }

    // Number of set_allowed_users calls seen so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_domains(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<AllowedUser>>> {
        self.domains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn get_allowed_users(
        &self,
        domain_id: &str,
    ) -> Result<Option<Vec<AllowedUser>>, StoreError> {
        Ok(self.users(domain_id))
    }

    async fn set_allowed_users(
        &self,
        domain_id: &str,
        users: &[AllowedUser],
    ) -> Result<(), StoreError> {
        self.lock_domains()
            .insert(domain_id.to_string(), users.to_vec());
        *self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}
