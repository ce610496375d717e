// database/store/mod.rs - storage seam for per-domain allow-lists

use crate::domains::model::AllowedUser;
use crate::error::StoreError;
use async_trait::async_trait;

pub mod firestore;
pub mod memory;
pub mod mongo;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Reads and overwrites the `allowed_users` field of a domain document.
///
/// Writes replace the whole list. There is no conditional write, so two
/// processes updating the same domain race and the later write wins.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Returns `None` when no document exists for the domain.
    async fn get_allowed_users(&self, domain_id: &str)
        -> Result<Option<Vec<AllowedUser>>, StoreError>;

    /// Creates the document when it does not exist yet.
    async fn set_allowed_users(
        &self,
        domain_id: &str,
        users: &[AllowedUser],
    ) -> Result<(), StoreError>;
}
