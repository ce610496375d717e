// database/store/mongo.rs - allow-list storage on a MongoDB domains collection

use super::DomainStore;
use crate::domains::model::{AllowedUser, DomainModel, DOMAINS_COLLECTION};
use crate::error::StoreError;
use async_trait::async_trait;
use mongodb::{bson::doc, options::ReplaceOptions, Client, Collection};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;

        Ok(Self::new(client, database))
    }

    pub fn new(client: Client, database: &str) -> Self {
        MongoStore {
            client,
            database: database.to_string(),
        }
    }

    fn collection(&self) -> Collection<DomainModel> {
        self.client
            .database(&self.database)
            .collection(DOMAINS_COLLECTION)
    }
}

#[async_trait]
impl DomainStore for MongoStore {
    async fn get_allowed_users(
        &self,
        domain_id: &str,
    ) -> Result<Option<Vec<AllowedUser>>, StoreError> {
        debug!("Loading domain {} from {}", domain_id, self.database);

        let result = self
            .collection()
            .find_one(doc! { "_id": domain_id }, None)
            .await?;

        Ok(result.map(|model| model.allowed_users))
    }

    async fn set_allowed_users(
        &self,
        domain_id: &str,
        users: &[AllowedUser],
    ) -> Result<(), StoreError> {
        let model = DomainModel {
            domain_id: domain_id.to_string(),
            allowed_users: users.to_vec(),
        };

        // Replace the whole document, creating it on first write
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection()
            .replace_one(doc! { "_id": domain_id }, model, options)
            .await?;

        debug!("Wrote {} users to domain {}", users.len(), domain_id);
        Ok(())
    }
}
