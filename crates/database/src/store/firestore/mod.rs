// database/store/firestore/mod.rs - allow-list storage on Cloud Firestore over the REST API

use super::DomainStore;
use crate::domains::model::{AllowedUser, DOMAINS_COLLECTION};
use crate::error::{CredentialsError, StoreError};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Url;
use std::path::PathBuf;
use tracing::{debug, info};

pub mod credentials;
pub mod value;

use credentials::{fetch_access_token, load_service_account_key};
use value::{decode_users, Document};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1/";
pub const DEFAULT_DATABASE: &str = "(default)";
// The emulator accepts this token as an administrator
const EMULATOR_TOKEN: &str = "owner";

#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    pub credentials_path: PathBuf,
    // Overrides the project_id of the service account key
    pub project_id: Option<String>,
    pub database: String,
    // host:port of a local Firestore emulator
    pub emulator_host: Option<String>,
}

#[derive(Debug)]
pub struct FirestoreStore {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    database: String,
    token: String,
}

impl FirestoreStore {
    /// Loads the service account key and obtains an access token.
    ///
    /// Fails when the key file is missing or unusable, so every command can
    /// rely on a working handle.
    pub async fn connect(config: &FirestoreConfig) -> Result<Self, CredentialsError> {
        let key = load_service_account_key(&config.credentials_path)?;

        let project_id = config
            .project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or(CredentialsError::MissingProject)?;

        let http = reqwest::Client::new();

        let (base_url, token) = match &config.emulator_host {
            Some(host) => {
                info!("Using Firestore emulator at {}", host);
                (format!("http://{}/v1/", host), EMULATOR_TOKEN.to_string())
            }
            None => {
                let token = fetch_access_token(&http, &key).await?;
                (FIRESTORE_BASE_URL.to_string(), token)
            }
        };

        let base_url =
            Url::parse(&base_url).map_err(|_| CredentialsError::InvalidEndpoint(base_url))?;

        debug!("Connected to Firestore project {}", project_id);
        Ok(FirestoreStore {
            http,
            base_url,
            project_id,
            database: config.database.clone(),
            token,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    // projects/{project}/databases/{database}/documents/domains/{domain_id}
    fn document_url(&self, domain_id: &str) -> Result<Url, StoreError> {
        if domain_id.is_empty() {
            return Err(StoreError::InvalidPath("domain id is empty".to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidPath(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
                "documents",
                DOMAINS_COLLECTION,
                domain_id,
            ]);

        Ok(url)
    }
}

async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Status { status, body }
}

#[async_trait]
impl DomainStore for FirestoreStore {
    async fn get_allowed_users(
        &self,
        domain_id: &str,
    ) -> Result<Option<Vec<AllowedUser>>, StoreError> {
        let url = self.document_url(domain_id)?;
        debug!("GET {}", url);

        let response = self.http.get(url).bearer_auth(&self.token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: Document = response.json().await?;
                decode_users(domain_id, &document.fields).map(Some)
            }
            _ => Err(status_error(response).await),
        }
    }

    async fn set_allowed_users(
        &self,
        domain_id: &str,
        users: &[AllowedUser],
    ) -> Result<(), StoreError> {
        let url = self.document_url(domain_id)?;
        debug!("PATCH {} ({} users)", url, users.len());

        // Without an update mask the PATCH replaces every field of the document
        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(&Document::with_users(users))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(())
    }
}
