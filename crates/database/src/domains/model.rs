// database/domains/model.rs - models for the domains collection
use serde::{Deserialize, Serialize};

pub const DOMAINS_COLLECTION: &str = "domains";
pub const ALLOWED_USERS_FIELD: &str = "allowed_users";

// A user permitted to access a domain. The email is the identity key and is
// compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedUser {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl AllowedUser {
    /// Trims both values and falls back to the email when the name is absent or blank.
    pub fn new(email: &str, name: Option<&str>) -> Self {
        let email = email.trim().to_string();
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => email.clone(),
        };

        AllowedUser { email, name }
    }

    pub fn email_key(&self) -> String {
        self.email.to_lowercase()
    }

    // Stored entries may carry a blank name
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

// Document stored per domain. The domain id doubles as the document id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DomainModel {
    #[serde(rename = "_id")]
    pub domain_id: String,
    #[serde(default)]
    pub allowed_users: Vec<AllowedUser>,
}
