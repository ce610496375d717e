// database/lib.rs - allow-list storage, merging and CSV import shared by the admin tools

pub mod domains;
pub mod error;
pub mod import;
pub mod store;

pub use domains::model::AllowedUser;
pub use error::{CredentialsError, CsvError, StoreError};
pub use store::DomainStore;
