// database/import.rs - reading allowed users from a CSV file with an `email,name` header

use crate::domains::model::AllowedUser;
use crate::error::CsvError;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

// One CSV row. Both columns are optional at this level; rows without an email are dropped.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

pub fn read_users_from_csv(path: &Path) -> Result<Vec<AllowedUser>, CsvError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CsvError::NotFound(path.to_path_buf()),
        _ => CsvError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let users = parse_users(file)?;
    debug!("Read {} users from {}", users.len(), path.display());
    Ok(users)
}

pub fn parse_users<R: Read>(reader: R) -> Result<Vec<AllowedUser>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut users = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        let email = match row.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email,
            _ => continue,
        };

        users.push(AllowedUser::new(email, row.name.as_deref()));
    }

    Ok(users)
}
