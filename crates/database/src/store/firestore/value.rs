// database/store/firestore/value.rs - conversion between allow-lists and Firestore REST values

use crate::domains::model::{AllowedUser, ALLOWED_USERS_FIELD};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// Body of a Firestore document as returned by GET and accepted by PATCH
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn with_users(users: &[AllowedUser]) -> Self {
        let mut fields = Map::new();
        fields.insert(ALLOWED_USERS_FIELD.to_string(), encode_users(users));

        Document { name: None, fields }
    }
}

pub fn encode_users(users: &[AllowedUser]) -> Value {
    let values: Vec<Value> = users
        .iter()
        .map(|user| {
            json!({
                "mapValue": {
                    "fields": {
                        "email": { "stringValue": user.email },
                        "name": { "stringValue": user.name },
                    }
                }
            })
        })
        .collect();

    // Firestore omits `values` for an empty array
    if values.is_empty() {
        json!({ "arrayValue": {} })
    } else {
        json!({ "arrayValue": { "values": values } })
    }
}

/// Reads `allowed_users` out of a document's fields.
///
/// A missing or null field is an empty list. A map is read as the list of its
/// values, which covers documents edited by hand in the console. Entries are
/// returned as stored; a missing name reads as an empty string.
pub fn decode_users(
    domain_id: &str,
    fields: &Map<String, Value>,
) -> Result<Vec<AllowedUser>, StoreError> {
    let malformed = |reason: String| StoreError::MalformedDocument {
        domain_id: domain_id.to_string(),
        reason,
    };

    let field = match fields.get(ALLOWED_USERS_FIELD) {
        None => return Ok(Vec::new()),
        Some(field) => field,
    };

    let entries: Vec<&Value> = if let Some(array) = field.get("arrayValue") {
        match array.get("values") {
            Some(Value::Array(values)) => values.iter().collect(),
            Some(_) => return Err(malformed("arrayValue.values is not a list".to_string())),
            None => Vec::new(),
        }
    } else if let Some(map) = field.get("mapValue") {
        match map.get("fields") {
            Some(Value::Object(values)) => {
                let mut keyed: Vec<(&String, &Value)> = values.iter().collect();
                keyed.sort_by_key(|(key, _)| match array_index(key) {
                    Some(index) => (0, index),
                    None => (1, 0),
                });
                keyed.into_iter().map(|(_, value)| value).collect()
            }
            Some(_) => return Err(malformed("mapValue.fields is not an object".to_string())),
            None => Vec::new(),
        }
    } else if field.get("nullValue").is_some() {
        Vec::new()
    } else {
        return Err(malformed(format!(
            "{} is neither an array nor a map",
            ALLOWED_USERS_FIELD
        )));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry_fields = entry
                .get("mapValue")
                .and_then(|map| map.get("fields"))
                .and_then(Value::as_object)
                .ok_or_else(|| malformed(format!("entry {} is not a map", index)))?;

            let email = string_field(entry_fields, "email")
                .ok_or_else(|| malformed(format!("entry {} has no email", index)))?;

            let name = string_field(entry_fields, "name").unwrap_or_default();

            Ok(AllowedUser { email, name })
        })
        .collect()
}

// Integer keys come first in ascending order, the rest keep their key order
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .filter(|index| index.to_string() == key)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
