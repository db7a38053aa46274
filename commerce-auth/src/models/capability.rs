//! Capability model - named permission units matched against request paths.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A named permission unit. The numeric `capability_id` is assigned once at
/// creation (monotonic under the single-writer assumption) and never changes;
/// `name` is unique and matched case-insensitively against request paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub capability_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Capability {
    pub fn new(capability_id: i64, name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            capability_id,
            name: name.trim().to_string(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_capability_trims_name() {
        let cap = Capability::new(1, "  products  ".to_string(), String::new());
        assert_eq!(cap.name, "products");
        assert_eq!(cap.capability_id, 1);
    }
}
