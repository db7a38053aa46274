use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Capability;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCapabilityRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "products")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Access to the product catalog")]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCapabilityRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "products")]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CapabilityResponse {
    #[schema(example = "665f1c2ab7e4a2d9c0a1b2c3")]
    pub id: String,
    #[schema(example = 7)]
    pub capability_id: i64,
    #[schema(example = "products")]
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Capability> for CapabilityResponse {
    fn from(c: Capability) -> Self {
        Self {
            id: c.id.to_hex(),
            capability_id: c.capability_id,
            name: c.name,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
