use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{AccountStatus, Role};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddDashboardUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "full name is required"))]
    #[schema(example = "Ops Admin")]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    #[schema(example = "555-0101")]
    pub phone: String,

    pub role: Role,

    #[serde(default)]
    pub capability_ids: Vec<i64>,

    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDashboardUserRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub capability_ids: Option<Vec<i64>>,
    pub profile_picture: Option<String>,
}
