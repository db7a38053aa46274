pub mod auth;
pub mod capability;
pub mod superadmin;

pub use auth::{require_auth, require_refresh_auth, AuthClaims};
pub use capability::require_capability;
pub use superadmin::require_superadmin;
