pub mod account;
pub mod capability;

pub use account::{normalize_email, Account, AccountStatus, Role, SanitizedAccount};
pub use capability::Capability;
