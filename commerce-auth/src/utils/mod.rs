pub mod password;
pub mod templates;
pub mod validation;

pub use password::{generate_temp_password, hash_secret, verify_secret, Secret, SecretHash};
pub use validation::ValidatedJson;
