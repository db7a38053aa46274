//! Store adapters.
//!
//! The core treats persistence as a generic document store: accounts and
//! capabilities are looked up, inserted, and replaced as whole documents.
//! `MongoStore` is the production implementation; `MemoryStore` backs the
//! tests.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Account, Capability};

/// Account lookup and persistence. Callers hand in already-normalized
/// emails (lowercase, trimmed).
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, anyhow::Error>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, anyhow::Error>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, anyhow::Error>;
    async fn insert(&self, account: &Account) -> Result<(), anyhow::Error>;
    /// Replace the stored document with this one, matched by id.
    async fn save(&self, account: &Account) -> Result<(), anyhow::Error>;
    async fn health_check(&self) -> Result<(), anyhow::Error>;
}

/// Capability registry access for the resolver and the superadmin
/// administration surface.
#[async_trait]
pub trait CapabilityStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Capability>, anyhow::Error>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Capability>, anyhow::Error>;
    /// Next value for the monotonic numeric capability id (max + 1,
    /// starting at 1). Single-writer assumption; not race-free.
    async fn next_capability_id(&self) -> Result<i64, anyhow::Error>;
    async fn insert(&self, capability: &Capability) -> Result<(), anyhow::Error>;
    async fn save(&self, capability: &Capability) -> Result<(), anyhow::Error>;
    /// Returns false when no document matched the id.
    async fn delete(&self, id: &ObjectId) -> Result<bool, anyhow::Error>;
}
