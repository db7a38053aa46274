//! In-memory store used by tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use crate::models::{Account, Capability};
use crate::store::{AccountStore, CapabilityStore};

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
    capabilities: Mutex<Vec<Capability>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_accounts(&self) -> Result<std::sync::MutexGuard<'_, Vec<Account>>, anyhow::Error> {
        self.accounts
            .lock()
            .map_err(|e| anyhow::anyhow!("Account store mutex poisoned: {}", e))
    }

    fn lock_capabilities(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<Capability>>, anyhow::Error> {
        self.capabilities
            .lock()
            .map_err(|e| anyhow::anyhow!("Capability store mutex poisoned: {}", e))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, anyhow::Error> {
        Ok(self
            .lock_accounts()?
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, anyhow::Error> {
        Ok(self
            .lock_accounts()?
            .iter()
            .find(|a| a.phone == phone)
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, anyhow::Error> {
        Ok(self.lock_accounts()?.iter().find(|a| a.id == *id).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), anyhow::Error> {
        let mut accounts = self.lock_accounts()?;
        // Mirror the unique indexes the Mongo implementation relies on
        if accounts
            .iter()
            .any(|a| a.email == account.email || a.phone == account.phone)
        {
            anyhow::bail!("duplicate key");
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), anyhow::Error> {
        let mut accounts = self.lock_accounts()?;
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => anyhow::bail!("Account {} no longer exists", account.id.to_hex()),
        }
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

#[async_trait]
impl CapabilityStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Capability>, anyhow::Error> {
        Ok(self.lock_capabilities()?.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Capability>, anyhow::Error> {
        Ok(self
            .lock_capabilities()?
            .iter()
            .find(|c| c.id == *id)
            .cloned())
    }

    async fn next_capability_id(&self) -> Result<i64, anyhow::Error> {
        Ok(self
            .lock_capabilities()?
            .iter()
            .map(|c| c.capability_id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1))
    }

    async fn insert(&self, capability: &Capability) -> Result<(), anyhow::Error> {
        let mut capabilities = self.lock_capabilities()?;
        if capabilities.iter().any(|c| c.name == capability.name) {
            anyhow::bail!("duplicate key");
        }
        capabilities.push(capability.clone());
        Ok(())
    }

    async fn save(&self, capability: &Capability) -> Result<(), anyhow::Error> {
        let mut capabilities = self.lock_capabilities()?;
        match capabilities.iter_mut().find(|c| c.id == capability.id) {
            Some(slot) => {
                *slot = capability.clone();
                Ok(())
            }
            None => anyhow::bail!("Capability {} no longer exists", capability.id.to_hex()),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, anyhow::Error> {
        let mut capabilities = self.lock_capabilities()?;
        let before = capabilities.len();
        capabilities.retain(|c| c.id != *id);
        Ok(capabilities.len() < before)
    }
}
