//! MongoDB store implementation.

use async_trait::async_trait;
use commerce_core::error::AppError;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};

use crate::models::{Account, Capability};
use crate::store::{AccountStore, CapabilityStore};

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);

        Ok(Self { db })
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection::<Account>("accounts")
    }

    pub fn capabilities(&self) -> Collection<Capability> {
        self.db.collection::<Capability>("capabilities")
    }

    /// Create the unique indexes the data model relies on. Idempotent;
    /// called once at startup.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let unique = |keys| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        self.accounts()
            .create_index(unique(doc! { "email": 1 }), None)
            .await?;
        self.accounts()
            .create_index(unique(doc! { "phone": 1 }), None)
            .await?;
        self.capabilities()
            .create_index(unique(doc! { "name": 1 }), None)
            .await?;
        self.capabilities()
            .create_index(unique(doc! { "capability_id": 1 }), None)
            .await?;

        tracing::info!("MongoDB indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, anyhow::Error> {
        Ok(self.accounts().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, anyhow::Error> {
        Ok(self.accounts().find_one(doc! { "phone": phone }, None).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, anyhow::Error> {
        Ok(self.accounts().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(&self, account: &Account) -> Result<(), anyhow::Error> {
        self.accounts().insert_one(account, None).await?;
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), anyhow::Error> {
        let result = self
            .accounts()
            .replace_one(doc! { "_id": &account.id }, account, None)
            .await?;

        if result.matched_count == 0 {
            anyhow::bail!("Account {} no longer exists", account.id.to_hex());
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[async_trait]
impl CapabilityStore for MongoStore {
    async fn list(&self) -> Result<Vec<Capability>, anyhow::Error> {
        let cursor = self.capabilities().find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Capability>, anyhow::Error> {
        Ok(self
            .capabilities()
            .find_one(doc! { "_id": id }, None)
            .await?)
    }

    async fn next_capability_id(&self) -> Result<i64, anyhow::Error> {
        let options = mongodb::options::FindOneOptions::builder()
            .sort(doc! { "capability_id": -1 })
            .build();
        let last = self.capabilities().find_one(None, options).await?;
        Ok(last.map(|c| c.capability_id + 1).unwrap_or(1))
    }

    async fn insert(&self, capability: &Capability) -> Result<(), anyhow::Error> {
        self.capabilities().insert_one(capability, None).await?;
        Ok(())
    }

    async fn save(&self, capability: &Capability) -> Result<(), anyhow::Error> {
        let result = self
            .capabilities()
            .replace_one(doc! { "_id": &capability.id }, capability, None)
            .await?;

        if result.matched_count == 0 {
            anyhow::bail!("Capability {} no longer exists", capability.id.to_hex());
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, anyhow::Error> {
        let result = self
            .capabilities()
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}
