//! Capability resolver and registry administration.
//!
//! The resolver maps a requested resource path to the capability of the
//! same name and checks the token's granted id set. No capability matching
//! the path means no grant: the policy is fail-closed.

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::models::{Capability, Role};
use crate::services::{Claims, ServiceError};
use crate::store::CapabilityStore;

/// Strip the leading slash and lowercase; capability names are matched
/// case-insensitively against the result.
pub fn normalize_path(path: &str) -> String {
    path.trim().trim_start_matches('/').to_lowercase()
}

#[derive(Clone)]
pub struct CapabilityService {
    store: Arc<dyn CapabilityStore>,
}

impl CapabilityService {
    pub fn new(store: Arc<dyn CapabilityStore>) -> Self {
        Self { store }
    }

    /// Gate a request: superadmin always passes; everyone else needs the
    /// capability named after the requested path in their granted set.
    ///
    /// The registry is fetched per request. At the expected dashboard
    /// traffic this is one small indexed read; a cache with invalidation on
    /// capability mutation would remove it.
    pub async fn authorize(
        &self,
        claims: &Claims,
        requested_path: &str,
    ) -> Result<(), ServiceError> {
        if claims.role == Role::Superadmin {
            return Ok(());
        }

        let wanted = normalize_path(requested_path);
        let capabilities = self.store.list().await.map_err(ServiceError::Store)?;

        match capabilities
            .iter()
            .find(|c| c.name.trim().to_lowercase() == wanted)
        {
            Some(capability) if claims.capability_ids.contains(&capability.capability_id) => Ok(()),
            _ => {
                tracing::warn!(
                    email = %claims.email,
                    path = %requested_path,
                    "Capability check denied request"
                );
                Err(ServiceError::Unauthorized)
            }
        }
    }

    // Registry administration (superadmin surface)

    pub async fn create(
        &self,
        name: &str,
        description: String,
    ) -> Result<Capability, ServiceError> {
        let name = name.trim();
        self.ensure_name_free(name, None).await?;

        let capability_id = self
            .store
            .next_capability_id()
            .await
            .map_err(ServiceError::Store)?;
        let capability = Capability::new(capability_id, name.to_string(), description);

        self.store
            .insert(&capability)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(capability_id, name = %capability.name, "Capability created");
        Ok(capability)
    }

    pub async fn list(&self) -> Result<Vec<Capability>, ServiceError> {
        self.store.list().await.map_err(ServiceError::Store)
    }

    pub async fn get(&self, id_hex: &str) -> Result<Capability, ServiceError> {
        let id = parse_object_id(id_hex)?;
        self.store
            .find_by_id(&id)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::CapabilityNotFound)
    }

    /// Update name/description. The numeric id is immutable once assigned.
    pub async fn update(
        &self,
        id_hex: &str,
        name: &str,
        description: String,
    ) -> Result<Capability, ServiceError> {
        let id = parse_object_id(id_hex)?;
        let mut capability = self
            .store
            .find_by_id(&id)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::CapabilityNotFound)?;

        let name = name.trim();
        self.ensure_name_free(name, Some(&id)).await?;

        capability.name = name.to_string();
        capability.description = description;
        capability.updated_at = chrono::Utc::now();

        self.store
            .save(&capability)
            .await
            .map_err(ServiceError::Store)?;
        Ok(capability)
    }

    pub async fn delete(&self, id_hex: &str) -> Result<(), ServiceError> {
        let id = parse_object_id(id_hex)?;
        let deleted = self.store.delete(&id).await.map_err(ServiceError::Store)?;
        if !deleted {
            return Err(ServiceError::CapabilityNotFound);
        }
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<(), ServiceError> {
        let wanted = name.to_lowercase();
        let capabilities = self.store.list().await.map_err(ServiceError::Store)?;

        let taken = capabilities.iter().any(|c| {
            c.name.trim().to_lowercase() == wanted && exclude.map_or(true, |id| c.id != *id)
        });

        if taken {
            return Err(ServiceError::CapabilityTaken);
        }
        Ok(())
    }
}

fn parse_object_id(id_hex: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id_hex).map_err(|_| ServiceError::InvalidId(id_hex.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::MemoryStore;

    fn claims(role: Role, capability_ids: Vec<i64>) -> Claims {
        Claims {
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            capability_ids,
            iat: 0,
            exp: i64::MAX,
        }
    }

    async fn service_with(names: &[&str]) -> CapabilityService {
        let service = CapabilityService::new(Arc::new(MemoryStore::new()));
        for name in names {
            service.create(name, String::new()).await.unwrap();
        }
        service
    }

    #[tokio::test]
    async fn superadmin_bypasses_capability_checks() {
        let service = service_with(&[]).await;
        let claims = claims(Role::Superadmin, vec![]);

        assert!(service.authorize(&claims, "/products").await.is_ok());
    }

    #[tokio::test]
    async fn unmapped_path_is_denied() {
        // Fail-closed: no capability named after the path means no grant
        let service = service_with(&["products"]).await;
        let claims = claims(Role::Admin, vec![1]);

        let err = service.authorize(&claims, "/orders").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn granted_capability_passes_case_insensitively() {
        let service = service_with(&["Products"]).await;
        let claims = claims(Role::Admin, vec![1]);

        assert!(service.authorize(&claims, "/products").await.is_ok());
        assert!(service.authorize(&claims, "/PRODUCTS").await.is_ok());
    }

    #[tokio::test]
    async fn missing_grant_is_denied() {
        let service = service_with(&["products"]).await;
        let claims = claims(Role::Customer, vec![]);

        let err = service.authorize(&claims, "/products").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn capability_ids_are_monotonic_from_one() {
        let service = service_with(&[]).await;
        let first = service.create("products", String::new()).await.unwrap();
        let second = service.create("orders", String::new()).await.unwrap();

        assert_eq!(first.capability_id, 1);
        assert_eq!(second.capability_id, 2);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_case_insensitively() {
        let service = service_with(&["products"]).await;

        let err = service
            .create("  PRODUCTS ", String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CapabilityTaken));
    }

    #[tokio::test]
    async fn update_keeps_numeric_id() {
        let service = service_with(&[]).await;
        let created = service.create("products", String::new()).await.unwrap();

        let updated = service
            .update(&created.id.to_hex(), "catalog", "renamed".to_string())
            .await
            .unwrap();

        assert_eq!(updated.capability_id, created.capability_id);
        assert_eq!(updated.name, "catalog");
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let service = service_with(&[]).await;
        let err = service
            .delete(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CapabilityNotFound));
    }

    #[test]
    fn path_normalization() {
        assert_eq!(normalize_path("/Products"), "products");
        assert_eq!(normalize_path("orders"), "orders");
        assert_eq!(normalize_path(" /Blogs"), "blogs");
    }
}
