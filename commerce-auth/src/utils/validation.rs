use axum::extract::{FromRequest, Request};
use axum::Json;
use commerce_core::error::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs `validator` rules before the handler sees the
/// payload. Required fields use `#[serde(default)]`, so an absent field and
/// an empty one both fail validation with a 422 rather than a parse error.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
