//! Request extractors
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Any failure, whether malformed JSON, a missing field, a wrong type or a
/// violated constraint, is rejected with 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(range(min = 0))]
        count: i64,
    }

    async fn extract(body: &str) -> Result<Payload, AppError> {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        ValidatedJson::<Payload>::from_request(request, &())
            .await
            .map(|ValidatedJson(payload)| payload)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let payload = extract(r#"{"count": 2}"#).await.unwrap();
        assert_eq!(payload.count, 2);
    }

    #[tokio::test]
    async fn test_constraint_violation_is_unprocessable() {
        let err = extract(r#"{"count": -1}"#).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_json_is_unprocessable() {
        let err = extract(r#"{"count": "#).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
