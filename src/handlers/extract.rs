//! Extractors that turn axum rejections into JSON `{error}` bodies.

use std::num::IntErrorKind;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};

use crate::error::AppError;

/// `Json<T>` whose rejection is reported as a validation error.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// The `{equipment_id}` path segment, parsed as an integer id.
pub struct EquipmentIdPath(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for EquipmentIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        // An integer outside the SERIAL range names no row, so it is a miss
        let id = raw.parse::<i32>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                AppError::NotFound(format!("Equipment {} is not in database.", raw))
            }
            _ => AppError::Validation(format!("equipment_id must be an integer, got '{}'", raw)),
        })?;

        Ok(Self(id))
    }
}
