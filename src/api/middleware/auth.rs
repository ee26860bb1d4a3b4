//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::api::AppState;
use crate::domain::Identity;
use crate::errors::AppError;

/// Authenticated caller, inserted into request extensions by [`auth_middleware`].
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Identity);

/// Verifies the `Authorization: Bearer` token and injects the CurrentUser
/// into the request extensions. Missing, malformed, expired or forged tokens
/// are rejected with 401 before any handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let identity = state.auth_service.verify_token(bearer.token())?;
    tracing::debug!(user_id = %identity.id, "Request authenticated");

    request.extensions_mut().insert(CurrentUser(identity));

    Ok(next.run(request).await)
}
