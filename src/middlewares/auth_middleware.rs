use crate::repository::user_repo::UserRepository;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<dyn UserRepository>,
}

/// Caller identity attached to the request by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    // A header without the Bearer scheme counts as no token at all.
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| state.jwt_utils.extract_token_from_header(header).ok())
        .ok_or_else(|| HandlerError::unauthorized("Access token required"))?;

    let claims = state.jwt_utils.validate_token(&token).map_err(|e| {
        debug!("Rejected token: {}", e);
        HandlerError::forbidden("Invalid or expired token")
    })?;
    let id = ObjectId::parse_str(&claims.id).map_err(|_| {
        warn!(id = %claims.id, "Token carries a malformed user id");
        HandlerError::forbidden("Invalid or expired token")
    })?;

    let user = state
        .user_repo
        .find_by_id(&id)
        .await
        .map_err(|e| HandlerError::internal(format!("Failed to load token user: {}", e)))?;
    let Some(user) = user.filter(|u| u.is_active) else {
        warn!(user_id = %id, "Token user missing or deactivated");
        return Err(HandlerError::unauthorized("User not found or inactive"));
    };

    req.extensions_mut().insert(AuthUser {
        id,
        email: user.email,
        name: user.name,
        role: user.role.to_string(),
    });
    Ok(next.run(req).await)
}
