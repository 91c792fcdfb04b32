use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::middlewares::auth_middleware::AuthUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

// Register
pub async fn register_handler(
    State(service): State<Arc<UserServiceImpl>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    let outcome = service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registration successful! Welcome to the platform.", outcome.response)),
    ))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    let outcome = service.login(payload).await?;
    let message = if outcome.demo { "Demo login successful" } else { "Login successful" };
    Ok(Json(ApiResponse::ok(message, outcome.response)))
}

// Validate session
pub async fn validate_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.validate(&auth.id).await?;
    Ok(Json(ApiResponse::ok("Token valid", user)))
}

pub async fn get_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.get_profile(&auth.id).await?;
    Ok(Json(ApiResponse::ok("Profile retrieved successfully", profile)))
}

pub async fn update_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    let user = service.update_profile(&auth.id, payload).await?;
    Ok(Json(ApiResponse::ok("Profile updated successfully", user)))
}

pub async fn change_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    service.change_password(&auth.id, payload).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}
