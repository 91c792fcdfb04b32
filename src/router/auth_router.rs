use crate::handler::auth_handler::{
    change_password_handler, get_profile_handler, login_handler, register_handler, update_profile_handler,
    validate_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::user_service::UserServiceImpl;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn auth_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public routes
    let public = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler));

    // Session-protected routes
    let protected = Router::new()
        .route("/auth/validate", get(validate_handler))
        .route("/auth/profile", get(get_profile_handler).put(update_profile_handler))
        .route("/auth/change-password", put(change_password_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    public.merge(protected).with_state(service)
}
