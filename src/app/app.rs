use crate::config::{AppConfig, ConfigError, DemoUserConfig, JwtConfig, MongoConfig};
use crate::handler::health_handler::not_found_handler;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::mongo;
use crate::repository::repository_error::RepositoryError;
use crate::repository::transaction_repo::{MongoTransactionRepository, TransactionRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::analytics_router::analytics_router;
use crate::router::auth_router::auth_router;
use crate::router::chart_router::chart_router;
use crate::router::dashboard_router::dashboard_router;
use crate::router::health_router::health_router;
use crate::router::transaction_router::transaction_router;
use crate::service::analytics_service::AnalyticsServiceImpl;
use crate::service::chart_service::ChartServiceImpl;
use crate::service::dashboard_service::DashboardServiceImpl;
use crate::service::transaction_service::TransactionServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::password::PasswordUtilsImpl;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the HTTP layer needs besides the storage handles.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub app: AppConfig,
    pub jwt: JwtConfig,
    pub demo_user: DemoUserConfig,
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
}

impl App {
    /// Loads configuration from the environment and connects to MongoDB.
    pub async fn new() -> Result<Self, AppError> {
        let settings = AppSettings {
            app: AppConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            demo_user: DemoUserConfig::from_env()?,
        };
        let mongo_config = MongoConfig::from_env()?;

        let db = mongo::connect(&mongo_config).await?;
        mongo::ensure_indexes(&db, &mongo_config).await;

        let user_repo: Arc<dyn UserRepository> =
            Arc::new(UserRepositoryImpl::new(&db, &mongo_config.users_collection));
        let transaction_repo: Arc<dyn TransactionRepository> =
            Arc::new(MongoTransactionRepository::new(&db, &mongo_config.transactions_collection));

        let app = App::from_parts(settings, user_repo, transaction_repo);
        app.seed_demo_user().await;
        Ok(app)
    }

    /// Wires services and routes over the given repositories.
    pub fn from_parts(
        settings: AppSettings,
        user_repo: Arc<dyn UserRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
    ) -> Self {
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(settings.jwt));
        let passwords = PasswordUtilsImpl::new(settings.app.bcrypt_cost);

        let user_service = Arc::new(UserServiceImpl::new(
            user_repo.clone(),
            jwt_utils.clone(),
            passwords,
            settings.demo_user,
        ));
        let transaction_service = Arc::new(TransactionServiceImpl::new(transaction_repo.clone()));
        let dashboard_service = Arc::new(DashboardServiceImpl::new(transaction_repo.clone()));
        let chart_service = Arc::new(ChartServiceImpl::new(transaction_repo.clone()));
        let analytics_service = Arc::new(AnalyticsServiceImpl::new(transaction_repo.clone()));

        let auth_state = Arc::new(AuthState { jwt_utils, user_repo });

        let api = Router::new()
            .merge(auth_router(user_service.clone(), auth_state.clone()))
            .merge(transaction_router(transaction_service, auth_state.clone()))
            .merge(dashboard_router(dashboard_service, auth_state.clone()))
            .merge(chart_router(chart_service, auth_state.clone()))
            .merge(analytics_router(analytics_service, auth_state))
            .merge(health_router(transaction_repo));

        let router = Router::new()
            .nest("/api", api)
            .fallback(not_found_handler)
            .layer(cors_layer(&settings.app.cors_allowed_origins))
            .layer(TraceLayer::new_for_http());

        App { config: settings.app, router, user_service }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Provisions the demo account; failures are logged and startup continues.
    pub async fn seed_demo_user(&self) {
        if !self.user_service.demo_user.enabled {
            return;
        }
        match self.user_service.ensure_demo_user().await {
            Ok(user) => info!(email = %user.email, "Demo user ready"),
            Err(e) => error!("Failed to provision demo user: {e}"),
        }
    }

    pub async fn start(self) -> Result<(), AppError> {
        let host: IpAddr = self
            .config
            .host
            .parse()
            .map_err(|_| AppError::InvalidAddress(self.config.host.clone()))?;
        let addr = SocketAddr::new(host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
