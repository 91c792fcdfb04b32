#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use finance_dashboard_backend::app::app::{App, AppSettings};
use finance_dashboard_backend::config::{AppConfig, DemoUserConfig, JwtConfig};
use finance_dashboard_backend::model::transaction::{format_iso, Transaction};
use finance_dashboard_backend::model::user::{User, UserUpdate};
use finance_dashboard_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use finance_dashboard_backend::repository::transaction_filter::{PageRequest, TransactionFilter, TransactionSort};
use finance_dashboard_backend::repository::transaction_repo::TransactionRepository;
use finance_dashboard_backend::repository::user_repo::UserRepository;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for .oneshot()

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn deactivate(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.is_active = false;
        }
    }

    pub fn remove(&self, email: &str) {
        self.users.lock().unwrap().retain(|u| u.email != email);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists(format!("duplicate email {}", user.email)));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn update(&self, id: &ObjectId, update: UserUpdate) -> RepositoryResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if let Some(ref email) = update.email {
            if users.iter().any(|u| &u.email == email && u.id.as_ref() != Some(id)) {
                return Err(RepositoryError::already_exists("duplicate email"));
            }
        }
        Ok(users.iter_mut().find(|u| u.id.as_ref() == Some(id)).map(|user| {
            update.apply_to(user);
            user.clone()
        }))
    }
}

pub struct InMemoryTransactionRepository {
    pub transactions: Mutex<Vec<Transaction>>,
    pub online: AtomicBool,
}

impl InMemoryTransactionRepository {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        InMemoryTransactionRepository { transactions: Mutex::new(transactions), online: AtomicBool::new(true) }
    }

    fn select(&self, filter: &TransactionFilter, sort: Option<&TransactionSort>) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> =
            self.transactions.lock().unwrap().iter().filter(|t| filter.matches(t)).cloned().collect();
        if let Some(sort) = sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }
        rows
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_page(
        &self,
        filter: &TransactionFilter,
        sort: &TransactionSort,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>> {
        Ok(self
            .select(filter, Some(sort))
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn find_all(
        &self,
        filter: &TransactionFilter,
        sort: Option<&TransactionSort>,
    ) -> RepositoryResult<Vec<Transaction>> {
        Ok(self.select(filter, sort))
    }

    async fn count(&self, filter: &TransactionFilter) -> RepositoryResult<u64> {
        Ok(self.select(filter, None).len() as u64)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::connection("server selection timeout"))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub transactions: Arc<InMemoryTransactionRepository>,
}

pub fn settings() -> AppSettings {
    AppSettings {
        app: AppConfig { bcrypt_cost: 4, ..AppConfig::default() },
        jwt: JwtConfig::default(),
        demo_user: DemoUserConfig::default(),
    }
}

pub fn test_app(transactions: Vec<Transaction>) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let transactions = Arc::new(InMemoryTransactionRepository::new(transactions));
    let app = App::from_parts(settings(), users.clone(), transactions.clone());
    TestApp { router: app.router(), users, transactions }
}

pub fn days_ago(days: i64) -> String {
    format_iso(Utc::now() - Duration::days(days))
}

pub fn tx(user_id: &str, user_name: &str, amount: f64, category: &str, status: &str, date: &str) -> Transaction {
    Transaction {
        id: Some(ObjectId::new()),
        user_id: user_id.to_string(),
        user_name: Some(user_name.to_string()),
        amount,
        category: category.to_string(),
        status: Some(status.to_string()),
        date: date.to_string(),
        avatar: None,
        direction: None,
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send_raw(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = send_raw(router, req).await;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

/// Logs in with the demo credentials and returns the bearer token.
pub async fn demo_token(router: &Router) -> String {
    let (status, body) = send(
        router,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": "admin@example.com", "password": "password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "demo login failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}
