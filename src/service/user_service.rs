use crate::config::DemoUserConfig;
use crate::dto::auth_dto::{
    AuthOutcome, AuthResponse, ChangePasswordRequest, LoginRequest, ProfileResponse, RegisterRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::dto::first_validation_message;
use crate::model::user::{Role, User, UserUpdate};
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::util::avatar::{avatar_for_name, DEFAULT_AVATAR};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};
use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USER_NOT_FOUND: &str = "User not found";

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<AuthOutcome, ServiceError>;
    async fn login(&self, request: LoginRequest) -> Result<AuthOutcome, ServiceError>;
    async fn validate(&self, user_id: &ObjectId) -> Result<UserResponse, ServiceError>;
    async fn get_profile(&self, user_id: &ObjectId) -> Result<ProfileResponse, ServiceError>;
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, ServiceError>;
    async fn change_password(&self, user_id: &ObjectId, request: ChangePasswordRequest) -> Result<(), ServiceError>;
    /// Creates the demo account when it does not exist yet and returns it.
    async fn ensure_demo_user(&self) -> Result<User, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub passwords: PasswordUtilsImpl,
    pub demo_user: DemoUserConfig,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        passwords: PasswordUtilsImpl,
        demo_user: DemoUserConfig,
    ) -> Self {
        Self { user_repo, jwt_utils, passwords, demo_user }
    }

    /// bcrypt is CPU bound, so it runs off the async workers.
    async fn hash(&self, password: String) -> Result<String, ServiceError> {
        let passwords = self.passwords;
        tokio::task::spawn_blocking(move || passwords.hash_password(&password))
            .await
            .map_err(|e| ServiceError::InternalError(format!("Hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, ServiceError> {
        let passwords = self.passwords;
        let outcome = tokio::task::spawn_blocking(move || passwords.verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::InternalError(format!("Verification task failed: {}", e)))?;
        match outcome {
            Ok(valid) => Ok(valid),
            Err(e) => {
                // A stored value that is not a bcrypt hash can never match.
                warn!("Password verification failed: {}", e);
                Ok(false)
            }
        }
    }

    fn issue(&self, user: &User) -> Result<AuthResponse, ServiceError> {
        let token = self
            .jwt_utils
            .generate_token(&user.id_hex(), &user.email, &user.name, user.role.as_str())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        Ok(AuthResponse { user: UserResponse::from(user), token })
    }

    async fn touch_last_login(&self, user: &mut User) -> Result<(), ServiceError> {
        let Some(id) = user.id else {
            return Err(ServiceError::InternalError("Stored user has no id".to_string()));
        };
        let update = UserUpdate { last_login: Some(bson::DateTime::now()), ..Default::default() };
        if let Some(updated) = self.user_repo.update(&id, update).await? {
            *user = updated;
        }
        Ok(())
    }

    async fn load(&self, user_id: &ObjectId) -> Result<User, ServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request))]
    async fn register(&self, request: RegisterRequest) -> Result<AuthOutcome, ServiceError> {
        info!("Registering new user");
        if !request.has_required_fields() {
            return Err(ServiceError::InvalidInput("Name, email, and password are required".to_string()));
        }
        if let Err(message) = request.check() {
            return Err(ServiceError::InvalidInput(message));
        }

        let name = request.name.unwrap_or_default().trim().to_string();
        let email = normalize_email(&request.email.unwrap_or_default());
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration rejected: email already in use");
            return Err(ServiceError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = self.hash(request.password.unwrap_or_default()).await?;
        let now = bson::DateTime::now();
        let user = User {
            id: None,
            avatar: avatar_for_name(&name).to_string(),
            name,
            email,
            password_hash,
            role: Role::User,
            is_active: true,
            last_login: None,
            email_verified: false,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let inserted = match self.user_repo.insert(user).await {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists(_)) => {
                warn!("Registration lost a race on the unique email index");
                return Err(ServiceError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
            Err(e) => {
                error!("Failed to insert user: {e}");
                return Err(e.into());
            }
        };
        info!(email = %inserted.email, "New user registered");
        Ok(AuthOutcome { response: self.issue(&inserted)?, demo: false })
    }

    #[instrument(skip(self, request))]
    async fn login(&self, request: LoginRequest) -> Result<AuthOutcome, ServiceError> {
        if !request.has_required_fields() {
            return Err(ServiceError::InvalidInput("Email and password are required".to_string()));
        }
        let email = normalize_email(&request.email.unwrap_or_default());
        let password = request.password.unwrap_or_default();

        if self.demo_user.matches(&email, &password) {
            info!("Demo login");
            let mut demo = self.ensure_demo_user().await?;
            self.touch_last_login(&mut demo).await?;
            return Ok(AuthOutcome { response: self.issue(&demo)?, demo: true });
        }

        let Some(mut user) = self.user_repo.find_by_email(&email).await? else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !user.is_active {
            warn!(email = %email, "Login rejected: account deactivated");
            return Err(ServiceError::Unauthorized("Account is deactivated. Please contact support.".to_string()));
        }
        if !self.verify(password, user.password_hash.clone()).await? {
            warn!(email = %email, "Login failed: wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.touch_last_login(&mut user).await?;
        info!(email = %user.email, "User logged in");
        Ok(AuthOutcome { response: self.issue(&user)?, demo: false })
    }

    #[instrument(skip(self))]
    async fn validate(&self, user_id: &ObjectId) -> Result<UserResponse, ServiceError> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(UserResponse::from(&user)),
            _ => Err(ServiceError::Unauthorized("User not found or inactive".to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &ObjectId) -> Result<ProfileResponse, ServiceError> {
        let user = self.load(user_id).await?;
        Ok(ProfileResponse::from(&user))
    }

    #[instrument(skip(self, request))]
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, ServiceError> {
        if !request.has_required_fields() {
            return Err(ServiceError::InvalidInput("Name and email are required".to_string()));
        }
        if let Err(message) = request.check() {
            return Err(ServiceError::InvalidInput(message));
        }

        let name = request.name.unwrap_or_default().trim().to_string();
        let email = normalize_email(&request.email.unwrap_or_default());
        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            if existing.id.as_ref() != Some(user_id) {
                return Err(ServiceError::Conflict("Email is already taken by another user".to_string()));
            }
        }

        let update = UserUpdate { name: Some(name), email: Some(email), ..Default::default() };
        let updated = match self.user_repo.update(user_id, update).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(ServiceError::NotFound(USER_NOT_FOUND.to_string())),
            Err(RepositoryError::AlreadyExists(_)) => {
                return Err(ServiceError::Conflict("Email is already taken by another user".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        info!(user_id = %user_id, "Profile updated");
        Ok(UserResponse::from(&updated))
    }

    #[instrument(skip(self, request))]
    async fn change_password(&self, user_id: &ObjectId, request: ChangePasswordRequest) -> Result<(), ServiceError> {
        if !request.has_required_fields() {
            return Err(ServiceError::InvalidInput(
                "Current password and new password are required".to_string(),
            ));
        }
        if let Err(errors) = request.validate() {
            return Err(ServiceError::InvalidInput(first_validation_message(
                &errors,
                &ChangePasswordRequest::FIELD_PRIORITY,
            )));
        }

        let user = self.load(user_id).await?;
        let current = request.current_password.unwrap_or_default();
        if !self.verify(current, user.password_hash.clone()).await? {
            warn!(user_id = %user_id, "Password change rejected: wrong current password");
            return Err(ServiceError::Unauthorized("Current password is incorrect".to_string()));
        }

        let password_hash = self.hash(request.new_password.unwrap_or_default()).await?;
        let update = UserUpdate { password_hash: Some(password_hash), ..Default::default() };
        self.user_repo
            .update(user_id, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;
        info!(email = %user.email, "Password changed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn ensure_demo_user(&self) -> Result<User, ServiceError> {
        if let Some(existing) = self.user_repo.find_by_email(&self.demo_user.email).await? {
            return Ok(existing);
        }

        let password_hash = self.hash(self.demo_user.password.clone()).await?;
        let now = bson::DateTime::now();
        let demo = User {
            id: None,
            name: self.demo_user.name.clone(),
            email: self.demo_user.email.clone(),
            password_hash,
            role: Role::Admin,
            avatar: DEFAULT_AVATAR.to_string(),
            is_active: true,
            last_login: None,
            email_verified: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        match self.user_repo.insert(demo).await {
            Ok(user) => {
                info!(email = %user.email, "Demo user created");
                Ok(user)
            }
            // Another request seeded it first.
            Err(RepositoryError::AlreadyExists(_)) => self
                .user_repo
                .find_by_email(&self.demo_user.email)
                .await?
                .ok_or_else(|| ServiceError::InternalError("Demo user vanished after insert conflict".to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
