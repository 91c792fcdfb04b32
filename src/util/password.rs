//! Password hashing and verification utilities
//!
//! Hashes are bcrypt (`$2b$`), which keeps accounts created by earlier
//! deployments of the dashboard able to log in.

use tracing::{debug, error};

/// Error types for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

pub trait PasswordUtils {
    /// Hashes the given password with bcrypt at the configured cost
    fn hash_password(&self, password: &str) -> Result<String, PasswordError>;

    /// Verifies the given password against the stored hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordUtilsImpl {
    pub cost: u32,
}

impl PasswordUtilsImpl {
    pub fn new(cost: u32) -> Self {
        PasswordUtilsImpl { cost }
    }
}

impl Default for PasswordUtilsImpl {
    fn default() -> Self {
        PasswordUtilsImpl { cost: bcrypt::DEFAULT_COST }
    }
}

impl PasswordUtils for PasswordUtilsImpl {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        debug!(cost = self.cost, "Hashing password");
        bcrypt::hash(password, self.cost).map_err(|err| {
            error!("Failed to hash password: {}", err);
            PasswordError::HashingFailed(err.to_string())
        })
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        debug!("Verifying password against hash");
        match bcrypt::verify(password, hash) {
            Ok(valid) => {
                debug!(valid, "Password verification finished");
                Ok(valid)
            }
            Err(bcrypt::BcryptError::InvalidHash(_)) | Err(bcrypt::BcryptError::InvalidPrefix(_)) => {
                error!("Invalid password hash format");
                Err(PasswordError::InvalidHashFormat)
            }
            Err(err) => {
                error!("Password verification error: {}", err);
                Err(PasswordError::VerificationFailed(err.to_string()))
            }
        }
    }
}
