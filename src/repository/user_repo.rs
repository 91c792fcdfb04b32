use crate::model::user::{User, UserUpdate};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::{
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection, Database,
};
use tracing::{debug, error, info, instrument};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account; duplicate emails surface as `AlreadyExists`.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    /// Applies the set fields and returns the updated document, `None` if the id is unknown.
    async fn update(&self, id: &ObjectId, update: UserUpdate) -> RepositoryResult<Option<User>>;
}

pub struct UserRepositoryImpl {
    collection: Collection<User>,
}

impl UserRepositoryImpl {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        UserRepositoryImpl { collection: db.collection::<User>(collection_name) }
    }
}

fn update_document(update: &UserUpdate) -> Document {
    let mut set = doc! { "updatedAt": bson::DateTime::now() };
    if let Some(ref name) = update.name {
        set.insert("name", name.clone());
    }
    if let Some(ref email) = update.email {
        set.insert("email", email.clone());
    }
    if let Some(ref hash) = update.password_hash {
        set.insert("password", hash.clone());
    }
    if let Some(last_login) = update.last_login {
        set.insert("lastLogin", last_login);
    }
    doc! { "$set": set }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        info!("Inserting user");
        let now = bson::DateTime::now();
        user.id = Some(ObjectId::new());
        user.created_at = Some(now);
        user.updated_at = Some(now);

        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!(id = %user.id_hex(), "User inserted");
                Ok(user)
            }
            Err(e) => {
                let err = RepositoryError::from(e);
                if !matches!(err, RepositoryError::AlreadyExists(_)) {
                    error!("Failed to insert user: {}", err);
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        debug!("Finding user by email");
        let user = self
            .collection
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        debug!("Finding user by id");
        let user = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: &ObjectId, update: UserUpdate) -> RepositoryResult<Option<User>> {
        info!("Updating user");
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update_document(&update), options)
            .await?;
        if updated.is_none() {
            error!("No user found to update");
        }
        Ok(updated)
    }
}
