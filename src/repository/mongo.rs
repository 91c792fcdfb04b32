use crate::config::MongoConfig;
use crate::repository::repository_error::RepositoryResult;
use bson::doc;
use mongodb::{
    options::{ClientOptions, Credential, IndexOptions, ResolverConfig},
    Client, Database, IndexModel,
};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Builds a pooled client and returns the configured database handle.
///
/// The handle is cheap to clone; repositories take their own copy.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> RepositoryResult<Database> {
    info!("Connecting to MongoDB");
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some("FinanceDashboardBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(Duration::from_secs(config.connection_timeout_secs));
    client_options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    let db = client.database(&config.database);
    info!("MongoDB client ready");
    Ok(db)
}

/// Round-trips a `ping` command; used by the health endpoint.
pub async fn ping(db: &Database) -> RepositoryResult<()> {
    db.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}

/// Creates the indexes the queries rely on. Failures are logged, never fatal.
#[instrument(skip(db, config))]
pub async fn ensure_indexes(db: &Database, config: &MongoConfig) {
    let users = db.collection::<bson::Document>(&config.users_collection);
    let email_index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    match users.create_index(email_index, None).await {
        Ok(_) => info!("Ensured unique index on users.email"),
        Err(e) => warn!("Failed to create users.email index: {}", e),
    }

    let transactions = db.collection::<bson::Document>(&config.transactions_collection);
    let indexes = vec![
        IndexModel::builder().keys(doc! { "date": -1 }).build(),
        IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
    ];
    match transactions.create_indexes(indexes, None).await {
        Ok(_) => info!("Ensured transaction indexes on date and user_id"),
        Err(e) => warn!("Failed to create transaction indexes: {}", e),
    }
}
