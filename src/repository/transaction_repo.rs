use crate::model::transaction::Transaction;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::transaction_filter::{PageRequest, TransactionFilter, TransactionSort};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{debug, error, info, instrument};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_page(
        &self,
        filter: &TransactionFilter,
        sort: &TransactionSort,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>>;
    async fn find_all(
        &self,
        filter: &TransactionFilter,
        sort: Option<&TransactionSort>,
    ) -> RepositoryResult<Vec<Transaction>>;
    async fn count(&self, filter: &TransactionFilter) -> RepositoryResult<u64>;
    /// Whether the backing store answers; used by the health check.
    async fn ping(&self) -> RepositoryResult<()>;
}

pub struct MongoTransactionRepository {
    db: Database,
    collection: Collection<Transaction>,
}

impl MongoTransactionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoTransactionRepository {
            db: db.clone(),
            collection: db.collection::<Transaction>(collection_name),
        }
    }

    async fn find_with_options(
        &self,
        filter: &TransactionFilter,
        options: FindOptions,
    ) -> RepositoryResult<Vec<Transaction>> {
        let query = filter.to_document();
        debug!(query = %query, "Running transaction query");
        let cursor = self.collection.find(query, options).await.map_err(|e| {
            error!("Failed to query transactions: {}", e);
            RepositoryError::database(format!("Failed to query transactions: {}", e))
        })?;
        let transactions: Vec<Transaction> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read transaction cursor: {}", e);
            RepositoryError::serialization(format!("Failed to read transactions: {}", e))
        })?;
        Ok(transactions)
    }
}

#[async_trait]
impl TransactionRepository for MongoTransactionRepository {
    #[instrument(skip(self, filter, sort), fields(page = page.page, limit = page.limit))]
    async fn find_page(
        &self,
        filter: &TransactionFilter,
        sort: &TransactionSort,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>> {
        let options = FindOptions::builder()
            .sort(sort.to_document())
            .skip(page.skip())
            .limit(page.limit as i64)
            .build();
        let transactions = self.find_with_options(filter, options).await?;
        info!("Fetched {} transactions", transactions.len());
        Ok(transactions)
    }

    #[instrument(skip(self, filter, sort))]
    async fn find_all(
        &self,
        filter: &TransactionFilter,
        sort: Option<&TransactionSort>,
    ) -> RepositoryResult<Vec<Transaction>> {
        let options = FindOptions::builder().sort(sort.map(TransactionSort::to_document)).build();
        let transactions = self.find_with_options(filter, options).await?;
        info!("Fetched {} transactions", transactions.len());
        Ok(transactions)
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &TransactionFilter) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| {
                error!("Failed to count transactions: {}", e);
                RepositoryError::database(format!("Failed to count transactions: {}", e))
            })?;
        debug!("Transaction count: {}", count);
        Ok(count)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        crate::repository::mongo::ping(&self.db).await
    }
}
