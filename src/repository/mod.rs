pub mod mongo;
pub mod repository_error;
pub mod transaction_filter;
pub mod transaction_repo;
pub mod user_repo;
