pub mod user;
pub mod transaction;
