pub mod sales_repo;
pub use sales_repo::{SalesRepository, SalesSource};
pub mod cache;
pub use cache::SalesCache;
