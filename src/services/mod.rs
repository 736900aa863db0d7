// Service exports
pub mod cache;
pub mod classifier;
pub mod memory;
pub mod postgres;

pub use cache::CachedSubjectRepository;
pub use classifier::HttpTextClassifier;
pub use memory::InMemoryCatalog;
pub use postgres::PostgresClient;
