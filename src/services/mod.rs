// Service exports
pub mod cache;
pub mod cached_directory;
pub mod directory;
pub mod postgres;
pub mod reputation;
pub mod search;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use cached_directory::CachedDirectory;
pub use directory::{HttpDirectoryClient, OrganizationDirectory, DirectoryError};
pub use postgres::{PostgresClient, PostgresError};
pub use reputation::{ReputationAggregator, ReputationError};
pub use search::{SearchService, SearchError};
