// Repository ports
// Implemented by infrastructure adapters

pub mod category_repository;
pub mod job_repository;
pub mod location_repository;
pub mod optional_field_repository;
pub mod review_repository;
pub mod team_directory_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use job_repository::{CitySummary, JobListing, JobRepository, OwnerSummary};
pub use location_repository::LocationRepository;
pub use optional_field_repository::OptionalFieldRepository;
pub use review_repository::ReviewRepository;
pub use team_directory_repository::TeamDirectoryRepository;
pub use user_repository::UserRepository;
