// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod errors;
pub mod postgres_category_repository;
pub mod postgres_job_repository;
pub mod postgres_location_repository;
pub mod postgres_optional_field_repository;
pub mod postgres_review_repository;
pub mod postgres_team_directory_repository;
pub mod postgres_user_repository;

pub use postgres_category_repository::PostgresCategoryRepository;
pub use postgres_job_repository::PostgresJobRepository;
pub use postgres_location_repository::PostgresLocationRepository;
pub use postgres_optional_field_repository::PostgresOptionalFieldRepository;
pub use postgres_review_repository::PostgresReviewRepository;
pub use postgres_team_directory_repository::PostgresTeamDirectoryRepository;
pub use postgres_user_repository::PostgresUserRepository;
