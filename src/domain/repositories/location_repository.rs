use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ads::{City, CityWithCountry, Country};
use crate::domain::errors::RepositoryResult;

/// Countries and the cities inside them
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create_country(&self, country: &Country) -> RepositoryResult<()>;

    async fn update_country(&self, country: &Country) -> RepositoryResult<()>;

    /// Delete a country together with its cities
    async fn delete_country(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_country(&self, id: Uuid) -> RepositoryResult<Option<Country>>;

    async fn list_countries(&self) -> RepositoryResult<Vec<Country>>;

    async fn create_city(&self, city: &City) -> RepositoryResult<()>;

    async fn update_city(&self, city: &City) -> RepositoryResult<()>;

    /// Delete a city; fails with `InUse` while listings reference it
    async fn delete_city(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_city(&self, id: Uuid) -> RepositoryResult<Option<CityWithCountry>>;

    /// Cities ordered by name, optionally limited to one country
    async fn list_cities(&self, country_id: Option<Uuid>) -> RepositoryResult<Vec<CityWithCountry>>;
}
