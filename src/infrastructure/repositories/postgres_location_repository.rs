use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{map_delete_error, map_write_error};
use crate::domain::ads::{City, CityWithCountry, Country};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::LocationRepository;

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    name: String,
    short_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CountryRow> for Country {
    fn from(r: CountryRow) -> Self {
        Country {
            id: r.id,
            name: r.name,
            short_name: r.short_name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// City joined with its (optional) country
#[derive(sqlx::FromRow)]
struct CityRow {
    id: Uuid,
    name: String,
    country_id: Option<Uuid>,
    short_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    country_name: Option<String>,
    country_short_name: Option<String>,
    country_created_at: Option<DateTime<Utc>>,
    country_updated_at: Option<DateTime<Utc>>,
}

impl From<CityRow> for CityWithCountry {
    fn from(r: CityRow) -> Self {
        let country = match (r.country_id, r.country_name, r.country_created_at, r.country_updated_at) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Country {
                id,
                name,
                short_name: r.country_short_name,
                created_at,
                updated_at,
            }),
            _ => None,
        };
        CityWithCountry {
            city: City {
                id: r.id,
                name: r.name,
                country_id: r.country_id,
                short_name: r.short_name,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            country,
        }
    }
}

const CITY_SELECT: &str = r#"
    SELECT ci.id, ci.name, ci.country_id, ci.short_name, ci.created_at, ci.updated_at,
           co.name AS country_name, co.short_name AS country_short_name,
           co.created_at AS country_created_at, co.updated_at AS country_updated_at
    FROM cities ci
    LEFT JOIN countries co ON co.id = ci.country_id
"#;

/// PostgreSQL implementation of LocationRepository
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn create_country(&self, country: &Country) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO countries (id, name, short_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(country.id)
        .bind(&country.name)
        .bind(country.short_name.as_deref())
        .bind(country.created_at)
        .bind(country.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_country(&self, country: &Country) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE countries SET name = $2, short_name = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(country.id)
        .bind(&country.name)
        .bind(country.short_name.as_deref())
        .bind(country.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Country".to_string()));
        }
        Ok(())
    }

    async fn delete_country(&self, id: Uuid) -> RepositoryResult<()> {
        // Cities cascade, but a city still used by listings blocks the delete
        let result = sqlx::query("DELETE FROM countries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Country".to_string()));
        }
        Ok(())
    }

    async fn find_country(&self, id: Uuid) -> RepositoryResult<Option<Country>> {
        let row = sqlx::query_as::<_, CountryRow>(
            "SELECT id, name, short_name, created_at, updated_at FROM countries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Country::from))
    }

    async fn list_countries(&self) -> RepositoryResult<Vec<Country>> {
        let rows = sqlx::query_as::<_, CountryRow>(
            "SELECT id, name, short_name, created_at, updated_at FROM countries ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Country::from).collect())
    }

    async fn create_city(&self, city: &City) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cities (id, name, country_id, short_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(city.id)
        .bind(&city.name)
        .bind(city.country_id)
        .bind(city.short_name.as_deref())
        .bind(city.created_at)
        .bind(city.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_city(&self, city: &City) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE cities
            SET name = $2, country_id = $3, short_name = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(city.id)
        .bind(&city.name)
        .bind(city.country_id)
        .bind(city.short_name.as_deref())
        .bind(city.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("City".to_string()));
        }
        Ok(())
    }

    async fn delete_city(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("City".to_string()));
        }
        Ok(())
    }

    async fn find_city(&self, id: Uuid) -> RepositoryResult<Option<CityWithCountry>> {
        let sql = format!("{} WHERE ci.id = $1", CITY_SELECT);
        let row = sqlx::query_as::<_, CityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CityWithCountry::from))
    }

    async fn list_cities(&self, country_id: Option<Uuid>) -> RepositoryResult<Vec<CityWithCountry>> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR ci.country_id = $1) ORDER BY ci.name",
            CITY_SELECT
        );
        let rows = sqlx::query_as::<_, CityRow>(&sql)
            .bind(country_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CityWithCountry::from).collect())
    }
}
