use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, StaffAuth};
use crate::api::state::AppState;
use crate::domain::ads::{City, CityWithCountry, Country};
use crate::domain::repositories::LocationRepository;
use crate::infrastructure::repositories::PostgresLocationRepository;

#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub name: String,
    pub short_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl From<&Country> for CountryResponse {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            name: country.name.clone(),
            short_name: country.short_name.clone(),
            date_create: country.created_at,
            date_update: country.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub name: String,
    pub country: Option<Uuid>,
    pub short_name: Option<String>,
}

/// Optional `?country=<id>` filter for the city list
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub country: Option<Uuid>,
}

/// City with its country nested
#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub country: Option<CountryResponse>,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl CityResponse {
    fn new(city: &City, country: Option<&Country>) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            short_name: city.short_name.clone(),
            country: country.map(CountryResponse::from),
            date_create: city.created_at,
            date_update: city.updated_at,
        }
    }
}

impl From<&CityWithCountry> for CityResponse {
    fn from(row: &CityWithCountry) -> Self {
        Self::new(&row.city, row.country.as_ref())
    }
}

// ===== Countries =====

/// GET /api/countries
pub async fn list_countries(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryResponse>>, ApiError> {
    let countries = PostgresLocationRepository::new(state.pool.clone())
        .list_countries()
        .await?;
    Ok(Json(countries.iter().map(CountryResponse::from).collect()))
}

/// GET /api/countries/:id
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CountryResponse>, ApiError> {
    let country = PostgresLocationRepository::new(state.pool.clone())
        .find_country(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Country not found"))?;
    Ok(Json(CountryResponse::from(&country)))
}

/// POST /api/countries
pub async fn create_country(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<CountryRequest>,
) -> Result<(StatusCode, Json<CountryResponse>), ApiError> {
    let country = Country::new(&req.name, req.short_name.as_deref())?;
    PostgresLocationRepository::new(state.pool.clone())
        .create_country(&country)
        .await?;

    info!(country_id = %country.id, "Country created");
    Ok((StatusCode::CREATED, Json(CountryResponse::from(&country))))
}

/// PUT /api/countries/:id
pub async fn update_country(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CountryRequest>,
) -> Result<Json<CountryResponse>, ApiError> {
    let repo = PostgresLocationRepository::new(state.pool.clone());
    let mut country = repo
        .find_country(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Country not found"))?;

    country.update(&req.name, req.short_name.as_deref())?;
    repo.update_country(&country).await?;

    info!(country_id = %id, "Country updated");
    Ok(Json(CountryResponse::from(&country)))
}

/// DELETE /api/countries/:id
///
/// Removes the country's cities as well.
pub async fn delete_country(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresLocationRepository::new(state.pool.clone())
        .delete_country(id)
        .await?;

    info!(country_id = %id, "Country deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ===== Cities =====

/// GET /api/cities
pub async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<CityResponse>>, ApiError> {
    let cities = PostgresLocationRepository::new(state.pool.clone())
        .list_cities(query.country)
        .await?;
    Ok(Json(cities.iter().map(CityResponse::from).collect()))
}

/// GET /api/cities/:id
pub async fn get_city(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CityResponse>, ApiError> {
    let city = PostgresLocationRepository::new(state.pool.clone())
        .find_city(id)
        .await?
        .ok_or_else(|| ApiError::not_found("City not found"))?;
    Ok(Json(CityResponse::from(&city)))
}

/// POST /api/cities
pub async fn create_city(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<CityRequest>,
) -> Result<(StatusCode, Json<CityResponse>), ApiError> {
    let repo = PostgresLocationRepository::new(state.pool.clone());
    let city = City::new(&req.name, req.country, req.short_name.as_deref())?;
    repo.create_city(&city).await?;

    let country = match city.country_id {
        Some(country_id) => repo.find_country(country_id).await?,
        None => None,
    };

    info!(city_id = %city.id, "City created");
    Ok((StatusCode::CREATED, Json(CityResponse::new(&city, country.as_ref()))))
}

/// PUT /api/cities/:id
pub async fn update_city(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CityRequest>,
) -> Result<Json<CityResponse>, ApiError> {
    let repo = PostgresLocationRepository::new(state.pool.clone());
    let CityWithCountry { mut city, .. } = repo
        .find_city(id)
        .await?
        .ok_or_else(|| ApiError::not_found("City not found"))?;

    city.update(&req.name, req.country, req.short_name.as_deref())?;
    repo.update_city(&city).await?;

    let country = match city.country_id {
        Some(country_id) => repo.find_country(country_id).await?,
        None => None,
    };

    info!(city_id = %id, "City updated");
    Ok(Json(CityResponse::new(&city, country.as_ref())))
}

/// DELETE /api/cities/:id
pub async fn delete_city(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresLocationRepository::new(state.pool.clone())
        .delete_city(id)
        .await?;

    info!(city_id = %id, "City deleted");
    Ok(StatusCode::NO_CONTENT)
}
