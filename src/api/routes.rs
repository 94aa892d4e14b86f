use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    auth as auth_handlers, categories, jobs, locations, media, optional_fields, reviews, social,
    team,
};
use super::state::AppState;

// Room for multipart boundaries and the `kind` part
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.upload_max_bytes + MULTIPART_OVERHEAD;
    let media_prefix = match state.config.media_url_prefix.trim_end_matches('/') {
        "" => "/media".to_string(),
        prefix => prefix.to_string(),
    };
    let media_files = ServeDir::new(state.media.root());

    Router::new()
        // Health check
        .route("/health", get(auth_handlers::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth_handlers::register))
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/auth/refresh", post(auth_handlers::refresh))
        .route(
            "/api/auth/profile",
            get(auth_handlers::get_profile)
                .put(auth_handlers::update_profile)
                .delete(auth_handlers::delete_profile),
        )
        .route("/api/auth/social-media", post(social::social_login))
        // Catalogue
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/countries",
            get(locations::list_countries).post(locations::create_country),
        )
        .route(
            "/api/countries/:id",
            get(locations::get_country)
                .put(locations::update_country)
                .delete(locations::delete_country),
        )
        .route(
            "/api/cities",
            get(locations::list_cities).post(locations::create_city),
        )
        .route(
            "/api/cities/:id",
            get(locations::get_city)
                .put(locations::update_city)
                .delete(locations::delete_city),
        )
        .route(
            "/api/optional-fields",
            get(optional_fields::list_optional_fields).post(optional_fields::create_optional_field),
        )
        .route(
            "/api/optional-fields/:id",
            get(optional_fields::get_optional_field)
                .put(optional_fields::update_optional_field)
                .delete(optional_fields::delete_optional_field),
        )
        // Listings
        .route("/api/ads", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/ads/:id",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/myads", get(jobs::list_my_jobs))
        .route(
            "/api/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/api/reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // Team directory
        .route("/api/team", get(team::list_members).post(team::create_member))
        .route(
            "/api/team/:id",
            get(team::get_member)
                .put(team::update_member)
                .delete(team::delete_member),
        )
        .route("/api/team-roles", get(team::list_roles).post(team::create_role))
        .route(
            "/api/team-roles/:id",
            get(team::get_role)
                .put(team::update_role)
                .delete(team::delete_role),
        )
        // Uploads
        .route(
            "/api/media",
            post(media::upload_media).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest_service(&media_prefix, media_files)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
