pub mod assets;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Startup Club Site API",
        version = "1.0.0",
        description = "Back-office API of the startup club site: landing content, role-based login and image uploads"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::members::list_members,
        handlers::members::get_member,
        handlers::members::create_member,
        handlers::members::update_member,
        handlers::members::delete_member,
        handlers::mentors::list_mentors,
        handlers::mentors::get_mentor,
        handlers::mentors::create_mentor,
        handlers::mentors::update_mentor,
        handlers::mentors::delete_mentor,
        handlers::slides::list_slides,
        handlers::slides::get_slide,
        handlers::slides::create_slide,
        handlers::slides::update_slide,
        handlers::slides::delete_slide,
        handlers::slides::reorder_slides,
        handlers::startups::list_startups,
        handlers::startups::get_startup,
        handlers::startups::create_startup,
        handlers::startups::update_startup,
        handlers::startups::delete_startup,
        handlers::sponsors::list_sponsors,
        handlers::sponsors::get_sponsor,
        handlers::sponsors::create_sponsor,
        handlers::sponsors::update_sponsor,
        handlers::sponsors::delete_sponsor,
        handlers::site_config::get_site_config,
        handlers::site_config::update_site_config,
        handlers::assets::upload_record_image,
        handlers::assets::clear_record_image,
        handlers::assets::upload_image,
        handlers::media::get_media,
    ),
    tags(
        (name = "Auth", description = "Authentication and role routing"),
        (name = "Events", description = "Programs and events"),
        (name = "Members", description = "Important members"),
        (name = "Mentors", description = "Mentors"),
        (name = "Slides", description = "Year-in-review carousel"),
        (name = "Startups", description = "Startups from the club"),
        (name = "Sponsors", description = "Sponsors"),
        (name = "Site Config", description = "Landing page hero and logo"),
        (name = "Assets", description = "Image upload, linking and delivery"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .route("/media/{bucket}/{key}", get(handlers::media::get_media))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
}
