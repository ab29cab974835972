use axum::{
    Extension, Router,
    routing::{get, post, put},
};

use crate::assets::OwnerKind;
use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    let body_limit = config.server.upload_body_limit;
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/events", event_routes().merge(image_routes(OwnerKind::Events, body_limit)))
        .nest("/members", member_routes().merge(image_routes(OwnerKind::Members, body_limit)))
        .nest("/mentors", mentor_routes().merge(image_routes(OwnerKind::Mentors, body_limit)))
        .nest("/slides", slide_routes().merge(image_routes(OwnerKind::Slides, body_limit)))
        .nest("/startups", startup_routes().merge(image_routes(OwnerKind::Startups, body_limit)))
        .nest("/sponsors", sponsor_routes().merge(image_routes(OwnerKind::Sponsors, body_limit)))
        .nest(
            "/site-config",
            site_config_routes().merge(image_routes(OwnerKind::SiteConfig, body_limit)),
        )
        .nest("/uploads", upload_routes(body_limit))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

/// `/{id}/image` for one owner kind. The kind reaches the handler as an extension.
fn image_routes(kind: OwnerKind, body_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/image",
            post(handlers::assets::upload_record_image)
                .delete(handlers::assets::clear_record_image),
        )
        .layer(Extension(kind))
        .layer(handlers::assets::upload_body_limit(body_limit))
}

fn upload_routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/{kind}", post(handlers::assets::upload_image))
        .layer(handlers::assets::upload_body_limit(body_limit))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/{id}",
            get(handlers::events::get_event)
                .patch(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::members::list_members).post(handlers::members::create_member),
        )
        .route(
            "/{id}",
            get(handlers::members::get_member)
                .patch(handlers::members::update_member)
                .delete(handlers::members::delete_member),
        )
}

fn mentor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::mentors::list_mentors).post(handlers::mentors::create_mentor),
        )
        .route(
            "/{id}",
            get(handlers::mentors::get_mentor)
                .patch(handlers::mentors::update_mentor)
                .delete(handlers::mentors::delete_mentor),
        )
}

fn slide_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::slides::list_slides).post(handlers::slides::create_slide),
        )
        .route("/reorder", put(handlers::slides::reorder_slides))
        .route(
            "/{id}",
            get(handlers::slides::get_slide)
                .patch(handlers::slides::update_slide)
                .delete(handlers::slides::delete_slide),
        )
}

fn startup_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::startups::list_startups).post(handlers::startups::create_startup),
        )
        .route(
            "/{id}",
            get(handlers::startups::get_startup)
                .patch(handlers::startups::update_startup)
                .delete(handlers::startups::delete_startup),
        )
}

fn sponsor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::sponsors::list_sponsors).post(handlers::sponsors::create_sponsor),
        )
        .route(
            "/{id}",
            get(handlers::sponsors::get_sponsor)
                .patch(handlers::sponsors::update_sponsor)
                .delete(handlers::sponsors::delete_sponsor),
        )
}

fn site_config_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::site_config::get_site_config)
            .patch(handlers::site_config::update_site_config),
    )
}
