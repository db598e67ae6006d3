use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::SecurityConfig;
use crate::handlers::{auth, health, item, store, tag};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Full application router with shared state and global layers applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(auth_routes())
        .merge(store_routes())
        .merge(item_routes())
        .merge(tag_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let router = if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
        .route("/refresh", post(auth::session_refresh))
        .route("/logout", post(auth::session_logout))
        .route("/user/:id", get(auth::user_get).delete(auth::user_delete))
}

fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/store", get(store::list).post(store::create))
        .route("/store/:id", get(store::get).delete(store::delete))
        .route("/store/:id/tag", get(tag::list_in_store).post(tag::create_in_store))
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/item", get(item::list).post(item::create))
        .route(
            "/item/:id",
            get(item::get).put(item::put).delete(item::delete),
        )
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tag/:id", get(tag::get).delete(tag::delete))
        .route(
            "/item/:id/tag/:tag_id",
            post(tag::link).delete(tag::unlink),
        )
}

/// No CORS headers when disabled. Falls back to permissive when none of the
/// configured origins parse as header values.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
