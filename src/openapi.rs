use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::database::models::{Item, PlainItem, PlainStore, PlainTag, Store, Tag, User};
use crate::handlers::{auth, health, item, store, tag};
use crate::middleware::Message;

/// OpenAPI document assembled from the `#[utoipa::path]` annotations on the
/// handlers. Success bodies are wrapped in `{"success": true, "data": ...}`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stores REST API",
        description = "Catalog of stores, items and tags with JWT authentication"
    ),
    paths(
        health::root, health::health,
        auth::register::register_post, auth::login::login_post,
        auth::session::refresh, auth::session::logout,
        auth::user::get, auth::user::delete,
        store::list, store::create, store::get, store::delete,
        item::list, item::create, item::get, item::put, item::delete,
        tag::list_in_store, tag::create_in_store, tag::link, tag::unlink,
        tag::get, tag::delete,
    ),
    components(schemas(
        PlainStore, Store, PlainItem, Item, PlainTag, Tag, User, Message,
        auth::register::RegisterRequest, auth::login::LoginRequest,
        auth::login::LoginResponse, auth::session::RefreshResponse,
        store::StoreRequest, item::ItemRequest, tag::TagRequest, tag::ItemTagResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Service info and health"),
        (name = "Users", description = "Registration, login and token management"),
        (name = "Stores", description = "Stores"),
        (name = "Items", description = "Items within a store"),
        (name = "Tags", description = "Store-scoped tags and their links to items"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected operations
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        for path in [
            "/", "/health", "/register", "/login", "/refresh", "/logout",
            "/user/{id}", "/store", "/store/{id}", "/store/{id}/tag",
            "/item", "/item/{id}", "/item/{id}/tag/{tag_id}", "/tag/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
        assert!(doc["components"]["schemas"]["Store"].is_object());
    }

    #[test]
    fn password_is_not_part_of_user_schema() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["components"]["schemas"]["User"]["properties"]["password"].is_null());
    }
}
