// POST /register

use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::hash_password;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Message};
use crate::services::Email;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Create an account. The password is stored as a bcrypt hash; when an email
/// address is given a welcome message is queued for it.
#[utoipa::path(
    post, path = "/register", tag = "Users", operation_id = "register",
    request_body = RegisterRequest,
    responses((status = 201, description = "Account created", body = Message),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username taken"))
)]
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<Message> {
    let mut errors = FieldErrors::new();
    let username = errors
        .require("username", payload.username)
        .map(|u| errors.name("username", &u));
    let password = errors.require("password", payload.password);
    if let Some(password) = &password {
        errors.password("password", password);
    }
    let email = payload.email.map(|e| errors.email("email", &e));
    errors.into_result()?;

    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::bad_request("username and password are required"));
    };

    let password_hash = hash_password(password, state.config.security.bcrypt_cost).await?;
    let user = state
        .users()
        .insert(NewUser {
            username,
            password_hash,
            email,
        })
        .await?;

    info!("Registered user {} ({})", user.username, user.id);

    if let Some(address) = &user.email {
        let queued = Email::welcome(address, &user.username).and_then(|email| state.email.enqueue(email));
        if let Err(e) = queued {
            warn!("Could not queue welcome email for user {}: {}", user.id, e);
        }
    }

    Ok(ApiResponse::created(Message::new("User created successfully.")))
}
