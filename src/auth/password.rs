use super::AuthError;

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored bcrypt hash
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Hash of a random secret at the configured cost. Logins for unknown
/// usernames verify against it so both failure paths do the same bcrypt work.
pub fn decoy_hash(cost: u32) -> Result<String, AuthError> {
    let secret = uuid::Uuid::new_v4().to_string();
    bcrypt::hash(secret, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}
