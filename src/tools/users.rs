//! User tools

use crate::models::User;
use crate::store::UserStore;

use super::{validation, ServiceResult};

/// Create a user profile
pub async fn create_user(store: &UserStore, email: &str) -> ServiceResult<User> {
    let email = validation::validate_email(email)?;
    Ok(store.create(email.to_string()).await?)
}

/// Get a user by ID
pub async fn get_user(store: &UserStore, id: i64) -> ServiceResult<Option<User>> {
    Ok(store.get_by_id(id).await?)
}

/// List all users
pub async fn list_users(store: &UserStore) -> ServiceResult<Vec<User>> {
    Ok(store.list().await?)
}
