use chrono::Utc;
use tracing::info;

use crate::error::{DictError, Result};
use crate::model::User;
use crate::store::Store;

pub async fn register_user(store: &Store, username: &str, email: &str) -> Result<User> {
    let user = User::validate(username, email, Utc::now()).map_err(DictError::StorageValidation)?;

    let mut tx = store.begin().await;
    tx.insert_user(user.clone());
    tx.commit().await?;

    info!(id = %user.id, username = %user.username, "user registered");
    Ok(user)
}
