use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::model::ObjectId;

/// Header carrying the authenticated user id, set by the identity provider.
pub const USER_HEADER: &str = "x-user-id";

/// The acting user, if the request carries a well-formed identity.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<ObjectId>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<ObjectId>().ok());

        Ok(CurrentUser(id))
    }
}
