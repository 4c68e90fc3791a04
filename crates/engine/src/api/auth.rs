//! Bearer token extraction.
//!
//! Pulls the token out of `Authorization: Bearer <token>`. Validation
//! against the session store happens in the handler, which knows the game.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::http::ApiError;
use crate::stores::SessionError;

/// Raw bearer token from the request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(SessionError::MissingToken)?
            .to_str()
            .map_err(|_| SessionError::MalformedHeader)?;

        let mut words = header.split(' ');
        match (words.next(), words.next(), words.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => {
                Ok(BearerToken(token.to_string()))
            }
            _ => Err(SessionError::MalformedHeader.into()),
        }
    }
}
