//! Lenient JSON extractor
//!
//! An absent, non-JSON or wrongly-shaped body yields `T::default()` so the
//! validator reports the missing fields instead of the request failing to
//! parse.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(error = %err, "Request body unreadable; using defaults");
                return Ok(Self(T::default()));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Self(value)),
            Err(err) => {
                tracing::debug!(error = %err, "Request body is not the expected JSON; using defaults");
                Ok(Self(T::default()))
            }
        }
    }
}
