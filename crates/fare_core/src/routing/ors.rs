//! OpenRouteService adapter: driving directions and place search.
//!
//! The HTTP client is blocking, like the rest of the routing stack; wrap it in
//! [`RetryingRouteProvider`](super::RetryingRouteProvider) and
//! [`CachedRouteProvider`](super::CachedRouteProvider) for production use.

mod client;
mod parser;
mod response;

#[cfg(test)]
mod tests;

pub use client::OrsClient;

use super::RouteError;

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RouteError::Timeout
        } else if let Some(status) = err.status() {
            RouteError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            RouteError::InvalidResponse(err.to_string())
        } else {
            RouteError::Network(err.to_string())
        }
    }
}
