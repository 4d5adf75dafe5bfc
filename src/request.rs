//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::method::Method;

/// An incoming HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request by hand. Path parameters are filled in by the
    /// [`Router`](crate::Router) when it matches a route.
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { method, path: path.into(), body: body.into(), params: HashMap::new() }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter.
    ///
    /// For a route `/blogs/{id}`, `req.param("id")` on `/blogs/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The `{id}` path parameter as a record id.
    ///
    /// Anything other than plain decimal digits that fit a `u64` is a
    /// [`ApiError::MalformedId`], which is a client error and not a lookup miss.
    pub fn id(&self) -> Result<u64, ApiError> {
        let raw = self.param("id").unwrap_or_default();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::MalformedId(raw.to_owned()));
        }
        raw.parse().map_err(|_| ApiError::MalformedId(raw.to_owned()))
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}
