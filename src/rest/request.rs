//! Request descriptors consumed by the executor.

use reqwest::Method;
use serde::Serialize;

use crate::error::CoinbaseError;

/// One API call: method, path, query and JSON body.
///
/// The path excludes the query string; only the path is covered by the
/// request signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    /// Query string including the leading `?`.
    pub query: Option<String>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// A `GET` without query parameters.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// A `POST` carrying `body` serialized as JSON.
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, CoinbaseError> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            query: None,
            body: Some(serde_json::to_string(body)?),
        })
    }

    /// Attach a pre-built query string (with or without the leading `?`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = match query.trim_start_matches('?') {
            "" => None,
            q => Some(format!("?{q}")),
        };
        self
    }

    /// Attach URL-encoded query parameters.
    pub fn with_params<Q: Serialize + ?Sized>(self, params: &Q) -> Result<Self, CoinbaseError> {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| CoinbaseError::InvalidValue(format!("cannot encode query: {e}")))?;
        Ok(self.with_query(query))
    }

    /// Path plus query, as sent on the wire.
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}{}", self.path, query),
            None => self.path.clone(),
        }
    }
}
