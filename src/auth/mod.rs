//! Authentication module for the Coinbase brokerage API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - ES256 JWT generation for authenticated requests

mod credentials;
mod signature;

pub use credentials::{Credentials, CredentialsProvider, FileCredentials, StaticCredentials};
pub use signature::{Claims, SigningKey, TOKEN_TTL_SECS, sign_request, sign_request_at};
