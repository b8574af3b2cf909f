//! Authentication writers
//!
//! An auth writer decorates a `ClientRequest` with credentials before it is
//! built. Operations carry their own writer or fall back to the runtime's
//! default.

use std::sync::Arc;

use crate::error::Result;
use crate::formats::Formats;
use crate::request::ClientRequest;

pub mod auth;
pub mod basic_auth;

pub use auth::{ApiKey, ApiKeyPlacement, BearerToken, api_key_auth, bearer_token, compose};
pub use basic_auth::{BasicAuth, basic_auth, decode_basic_auth, encode_basic_auth};

/// Applies credentials to a request.
pub trait ClientAuthInfoWriter: Send + Sync {
    /// # Errors
    ///
    /// Errors abort the call and reach the caller of `submit` unchanged.
    fn authenticate_request(&self, request: &mut ClientRequest, formats: &Formats) -> Result<()>;
}

impl<F> ClientAuthInfoWriter for F
where
    F: Fn(&mut ClientRequest, &Formats) -> Result<()> + Send + Sync,
{
    fn authenticate_request(&self, request: &mut ClientRequest, formats: &Formats) -> Result<()> {
        self(request, formats)
    }
}

/// Shared handle stored on runtimes and operations.
pub type AuthInfo = Arc<dyn ClientAuthInfoWriter>;
