//! Bearer tokens, API keys and writer composition

use std::sync::Arc;

use http::header::AUTHORIZATION;

use super::{AuthInfo, ClientAuthInfoWriter};
use crate::error::Result;
use crate::formats::Formats;
use crate::request::ClientRequest;

/// Bearer token authentication
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: String,
}

impl ClientAuthInfoWriter for BearerToken {
    fn authenticate_request(&self, request: &mut ClientRequest, _formats: &Formats) -> Result<()> {
        request.set_header_param(AUTHORIZATION.as_str(), &[format!("Bearer {}", self.token)])
    }
}

/// Writer that sends `Authorization: Bearer <token>`.
pub fn bearer_token(token: impl Into<String>) -> BearerToken {
    BearerToken {
        token: token.into(),
    }
}

/// Where to place the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyPlacement {
    Header,
    Query,
}

/// API key authentication (header or query parameter)
#[derive(Debug, Clone)]
pub struct ApiKey {
    name: String,
    value: String,
    placement: ApiKeyPlacement,
}

impl ClientAuthInfoWriter for ApiKey {
    fn authenticate_request(&self, request: &mut ClientRequest, _formats: &Formats) -> Result<()> {
        match self.placement {
            ApiKeyPlacement::Header => request.set_header_param(&self.name, &[&self.value]),
            ApiKeyPlacement::Query => {
                request.set_query_param(&self.name, &[&self.value]);
                Ok(())
            }
        }
    }
}

/// Writer that sends an API key under `name`.
pub fn api_key_auth(
    name: impl Into<String>,
    placement: ApiKeyPlacement,
    value: impl Into<String>,
) -> ApiKey {
    ApiKey {
        name: name.into(),
        value: value.into(),
        placement,
    }
}

struct Compose(Vec<AuthInfo>);

impl ClientAuthInfoWriter for Compose {
    fn authenticate_request(&self, request: &mut ClientRequest, formats: &Formats) -> Result<()> {
        for writer in &self.0 {
            writer.authenticate_request(request, formats)?;
        }
        Ok(())
    }
}

/// Apply several writers in order, stopping at the first error.
pub fn compose(writers: impl IntoIterator<Item = AuthInfo>) -> AuthInfo {
    Arc::new(Compose(writers.into_iter().collect()))
}
