//! Client for the credential-issuing auth endpoints

use reqwest::Client;
use tracing::debug;

use taskdeck_api::auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};

use crate::error::ApiResult;
use crate::http::{decode_json, join_url};

/// Thin client for `/auth/login` and `/auth/register`. No bearer token is
/// attached; these calls exist to obtain one.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    server_url: String,
}

impl AuthClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.into(),
        }
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        debug!("Sending login request for user: {}", username);

        let response = self
            .client
            .post(join_url(&self.server_url, "auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        decode_json(response).await
    }

    /// Register a new account. Callers follow up with [`Self::login`] when
    /// the response carries no token.
    pub async fn signup(&self, username: &str, password: &str) -> ApiResult<SignupResponse> {
        debug!("Sending signup request for user: {}", username);

        let response = self
            .client
            .post(join_url(&self.server_url, "auth/register"))
            .json(&SignupRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        decode_json(response).await
    }
}
