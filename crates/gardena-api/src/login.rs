// Token endpoint
//
// `POST auth/token` exchanges username/password for a bearer token. The
// result is memoized in the client's `TokenCache`; callers normally use
// `token()` and never hit the endpoint directly.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::Token;
use crate::client::{GardenaClient, parse_json, preview};
use crate::error::Error;
use crate::models::{TokenRequest, TokenRequestAttributes, TokenRequestData, TokenResponse};

impl GardenaClient {
    /// A usable bearer token, from cache or freshly issued.
    ///
    /// Concurrent callers while no valid token is cached share a single
    /// authentication request.
    pub async fn token(&self) -> Result<Token, Error> {
        self.tokens().get_or_refresh(|| self.authenticate()).await
    }

    /// Issue one token request, bypassing the cache.
    ///
    /// Every failure is reported as [`Error::Authentication`]: rejected
    /// credentials, an unreachable endpoint, or a response without `id` or
    /// `expires_in`.
    pub async fn authenticate(&self) -> Result<Token, Error> {
        let url = self.endpoint("auth/token")?;
        debug!("requesting token at {}", url);

        let credentials = self.credentials();
        let body = TokenRequest {
            data: TokenRequestData {
                kind: "token",
                attributes: TokenRequestAttributes {
                    username: credentials.username(),
                    password: credentials.password().expose_secret(),
                },
            },
        };

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("token endpoint unreachable: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let response: TokenResponse =
            parse_json(resp).await.map_err(|e| Error::Authentication {
                message: format!("malformed token response: {e}"),
            })?;

        token_from_response(response)
    }
}

fn token_from_response(response: TokenResponse) -> Result<Token, Error> {
    let missing = |field: &str| Error::Authentication {
        message: format!("token response is missing `{field}`"),
    };

    let data = response.data.ok_or_else(|| missing("data"))?;
    let value = data.id.ok_or_else(|| missing("data.id"))?;
    let attributes = data
        .attributes
        .ok_or_else(|| missing("data.attributes"))?;
    let expires_in = attributes
        .expires_in
        .ok_or_else(|| missing("data.attributes.expires_in"))?;

    Ok(Token::from_ttl(
        SecretString::from(value),
        Duration::from_secs(expires_in),
        attributes.provider,
        attributes.user_id,
    ))
}
