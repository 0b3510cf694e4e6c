use crate::config::Config;
use crate::error::RelayError;

use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, Client as OAuth2Client, ClientId, ClientSecret,
    EndpointNotSet, EndpointSet, HttpClientError, RedirectUrl, RefreshToken, RequestTokenError,
    StandardErrorResponse, StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicErrorResponseType, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
};
use serde::Deserialize;
use tracing::info;

/// Access/refresh pair as returned by the provider's token endpoint. The
/// provider rotates both on every refresh, so they always travel together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// `GET /users/me` response subset.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    #[serde(rename = "id")]
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct MailboxProfile {
    #[serde(rename = "emailAddress")]
    email_address: String,
}

/// Stateless provider exchanges. All four calls are single-shot: no
/// retries, first failure propagates to the caller.
pub struct ZoomOauthEndpoints;

impl ZoomOauthEndpoints {
    /// Trade an authorization code for a token pair. Sends the fixed
    /// redirect URI and grant type `authorization_code`, authenticating
    /// with HTTP Basic client credentials.
    pub async fn exchange_authorization_code(
        config: &Config,
        code: &str,
        http_client: &reqwest::Client,
    ) -> Result<TokenPair, RelayError> {
        let client = build_oauth2_client(config)?;
        let token_result: BasicTokenResponse = client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .request_async(http_client)
            .await
            .map_err(|e| RelayError::AuthExchangeFailed {
                detail: token_error_detail(e),
            })?;
        info!("Authorization code exchanged successfully");
        token_pair(token_result).ok_or(RelayError::AuthExchangeFailed {
            detail: "provider response missing refresh_token".to_string(),
        })
    }

    /// Trade the current refresh token for a new pair. After a failure the
    /// old refresh token must be treated as dead; providers typically
    /// invalidate it.
    pub async fn exchange_refresh_token(
        config: &Config,
        refresh_token: &str,
        http_client: &reqwest::Client,
    ) -> Result<TokenPair, RelayError> {
        let client = build_oauth2_client(config)?;
        let token_result: BasicTokenResponse = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_owned()))
            .request_async(http_client)
            .await
            .map_err(|e| RelayError::RefreshFailed {
                detail: token_error_detail(e),
            })?;
        info!("Access token refreshed successfully");
        token_pair(token_result).ok_or(RelayError::RefreshFailed {
            detail: "provider response missing refresh_token".to_string(),
        })
    }

    /// "Who am I" fetch against the provider's current-user endpoint.
    pub async fn fetch_identity(
        config: &Config,
        access_token: &str,
        http_client: &reqwest::Client,
    ) -> Result<UserIdentity, RelayError> {
        let url = config.api_url("users/me")?;
        let resp = http_client
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RelayError::IdentityFetchFailed {
                detail: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::IdentityFetchFailed {
                detail: format!("{status}: {body}"),
            });
        }

        resp.json::<UserIdentity>()
            .await
            .map_err(|e| RelayError::IdentityFetchFailed {
                detail: format!("malformed user payload: {e}"),
            })
    }

    /// Resolve the distinct zmail address from the mailbox profile
    /// endpoint; it becomes the lookup key for all mail operations.
    pub async fn fetch_mailbox_address(
        config: &Config,
        access_token: &str,
        http_client: &reqwest::Client,
    ) -> Result<String, RelayError> {
        let url = config.api_url("emails/mailboxes/me/profile")?;
        let resp = http_client
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RelayError::ProfileFetchFailed {
                detail: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::ProfileFetchFailed {
                detail: format!("{status}: {body}"),
            });
        }

        let profile: MailboxProfile =
            resp.json()
                .await
                .map_err(|e| RelayError::ProfileFetchFailed {
                    detail: format!("malformed profile payload: {e}"),
                })?;
        Ok(profile.email_address)
    }
}

fn token_pair(resp: BasicTokenResponse) -> Option<TokenPair> {
    let refresh_token = resp.refresh_token()?.secret().clone();
    Some(TokenPair {
        access_token: resp.access_token().secret().clone(),
        refresh_token,
    })
}

/// Build the provider OAuth2 client from process configuration.
fn build_oauth2_client(config: &Config) -> Result<ZoomOauth2Client, RelayError> {
    let client = OAuth2Client::new(ClientId::new(config.client_id.clone()))
        .set_client_secret(ClientSecret::new(config.client_secret.clone()))
        .set_auth_type(AuthType::BasicAuth)
        .set_auth_uri(AuthUrl::from_url(config.authorize_url()?))
        .set_token_uri(TokenUrl::from_url(config.token_url()?))
        .set_redirect_uri(RedirectUrl::from_url(config.redirect_uri.clone()));
    Ok(client)
}

type ZoomTokenError =
    RequestTokenError<HttpClientError<ReqwestClientError>, StandardErrorResponse<BasicErrorResponseType>>;

/// Flatten the oauth2 error tree into the provider error body (or the
/// transport failure) for logging upstream.
fn token_error_detail(e: ZoomTokenError) -> String {
    match e {
        RequestTokenError::ServerResponse(err) => match err.error_description() {
            Some(desc) => format!("{}: {}", err.error(), desc),
            None => err.error().to_string(),
        },
        RequestTokenError::Request(req_e) => format!("request failed: {req_e}"),
        RequestTokenError::Parse(parse_err, body) => format!(
            "malformed token response: {parse_err}; body: {}",
            String::from_utf8_lossy(&body)
        ),
        RequestTokenError::Other(s) => s,
    }
}

type ZoomOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
