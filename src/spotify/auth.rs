use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    config::Credentials,
    error::ProxyError,
    spotify::MusicApi,
    types::{TokenPair, TokenResponse},
};

/// The two OAuth grants the proxy supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// User-level token for a code returned by the authorize redirect.
    AuthorizationCode { code: String },
    /// App-level token, used to read public playlists.
    ClientCredentials,
}

impl TokenGrant {
    fn failure_message(&self) -> &'static str {
        match self {
            TokenGrant::AuthorizationCode { .. } => "Failed to exchange code for tokens",
            TokenGrant::ClientCredentials => "Failed to authenticate with Spotify",
        }
    }
}

/// Builds the `Authorization` header value for the token endpoint.
pub fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// Exchanges a grant for an access token.
///
/// Input and configuration are checked before anything goes out: an empty code
/// is a validation error and missing credentials are a configuration error, both
/// without a network call. Otherwise exactly one form-encoded POST is made to the
/// token endpoint with HTTP Basic client authentication.
///
/// # Errors
///
/// - [`ProxyError::Validation`] - the authorization code is empty
/// - [`ProxyError::Configuration`] - client id, secret or (for the code grant)
///   redirect URI is not configured
/// - [`ProxyError::UpstreamAuth`] - the token endpoint answered non-2xx, or a 2xx
///   without an access token; carries the upstream status and body
/// - [`ProxyError::Transport`] - the token endpoint could not be reached
pub async fn exchange_token(
    api: &dyn MusicApi,
    credentials: &Credentials,
    grant: TokenGrant,
) -> Result<TokenPair, ProxyError> {
    let form = match &grant {
        TokenGrant::AuthorizationCode { code } => {
            if code.trim().is_empty() {
                return Err(ProxyError::Validation(
                    "Authorization code is missing".to_string(),
                ));
            }
            let Some(redirect_uri) = credentials
                .redirect_uri
                .as_ref()
                .filter(|_| credentials.client_pair().is_some())
            else {
                return Err(ProxyError::Configuration(
                    "Spotify API credentials or redirect URI not set".to_string(),
                ));
            };

            vec![
                ("grant_type", "authorization_code".to_string()),
                ("code", code.clone()),
                ("redirect_uri", redirect_uri.clone()),
            ]
        }
        TokenGrant::ClientCredentials => vec![("grant_type", "client_credentials".to_string())],
    };

    let Some((client_id, client_secret)) = credentials.client_pair() else {
        return Err(ProxyError::Configuration(
            "Spotify API credentials not set".to_string(),
        ));
    };

    let reply = api
        .request_token(&basic_auth(client_id, client_secret), form)
        .await?;

    if !reply.is_success() {
        return Err(ProxyError::UpstreamAuth {
            message: grant.failure_message().to_string(),
            status: reply.status,
            details: reply.body,
        });
    }

    match serde_json::from_value::<TokenResponse>(reply.body.clone()) {
        Ok(token) => {
            tracing::debug!(
                has_refresh_token = token.refresh_token.is_some(),
                "token exchange succeeded"
            );
            Ok(token.into())
        }
        Err(_) => Err(ProxyError::UpstreamAuth {
            message: grant.failure_message().to_string(),
            status: axum::http::StatusCode::BAD_GATEWAY,
            details: reply.body,
        }),
    }
}
