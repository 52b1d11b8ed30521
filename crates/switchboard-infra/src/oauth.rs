//! OAuth 2.0 refresh-token grant shared by the Spotify and Google adapters.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use switchboard_core::token::AccessToken;
use switchboard_types::error::ServiceError;

use crate::http::{json_body, transport_error};

/// Long-lived credentials used to mint access tokens.
///
/// Does NOT derive Debug: holds the client secret and refresh token.
pub struct RefreshCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
}

/// How the token endpoint wants the client authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuth {
    /// HTTP basic auth header (Spotify).
    Basic,
    /// `client_id`/`client_secret` form fields (Google).
    Form,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange the refresh token for a fresh access token.
///
/// Any 4xx from the token endpoint (`invalid_grant`, `invalid_client`) is
/// an authentication failure.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &RefreshCredentials,
    auth: ClientAuth,
) -> Result<AccessToken, ServiceError> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", credentials.refresh_token.expose_secret()),
    ];
    let mut request = client.post(token_url);
    match auth {
        ClientAuth::Basic => {
            request = request.basic_auth(
                &credentials.client_id,
                Some(credentials.client_secret.expose_secret()),
            );
        }
        ClientAuth::Form => {
            form.push(("client_id", credentials.client_id.as_str()));
            form.push(("client_secret", credentials.client_secret.expose_secret()));
        }
    }

    let response = request.form(&form).send().await.map_err(transport_error)?;

    let status = response.status();
    if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), "token refresh rejected");
        return Err(ServiceError::AuthenticationFailed);
    }
    if !status.is_success() {
        return Err(crate::http::status_error(response).await);
    }

    let token: TokenResponse = json_body(response).await?;
    Ok(AccessToken::new(token.access_token, token.expires_in))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn test_parse_token_response() {
        let fixture = r#"{"access_token":"BQD-abc","token_type":"Bearer","expires_in":3600,"scope":"user-modify-playback-state"}"#;
        let parsed: TokenResponse = serde_json::from_str(fixture).unwrap();
        let token = AccessToken::new(parsed.access_token, parsed.expires_in);
        assert_eq!(token.value.expose_secret(), "BQD-abc");
        assert_eq!(token.expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn test_missing_expiry_uses_default_lifetime() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        let token = AccessToken::new(parsed.access_token, parsed.expires_in);
        assert_eq!(token.expires_in, switchboard_core::token::DEFAULT_TOKEN_LIFETIME);
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_is_http_error() {
        let client = crate::http::build_client(Duration::from_secs(2)).unwrap();
        let credentials = RefreshCredentials {
            client_id: "id".to_string(),
            client_secret: SecretString::from("secret"),
            refresh_token: SecretString::from("refresh"),
        };
        let err = refresh_access_token(&client, "http://127.0.0.1:9/token", &credentials, ClientAuth::Basic)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServiceError::Http(_)));
    }
}
