//! Story service auth client and credential storage.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::util::remote_error;

/// An authenticated session with the story service
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub name: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .finish()
    }
}

/// Persistence for the stored session, implemented per platform
/// (keychain on the CLI, in-memory in tests)
pub trait CredentialStore: Send + Sync + 'static {
    fn load_session(&self) -> Result<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> Result<()>;
    fn clear_session(&self) -> Result<()>;

    /// The bearer token for authenticated calls, absent when logged out
    fn credential(&self) -> Result<Option<String>> {
        Ok(self.load_session()?.map(|session| session.token))
    }
}

/// Client for the story service's register/login endpoints
pub struct AuthClient<S: CredentialStore> {
    config: ApiConfig,
    client: Client,
    store: S,
}

impl<S: CredentialStore> AuthClient<S> {
    pub fn new(config: ApiConfig, store: S) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Create a new account. The service logs nobody in on registration;
    /// follow with `login`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        validate_credentials(email, password)?;
        if name.trim().is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }

        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(self.config.endpoint("register"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }
        Ok(())
    }

    /// Sign in and persist the returned session
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(self.config.endpoint("login"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let payload = response.json::<LoginResponse>().await?;
        let session = payload.into_session()?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    /// Forget the stored session. Purely local; the service keeps tokens
    /// valid until they expire.
    pub fn logout(&self) -> Result<()> {
        self.store.clear_session()
    }

    /// The stored session, if any
    pub fn session(&self) -> Result<Option<AuthSession>> {
        self.store.load_session()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    login_result: Option<LoginResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    user_id: Option<String>,
    name: Option<String>,
    token: Option<String>,
}

impl LoginResponse {
    fn into_session(self) -> Result<AuthSession> {
        let result = self
            .login_result
            .ok_or_else(|| Error::Payload("response did not include loginResult".to_string()))?;

        let token = result
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Payload("loginResult did not include a token".to_string()))?;

        Ok(AuthSession {
            token,
            user_id: result.user_id.unwrap_or_default(),
            name: result.name.unwrap_or_default(),
        })
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::Validation("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn login_response_parses_session() {
        let payload = r#"
        {
          "error": false,
          "message": "success",
          "loginResult": {
            "userId": "user-yj5pc_LARC_AgK61",
            "name": "Arif",
            "token": "eyJhbGciOiJIUzI1NiJ9.abc.def"
          }
        }
        "#;

        let response: LoginResponse = serde_json::from_str(payload).unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.user_id, "user-yj5pc_LARC_AgK61");
        assert_eq!(session.name, "Arif");
        assert_eq!(session.token, "eyJhbGciOiJIUzI1NiJ9.abc.def");
    }

    #[test]
    fn login_response_without_token_is_an_error() {
        let payload = r#"{"error": false, "message": "success", "loginResult": {"name": "Arif"}}"#;
        let response: LoginResponse = serde_json::from_str(payload).unwrap();
        assert!(matches!(
            response.into_session(),
            Err(Error::Payload(_))
        ));
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = AuthSession {
            token: "secret-token".to_string(),
            user_id: "user".to_string(),
            name: "Arif".to_string(),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn validate_credentials_rejects_blank_fields() {
        assert!(validate_credentials("", "password").is_err());
        assert!(validate_credentials("user@example.com", "  ").is_err());
        assert!(validate_credentials("user@example.com", "password").is_ok());
    }
}
