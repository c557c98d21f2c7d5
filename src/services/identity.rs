// SPDX-License-Identifier: MIT

//! Identity provider REST client.
//!
//! Wraps the Firebase Auth REST API: sign-up, password sign-in, federated
//! sign-in, profile updates, and account deletion. Error payloads carry a
//! provider code (e.g. `EMAIL_EXISTS`) which is surfaced as
//! [`AppError::Auth`] and mapped to a fixed message at the response edge.

use crate::error::AppError;
use serde::Deserialize;

/// A signed-in (or newly created) principal.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Short-lived provider token; needed for profile updates and deletes.
    pub id_token: String,
}

/// Identity provider client.
#[derive(Clone)]
pub struct IdentityService {
    http: Option<reqwest::Client>,
    base_url: String,
    api_key: String,
    #[cfg(test)]
    staged: Option<StagedIdentity>,
}

/// Scripted identity backend for tests that need the provider to succeed
/// while other collaborators fail. Records account deletions so rollback
/// paths can be asserted.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct StagedIdentity {
    deleted: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl StagedIdentity {
    pub(crate) const ID: &'static str = "staged-uid";
    pub(crate) const ID_TOKEN: &'static str = "staged-token";

    fn principal(&self, email: &str) -> Principal {
        Principal {
            id: Self::ID.to_string(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
            id_token: Self::ID_TOKEN.to_string(),
        }
    }

    fn record_delete(&self, id_token: &str) {
        self.deleted.lock().unwrap().push(id_token.to_string());
    }

    /// Tokens passed to `delete_account`, in call order.
    pub(crate) fn deleted_tokens(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct AccountResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "photoUrl")]
    photo_url: Option<String>,
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct GoogleTokenResponse {
    id_token: String,
}

impl IdentityService {
    /// Create a new identity provider client.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url,
            api_key,
            #[cfg(test)]
            staged: None,
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All provider operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: "http://localhost:0".to_string(),
            api_key: "mock".to_string(),
            #[cfg(test)]
            staged: None,
        }
    }

    /// Create a scripted client whose account operations succeed offline.
    ///
    /// Returns the recorder alongside the client so tests can assert what
    /// the flow under test did to the provider.
    #[cfg(test)]
    pub(crate) fn new_staged() -> (Self, StagedIdentity) {
        let staged = StagedIdentity::default();
        (
            Self {
                http: None,
                base_url: "http://localhost:0".to_string(),
                api_key: "staged".to_string(),
                staged: Some(staged.clone()),
            },
            staged,
        )
    }

    fn get_http(&self) -> Result<&reqwest::Client, AppError> {
        self.http.as_ref().ok_or_else(|| {
            AppError::Auth("PROVIDER_UNAVAILABLE (offline mode)".to_string())
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    /// Create a principal with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        #[cfg(test)]
        if let Some(staged) = &self.staged {
            let _ = password;
            return Ok(staged.principal(email));
        }
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_account("signUp", &body).await
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Principal, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_account("signInWithPassword", &body).await
    }

    /// Sign in with a federated Google ID token.
    pub async fn sign_in_with_idp(&self, google_id_token: &str) -> Result<Principal, AppError> {
        let body = serde_json::json!({
            "postBody": format!("id_token={}&providerId=google.com", google_id_token),
            "requestUri": "http://localhost",
            "returnSecureToken": true,
        });
        self.post_account("signInWithIdp", &body).await
    }

    /// Set the display name on a freshly created principal.
    pub async fn set_display_name(&self, id_token: &str, name: &str) -> Result<(), AppError> {
        #[cfg(test)]
        if self.staged.is_some() {
            let _ = (id_token, name);
            return Ok(());
        }
        let body = serde_json::json!({
            "idToken": id_token,
            "displayName": name,
            "returnSecureToken": false,
        });
        let response = self
            .get_http()?
            .post(self.endpoint("update"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Delete the principal owning the token.
    ///
    /// Used as the compensating step when a profile write fails after
    /// sign-up, so no orphaned principal is left behind.
    pub async fn delete_account(&self, id_token: &str) -> Result<(), AppError> {
        #[cfg(test)]
        if let Some(staged) = &self.staged {
            staged.record_delete(id_token);
            return Ok(());
        }
        let body = serde_json::json!({ "idToken": id_token });
        let response = self
            .get_http()?
            .post(self.endpoint("delete"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Exchange a Google OAuth authorization code for an ID token.
    pub async fn exchange_google_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AppError> {
        let response = self
            .get_http()?
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("FEDERATED_EXCHANGE_FAILED: {}", body)));
        }

        let token: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;
        Ok(token.id_token)
    }

    async fn post_account(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<Principal, AppError> {
        let response = self
            .get_http()?
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let account: AccountResponse = Self::check_response_json(response).await?;
        Ok(Principal {
            id: account.local_id,
            email: account.email.unwrap_or_default(),
            display_name: account.display_name,
            photo_url: account.photo_url,
            id_token: account.id_token,
        })
    }

    /// Check a response status, extracting the provider error code on failure.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let code = match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => "UNKNOWN".to_string(),
        };
        Err(AppError::Auth(code))
    }

    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let response = Self::check_response(response).await?;
        response.json().await.map_err(|e| AppError::Auth(e.to_string()))
    }
}
