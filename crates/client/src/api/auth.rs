use reqwest::Method;
use tracing::info;
use validator::Validate;

use domain::models::user::{AuthResponse, LoginRequest, SignUpRequest};

use super::ApiClient;
use crate::error::ClientError;
use crate::session::Session;

impl ApiClient {
    /// Exchanges credentials for a session.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, ClientError> {
        credentials.validate()?;

        let request = self.request(Method::POST, "login", None)?.json(credentials);
        let response: AuthResponse = self.send(request).await?;
        info!(user_id = response.user.id, "Logged in");
        Ok(Session::from(response))
    }

    /// Creates an account; the backend logs the new user in straight away.
    pub async fn sign_up(&self, account: &SignUpRequest) -> Result<Session, ClientError> {
        account.validate()?;

        let request = self.request(Method::POST, "register", None)?.json(account);
        let response: AuthResponse = self.send(request).await?;
        info!(
            user_id = response.user.id,
            is_organizer = response.user.is_organizer,
            "Account created"
        );
        Ok(Session::from(response))
    }
}
