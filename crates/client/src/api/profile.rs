use reqwest::Method;
use validator::Validate;

use domain::models::user::{Profile, ProfileResponse, UpdateProfileRequest};
use domain::models::MessageResponse;

use super::ApiClient;
use crate::error::ClientError;
use crate::session::Session;

impl ApiClient {
    pub async fn profile(&self, session: &Session) -> Result<Profile, ClientError> {
        let request = self.request(Method::GET, "profile", Some(session))?;
        let response: ProfileResponse = self.send(request).await?;
        Ok(response.profile)
    }

    pub async fn update_profile(
        &self,
        session: &Session,
        changes: &UpdateProfileRequest,
    ) -> Result<MessageResponse, ClientError> {
        changes.validate()?;

        let request = self
            .request(Method::PUT, "profile", Some(session))?
            .json(changes);
        self.send(request).await
    }
}
