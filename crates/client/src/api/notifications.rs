use reqwest::Method;

use domain::models::notification::{NotificationListResponse, NotificationQuery};
use domain::models::MessageResponse;

use super::ApiClient;
use crate::error::ClientError;
use crate::session::Session;

impl ApiClient {
    pub async fn notifications(
        &self,
        session: &Session,
        query: &NotificationQuery,
    ) -> Result<NotificationListResponse, ClientError> {
        let request = self
            .request(Method::GET, "notifications", Some(session))?
            .query(query);
        self.send(request).await
    }

    pub async fn mark_notification_read(
        &self,
        session: &Session,
        notification_id: i64,
    ) -> Result<MessageResponse, ClientError> {
        let path = format!("notifications/{}/read", notification_id);
        let request = self.request(Method::PUT, &path, Some(session))?;
        self.send(request).await
    }

    pub async fn mark_all_notifications_read(
        &self,
        session: &Session,
    ) -> Result<MessageResponse, ClientError> {
        let request = self.request(Method::PUT, "notifications/read-all", Some(session))?;
        self.send(request).await
    }
}
