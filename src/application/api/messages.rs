//! Direct messaging endpoints.

use std::sync::Arc;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Conversation, Message, NewMessage, Page, UnreadCount};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Direct messages between users.
#[derive(Clone)]
pub struct MessagesApi {
    api: Arc<dyn ApiPort>,
}

impl MessagesApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// Latest message per correspondent.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let body = self
            .api
            .send(ApiRequest::get("/messages/conversations"))
            .await?;
        Ok(envelope::decode::<Vec<Conversation>>(body)?
            .data
            .unwrap_or_default())
    }

    /// Messages exchanged with one user, newest page first.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn thread(&self, user_id: &str, page: PageRequest) -> Result<Page<Message>, ApiError> {
        let endpoint = page
            .append_to(QueryString::new())
            .apply(&format!("/messages/conversation/{}", path_segment(user_id)));
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn send(&self, message: &NewMessage) -> Result<Message, ApiError> {
        let request = ApiRequest::post("/messages", envelope::to_body(message)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/messages/{}/read", path_segment(id));
        let request = ApiRequest::patch(endpoint, serde_json::json!({}));
        envelope::into_unit(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let body = self
            .api
            .send(ApiRequest::get("/messages/unread-count"))
            .await?;
        envelope::into_data::<UnreadCount>(body).map(|c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockApiPort;
    use serde_json::json;

    #[tokio::test]
    async fn test_thread_paging() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": [{
                "id": 1,
                "senderId": 2,
                "recipientId": 3,
                "content": "Hearing moved to Friday"
            }],
            "pagination": {"total": 41, "page": 1, "limit": 20, "totalPages": 3}
        })));
        let messages = MessagesApi::new(mock.clone());

        let page = messages
            .thread("3", PageRequest { page: Some(1), limit: Some(20) })
            .await
            .unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/messages/conversation/3?page=1&limit=20"
        );
        assert_eq!(page.data[0].sender_id, "2");
        assert!(page.has_next());
    }

    #[tokio::test]
    async fn test_send_message() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": {"id": "m1", "senderId": "u1", "recipientId": "u2", "content": "Hi"}
        })));
        let messages = MessagesApi::new(mock.clone());

        let sent = messages
            .send(&NewMessage {
                recipient_id: "u2".to_string(),
                content: "Hi".to_string(),
                case_id: None,
            })
            .await
            .unwrap();

        assert_eq!(
            mock.last_request().body,
            Some(json!({"recipientId": "u2", "content": "Hi"}))
        );
        assert!(!sent.is_read);
    }

    #[tokio::test]
    async fn test_unread_count() {
        let mock = Arc::new(MockApiPort::new().reply(json!({"success": true, "data": {"count": 5}})));
        let messages = MessagesApi::new(mock);

        assert_eq!(messages.unread_count().await.unwrap(), 5);
    }
}
