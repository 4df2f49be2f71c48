//! The local contact endpoint.

use serde_json::{Value, json};

use crate::message::ContactMessage;
use crate::store::MessageStore;

/// Status code and JSON body returned by [`ContactApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` string from the body, if any.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Accepts contact submissions and hands valid ones to a store.
#[derive(Debug, Clone)]
pub struct ContactApi<S> {
    store: S,
}

impl<S: MessageStore> ContactApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Handle a submission whose body is raw JSON.
    ///
    /// 201 with the stored record; 400 for a malformed body or a failed
    /// field check; 500 if the store refuses the message.
    pub fn submit_json(&self, body: &str) -> ApiResponse {
        match serde_json::from_str::<ContactMessage>(body) {
            Ok(message) => self.submit(message),
            Err(err) => {
                log::debug!("rejected contact payload: {err}");
                ApiResponse::new(
                    400,
                    json!({
                        "message": "Invalid input data",
                        "errors": [err.to_string()],
                    }),
                )
            }
        }
    }

    pub fn submit(&self, message: ContactMessage) -> ApiResponse {
        if let Err(err) = message.validate() {
            return ApiResponse::new(
                400,
                json!({
                    "message": err.message,
                    "field": err.field,
                }),
            );
        }

        match self.store.create(message) {
            Ok(stored) => {
                log::info!("stored contact message {}", stored.id);
                ApiResponse::new(
                    201,
                    json!({
                        "success": true,
                        "message": "Message sent successfully!",
                        "data": stored,
                    }),
                )
            }
            Err(err) => {
                log::error!("contact form error: {err}");
                ApiResponse::new(
                    500,
                    json!({ "message": "Failed to send message. Please try again." }),
                )
            }
        }
    }

    /// Every stored message.
    pub fn list(&self) -> ApiResponse {
        match self.store.list() {
            Ok(messages) => ApiResponse::new(200, json!(messages)),
            Err(err) => {
                log::error!("get messages error: {err}");
                ApiResponse::new(500, json!({ "message": "Failed to retrieve messages" }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::StoredMessage;
    use crate::store::{MemoryStore, StoreError};
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    impl MessageStore for BrokenStore {
        fn create(&self, _message: ContactMessage) -> Result<StoredMessage, StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }

        fn list(&self) -> Result<Vec<StoredMessage>, StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }
    }

    const VALID: &str =
        r#"{"name":"Ada","email":"ada@example.com","subject":"Hi","message":"Hello there"}"#;

    #[test]
    fn test_created() {
        let api = ContactApi::new(MemoryStore::new());
        let res = api.submit_json(VALID);
        assert_eq!(res.status, 201);
        assert_eq!(res.body["success"], json!(true));
        assert_eq!(res.message(), Some("Message sent successfully!"));
        assert_eq!(res.body["data"]["id"], json!(1));
        assert_eq!(res.body["data"]["email"], json!("ada@example.com"));
        assert!(res.body["data"]["createdAt"].is_string());
    }

    #[test]
    fn test_validation_failure_names_field() {
        let api = ContactApi::new(MemoryStore::new());
        let res = api.submit_json(
            r#"{"name":"Ada","email":"ada@example","subject":"Hi","message":"Hello"}"#,
        );
        assert_eq!(res.status, 400);
        assert_eq!(
            res.body,
            json!({ "message": "Invalid email format", "field": "email" })
        );
    }

    #[test]
    fn test_malformed_body() {
        let api = ContactApi::new(MemoryStore::new());
        let res = api.submit_json(r#"{"name":"Ada"}"#);
        assert_eq!(res.status, 400);
        assert_eq!(res.message(), Some("Invalid input data"));
        assert!(res.body["errors"].is_array());
    }

    #[test]
    fn test_store_failure_is_500() {
        let api = ContactApi::new(BrokenStore);
        let res = api.submit_json(VALID);
        assert_eq!(res.status, 500);
        assert_eq!(
            res.message(),
            Some("Failed to send message. Please try again.")
        );
        assert_eq!(api.list().status, 500);
    }

    #[test]
    fn test_list_returns_stored() {
        let api = ContactApi::new(MemoryStore::new());
        api.submit_json(VALID);
        api.submit_json(VALID);
        let res = api.list();
        assert!(res.is_success());
        assert_eq!(res.body.as_array().map(Vec::len), Some(2));
    }
}
