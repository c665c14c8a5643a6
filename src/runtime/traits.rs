//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the engine with mock implementations.

use crate::db::{FoodItem, UserRecord};
use crate::state_machine::{ChatId, UserId};
use crate::ui::keyboard::Keyboard;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Storage for onboarded users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user; `Ok(None)` is a plain miss
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>, String>;

    /// Insert a user record
    async fn insert_user(&self, record: &UserRecord) -> Result<(), String>;
}

/// Read access to the food catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_foods_grouped_by_date(&self) -> Result<HashMap<NaiveDate, Vec<FoodItem>>, String>;
}

/// Outbound message delivery.
///
/// Implementations log their own failures; the engine does not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String>;
}

/// Combined storage trait for convenience
pub trait Storage: UserStore + CatalogStore {}
impl<T: UserStore + CatalogStore> Storage for T {}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>, String> {
        (**self).find_user(user_id).await
    }

    async fn insert_user(&self, record: &UserRecord) -> Result<(), String> {
        (**self).insert_user(record).await
    }
}

#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    async fn list_foods_grouped_by_date(&self) -> Result<HashMap<NaiveDate, Vec<FoodItem>>, String> {
        (**self).list_foods_grouped_by_date().await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        (**self).send(chat_id, text, keyboard).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::db::Database;
use serde::Serialize;

/// Adapter to use Database as Storage
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DatabaseStorage {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>, String> {
        self.db.find_user(user_id).map_err(|e| e.to_string())
    }

    async fn insert_user(&self, record: &UserRecord) -> Result<(), String> {
        self.db.insert_user(record).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CatalogStore for DatabaseStorage {
    async fn list_foods_grouped_by_date(&self) -> Result<HashMap<NaiveDate, Vec<FoodItem>>, String> {
        self.db
            .list_foods_grouped_by_date()
            .map_err(|e| e.to_string())
    }
}

/// Body POSTed to the outbound endpoint
#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyboard: Option<&'a Keyboard>,
}

/// Transport that POSTs each message as JSON to a delivery endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// `timeout` bounds each delivery, so a stalled endpoint cannot hold a
    /// user's session
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        let body = OutboundMessage {
            chat_id,
            text,
            keyboard,
        };
        let result = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => {
                tracing::debug!(chat_id, "Message delivered");
                Ok(())
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Failed to deliver message");
                Err(e.to_string())
            }
        }
    }
}

/// Transport that only logs; used when no delivery endpoint is configured
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        tracing::info!(
            chat_id,
            text,
            has_keyboard = keyboard.is_some(),
            "Outbound message (no transport configured)"
        );
        Ok(())
    }
}
