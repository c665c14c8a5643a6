//! Mock implementations for testing
//!
//! These mocks enable engine tests without a database or network.

use super::traits::{CatalogStore, Transport, UserStore};
use crate::db::{FoodItem, UserRecord};
use crate::state_machine::{ChatId, UserId};
use crate::ui::keyboard::Keyboard;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Transport
// ============================================================================

/// One message handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Transport that records every message instead of delivering it
#[allow(dead_code)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent send fail (messages are still recorded)
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All recorded messages, in send order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent to one chat, in send order
    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn last_text_to(&self, chat_id: ChatId) -> Option<String> {
        self.texts_to(chat_id).pop()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        if self.fail.load(Ordering::SeqCst) {
            Err("mock transport failure".to_string())
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// In-Memory Storage
// ============================================================================

/// In-memory user store and catalog for testing
#[allow(dead_code)]
pub struct InMemoryStorage {
    users: Mutex<HashMap<UserId, UserRecord>>,
    /// Every successful insert, in order
    inserted: Mutex<Vec<UserRecord>>,
    foods: Mutex<Vec<FoodItem>>,
    fail_inserts: AtomicBool,
    fail_lookups: AtomicBool,
}

#[allow(dead_code)]
impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            inserted: Mutex::new(Vec::new()),
            foods: Mutex::new(Vec::new()),
            fail_inserts: AtomicBool::new(false),
            fail_lookups: AtomicBool::new(false),
        }
    }

    /// Seed a user without counting it as an insert
    pub fn add_user(&self, record: UserRecord) {
        self.users.lock().unwrap().insert(record.user_id, record);
    }

    /// Forget known users; recorded inserts are kept
    pub fn forget_users(&self) {
        self.users.lock().unwrap().clear();
    }

    pub fn add_food(&self, food: FoodItem) {
        self.foods.lock().unwrap().push(food);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn inserted_users(&self) -> Vec<UserRecord> {
        self.inserted.lock().unwrap().clone()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStorage {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>, String> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err("mock lookup failure".to_string());
        }
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert_user(&self, record: &UserRecord) -> Result<(), String> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err("mock insert failure".to_string());
        }
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&record.user_id) {
            return Err(format!("User already exists: {}", record.user_id));
        }
        users.insert(record.user_id, record.clone());
        self.inserted.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStorage {
    async fn list_foods_grouped_by_date(
        &self,
    ) -> Result<HashMap<NaiveDate, Vec<FoodItem>>, String> {
        let mut groups: HashMap<NaiveDate, Vec<FoodItem>> = HashMap::new();
        for food in self.foods.lock().unwrap().iter() {
            groups.entry(food.date).or_default().push(food.clone());
        }
        Ok(groups)
    }
}
