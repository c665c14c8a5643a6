//! Database schema and types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    student_id TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS foods (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    side_dish TEXT,
    date TEXT NOT NULL,
    meal_time INTEGER NOT NULL,
    price_tooman INTEGER NOT NULL,
    status INTEGER NOT NULL DEFAULT 2
);

CREATE INDEX IF NOT EXISTS idx_foods_date ON foods(date, meal_time, id);
";

/// Onboarded user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub student_id: String,
    /// Credential for the university meal system, opaque to the bot
    pub password: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user_id", &self.user_id)
            .field("student_id", &self.student_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Meal of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealTime {
    pub fn as_i64(self) -> i64 {
        match self {
            MealTime::Breakfast => 0,
            MealTime::Lunch => 1,
            MealTime::Dinner => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(MealTime::Breakfast),
            1 => Some(MealTime::Lunch),
            2 => Some(MealTime::Dinner),
            _ => None,
        }
    }
}

/// Reservation status of a food for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodStatus {
    Unavailable,
    Reserved,
    Selectable,
}

impl FoodStatus {
    pub fn as_i64(self) -> i64 {
        match self {
            FoodStatus::Unavailable => 0,
            FoodStatus::Reserved => 1,
            FoodStatus::Selectable => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(FoodStatus::Unavailable),
            1 => Some(FoodStatus::Reserved),
            2 => Some(FoodStatus::Selectable),
            _ => None,
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub side_dish: Option<String>,
    pub date: NaiveDate,
    pub meal_time: MealTime,
    pub price_tooman: i64,
    pub status: FoodStatus,
}
