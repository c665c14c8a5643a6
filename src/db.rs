//! Database module
//!
//! Provides persistence for onboarded users and the food catalog.

mod schema;

pub use schema::*;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("User already exists: {0}")]
    UserExists(i64),
    #[error("Invalid {column} in row {id}: {value}")]
    InvalidColumn {
        id: i64,
        column: &'static str,
        value: String,
    },
    #[error("Database connection poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Find a user by chat identity
    pub fn find_user(&self, user_id: i64) -> DbResult<Option<UserRecord>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT user_id, student_id, password FROM users WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserRecord {
                        user_id: row.get(0)?,
                        student_id: row.get(1)?,
                        password: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Insert a user. A second insert for the same `user_id` is rejected.
    pub fn insert_user(&self, user: &UserRecord) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (user_id, student_id, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.user_id, user.student_id, user.password, Utc::now().to_rfc3339()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::UserExists(user.user_id)
            }
            other => DbError::Sqlite(other),
        })?;
        Ok(())
    }

    // ==================== Catalog Operations ====================

    /// Add a food to the catalog
    #[allow(dead_code)] // Catalog is loaded by external tooling; used in tests
    pub fn insert_food(&self, food: &FoodItem) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO foods (id, name, side_dish, date, meal_time, price_tooman, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                food.id,
                food.name,
                food.side_dish,
                food.date.format(DATE_FORMAT).to_string(),
                food.meal_time.as_i64(),
                food.price_tooman,
                food.status.as_i64(),
            ],
        )?;
        Ok(())
    }

    /// All foods, grouped by serving date. Within a date, foods are ordered by
    /// meal time, then id.
    pub fn list_foods_grouped_by_date(&self) -> DbResult<HashMap<NaiveDate, Vec<FoodItem>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, side_dish, date, meal_time, price_tooman, status
             FROM foods
             ORDER BY date, meal_time, id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FoodRow {
                id: row.get(0)?,
                name: row.get(1)?,
                side_dish: row.get(2)?,
                date: row.get(3)?,
                meal_time: row.get(4)?,
                price_tooman: row.get(5)?,
                status: row.get(6)?,
            })
        })?;

        let mut groups: HashMap<NaiveDate, Vec<FoodItem>> = HashMap::new();
        for row in rows {
            let food = row?.into_food()?;
            groups.entry(food.date).or_default().push(food);
        }
        Ok(groups)
    }
}

/// Raw `foods` row before column decoding
struct FoodRow {
    id: i64,
    name: String,
    side_dish: Option<String>,
    date: String,
    meal_time: i64,
    price_tooman: i64,
    status: i64,
}

impl FoodRow {
    fn into_food(self) -> DbResult<FoodItem> {
        let invalid = |column: &'static str, value: String| DbError::InvalidColumn {
            id: self.id,
            column,
            value,
        };
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| invalid("date", self.date.clone()))?;
        let meal_time = MealTime::from_i64(self.meal_time)
            .ok_or_else(|| invalid("meal_time", self.meal_time.to_string()))?;
        let status = FoodStatus::from_i64(self.status)
            .ok_or_else(|| invalid("status", self.status.to_string()))?;

        Ok(FoodItem {
            id: self.id,
            name: self.name,
            side_dish: self.side_dish,
            date,
            meal_time,
            price_tooman: self.price_tooman,
            status,
        })
    }
}
