use chrono::NaiveDate;
use serde_json::Value;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::error::ApiError;
use crate::model::worker::{CompensationMode, LifecycleStatus};


/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Date(NaiveDate),
    Null,
}


/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}


/// Columns a directory update may touch. `id` and anything else stays out.
const WORKER_COLUMNS: &[&str] = &[
    "name",
    "phone",
    "role",
    "village",
    "compensation_mode",
    "monthly_salary",
    "daily_wage",
    "join_date",
    "status",
];


/// ===============================
/// Build dynamic worker UPDATE SQL
/// ===============================
/// Only whitelisted columns are accepted and every value is validated
/// against the column's type before it is ever bound.
pub fn build_worker_update(payload: &Value, worker_id: i64) -> Result<SqlUpdate, ApiError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ApiError::validation("no fields provided for update"));
    }

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Build SET clause, keys validated against the whitelist
    let mut assignments = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        if !WORKER_COLUMNS.contains(&key.as_str()) {
            return Err(ApiError::validation(format!(
                "unknown or immutable field '{key}'"
            )));
        }
        values.push(convert(key, value)?);
        assignments.push(format!("{key} = ?"));
    }

    let sql = format!(
        "UPDATE workers SET {} WHERE id = ?",
        assignments.join(", ")
    );

    // WHERE id = ?
    values.push(SqlValue::I64(worker_id));

    Ok(SqlUpdate { sql, values })
}

/// Convert one JSON value → SqlValue, enforcing the column's domain.
/// Each column accepts exactly its own type; only the nullable columns
/// (`phone`, `village` and the two rates) may be cleared with null.
/// Anything else is rejected before any SQL runs.
fn convert(key: &str, value: &Value) -> Result<SqlValue, ApiError> {
    match (key, value) {
        ("compensation_mode", Value::String(s)) => {
            CompensationMode::from_str(s)
                .map_err(|_| ApiError::validation(format!("invalid compensation_mode '{s}'")))?;
            Ok(SqlValue::String(s.clone()))
        }
        ("status", Value::String(s)) => {
            LifecycleStatus::from_str(s)
                .map_err(|_| ApiError::validation(format!("invalid status '{s}'")))?;
            Ok(SqlValue::String(s.clone()))
        }
        ("join_date", Value::String(s)) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ApiError::validation(format!("invalid join_date '{s}'")))?;
            Ok(SqlValue::Date(date))
        }
        ("name" | "role", Value::String(s)) => {
            if s.trim().is_empty() {
                return Err(ApiError::validation(format!("{key} must not be empty")));
            }
            Ok(SqlValue::String(s.clone()))
        }
        ("phone" | "village", Value::String(s)) => Ok(SqlValue::String(s.clone())),
        ("phone" | "village", Value::Null) => Ok(SqlValue::Null),
        ("monthly_salary" | "daily_wage", Value::Number(n)) => {
            let rate = n
                .as_f64()
                .filter(|v| *v > 0.0)
                .ok_or_else(|| ApiError::validation(format!("{key} must be a positive number")))?;
            Ok(SqlValue::F64(rate))
        }
        ("monthly_salary" | "daily_wage", Value::Null) => Ok(SqlValue::Null),
        _ => Err(ApiError::validation(format!(
            "unsupported value type for '{key}'"
        ))),
    }
}


/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &SqlitePool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
