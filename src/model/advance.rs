use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A cash advance handed to a worker ahead of salary. Append-only: advances
/// are never edited or deleted, only offset by `advance_deducted` amounts on
/// later payment events.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "7b1c9f0e-2b55-4c5f-9a9d-0f3a1d2e4b5c",
        "worker_id": 1,
        "amount": 1000.0,
        "date": "2026-08-05",
        "notes": "festival advance"
    })
)]
pub struct AdvancePayment {
    pub id: String,
    pub worker_id: i64,
    #[schema(example = 1000.0)]
    pub amount: f64,
    pub date: NaiveDate,
    #[schema(nullable = true)]
    pub notes: Option<String>,
}
